/// Replace unset slots with 0.
pub(crate) fn numeric_values(values: &[Option<i64>]) -> impl Iterator<Item = i64> + '_ {
    values.iter().map(|v| v.unwrap_or(0))
}

/// Spread between the largest and smallest explicit value.
pub(crate) fn gamut(values: &[Option<i64>]) -> i64 {
    let mut present = values.iter().flatten();
    let Some(&first) = present.next() else {
        return 0;
    };
    let (min, max) = present.fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
    max - min
}

/// Mean magnitude of the explicit values; unset slots are not counted.
pub(crate) fn average_magnitude(values: &[Option<i64>]) -> f64 {
    let present: Vec<i64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return 0.;
    }
    present.iter().map(|v| v.unsigned_abs() as f64).sum::<f64>() / present.len() as f64
}

/// True when every slot holds the same raw value, `None` included.
pub(crate) fn all_same(values: &[Option<i64>]) -> bool {
    match values.split_first() {
        Some((first, rest)) => rest.iter().all(|v| v == first),
        None => false,
    }
}

/// Round to the nearest integer, ties to even.
pub(crate) fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamut_ignores_unset() {
        assert_eq!(gamut(&[Some(-20), None, Some(30)]), 50);
        assert_eq!(gamut(&[None, None]), 0);
        assert_eq!(gamut(&[Some(0), Some(40)]), 40);
    }

    #[test]
    fn average_counts_present_values_only() {
        assert_eq!(average_magnitude(&[Some(-4), None, Some(8)]), 6.);
        assert_eq!(average_magnitude(&[None]), 0.);
    }

    #[test]
    fn sameness_includes_unset() {
        assert!(all_same(&[None, None]));
        assert!(all_same(&[Some(0), Some(0)]));
        assert!(!all_same(&[Some(0), None]));
        assert!(!all_same(&[]));
    }

    #[test]
    fn rounding_ties_to_even() {
        assert_eq!(round_half_even(0.5), 0);
        assert_eq!(round_half_even(1.5), 2);
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(-2.5), -2);
        assert_eq!(round_half_even(-2.6), -3);
    }
}
