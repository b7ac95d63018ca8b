//! Deriving one master's value from its neighbours, and the other whole-list
//! edits offered for a single pair.
//!
//! Interpolated values are rounded half to even: `2.5` becomes `2` and `3.5`
//! becomes `4`.

use crate::error::KernError;
use crate::types::ValueList;
use crate::utils::{numeric_values, round_half_even};

/// The smallest number of masters that interpolation works with.
pub const MIN_MASTERS: usize = 3;

/// Value for the master at `target`, derived from the other masters.
///
/// Inner masters take the value at `factor` between their two neighbours.
/// The first and last master are extrapolated from the two masters next to
/// them. Unset values count as zero.
pub fn interpolate(values: &[Option<i64>], target: usize, factor: f64) -> Result<i64, KernError> {
    check_target(values, target)?;
    let v: Vec<f64> = numeric_values(values).map(|v| v as f64).collect();
    let last = v.len() - 1;

    let result = if target == 0 {
        extrapolate(v[2], v[1], factor)
    } else if target == last {
        extrapolate(v[last - 2], v[last - 1], factor)
    } else {
        between(v[target - 1], v[target + 1], factor)
    };
    Ok(round_half_even(result))
}

fn between(from: f64, to: f64, factor: f64) -> f64 {
    from + (to - from) * factor
}

/// Continue the line through `far` and `near` past `near`.
fn extrapolate(far: f64, near: f64, factor: f64) -> f64 {
    near + (near - far) * factor
}

fn check_target(values: &[Option<i64>], target: usize) -> Result<(), KernError> {
    if values.len() < MIN_MASTERS {
        return Err(KernError::Precondition(format!(
            "need at least {} masters to interpolate, got {}",
            MIN_MASTERS,
            values.len()
        )));
    }
    if target >= values.len() {
        return Err(KernError::Precondition(format!(
            "master {} is out of range for {} masters",
            target,
            values.len()
        )));
    }
    Ok(())
}

/// Interpolate several masters at once. Every target is computed from the
/// values as they were before the call.
pub fn interpolate_targets(
    values: &[Option<i64>],
    targets: &[usize],
    factor: f64,
) -> Result<ValueList, KernError> {
    if targets.is_empty() {
        return Err(KernError::Precondition(
            "no interpolation target selected".to_string(),
        ));
    }
    let mut output = values.to_vec();
    for &target in targets {
        let value = interpolate(values, target, factor)?;
        output[target] = Some(value);
    }
    Ok(output)
}

/// Copy the value of master `source` into every slot.
pub fn transfer(values: &[Option<i64>], source: usize) -> Result<ValueList, KernError> {
    let value = values.get(source).ok_or_else(|| {
        KernError::Precondition(format!(
            "master {} is out of range for {} masters",
            source,
            values.len()
        ))
    })?;
    Ok(vec![*value; values.len()])
}

/// Set every slot to the rounded mean of all slots, unset counting as zero.
pub fn average(values: &[Option<i64>]) -> ValueList {
    if values.is_empty() {
        return Vec::new();
    }
    let sum: i64 = numeric_values(values).sum();
    let mean = round_half_even(sum as f64 / values.len() as f64);
    vec![Some(mean); values.len()]
}

/// Add `amount` to the selected slots, or to all of them when nothing or
/// everything is selected. Unset slots become explicit.
pub fn nudge(values: &[Option<i64>], amount: i64, selected: &[usize]) -> ValueList {
    let everything = selected.is_empty() || selected.len() == values.len();
    numeric_values(values)
        .enumerate()
        .map(|(i, v)| {
            if everything || selected.contains(&i) {
                Some(v + amount)
            } else {
                Some(v)
            }
        })
        .collect()
}

/// A value list with every master unset.
pub fn cleared(masters: usize) -> ValueList {
    vec![None; masters]
}
