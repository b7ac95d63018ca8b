//! Diagnostic filters over a combined kerning map.
//!
//! None of these modify the map they are given. Sub-maps keep the order of
//! the input unless a filter ranks its result.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::fonts::KerningSource;
use crate::groups;
use crate::session::AnalysisConfig;
use crate::types::{KernMap, Pair, ValueList, is_group_name};
use crate::utils::{all_same, average_magnitude, gamut, numeric_values};

/// Every way the pair list can be narrowed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    All,
    SinglePairs,
    SameValue,
    ZeroValue,
    LargestValues,
    HighGamut,
    Outliers,
    Exceptions,
    SmallAverage,
}

impl Filter {
    pub const ALL: [Filter; 9] = [
        Filter::All,
        Filter::SinglePairs,
        Filter::SameValue,
        Filter::ZeroValue,
        Filter::LargestValues,
        Filter::HighGamut,
        Filter::Outliers,
        Filter::Exceptions,
        Filter::SmallAverage,
    ];

    /// Menu label, with the filter's parameter where it has one.
    pub fn label(self, config: &AnalysisConfig) -> String {
        match self {
            Filter::All => "All Pairs".to_string(),
            Filter::SinglePairs => "Single Pairs".to_string(),
            Filter::SameValue => "Same Value Across all Masters".to_string(),
            Filter::ZeroValue => "Zero-Value Pairs".to_string(),
            Filter::LargestValues => "Long-Distance Kerning Pairs".to_string(),
            Filter::HighGamut => "High Gamut Across Pairs".to_string(),
            Filter::Outliers => format!("Outliers by a Factor of {}", config.outlier_factor),
            Filter::Exceptions => "Exceptions".to_string(),
            Filter::SmallAverage => {
                format!("Average Kern Distance < {}", config.small_average_threshold)
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::All => "all",
            Filter::SinglePairs => "single",
            Filter::SameValue => "same",
            Filter::ZeroValue => "zero",
            Filter::LargestValues => "largest",
            Filter::HighGamut => "gamut",
            Filter::Outliers => "outliers",
            Filter::Exceptions => "exceptions",
            Filter::SmallAverage => "small",
        };
        f.write_str(name)
    }
}

/// Run `filter` over `combined` and return the qualifying pairs in order.
///
/// `masters` is only consulted for [`Filter::Exceptions`].
pub fn classify<M: KerningSource>(
    combined: &KernMap,
    masters: &[M],
    filter: Filter,
    config: &AnalysisConfig,
) -> Vec<Pair> {
    let pairs: Vec<Pair> = match filter {
        Filter::All => combined.keys().cloned().collect(),
        Filter::SinglePairs => single_pairs(combined).into_keys().collect(),
        Filter::SameValue => same_value(combined).into_keys().collect(),
        Filter::ZeroValue => zero_value(combined).into_keys().collect(),
        Filter::LargestValues => largest_values(combined, config.largest_amount)
            .into_iter()
            .map(|(pair, _)| pair)
            .collect(),
        Filter::HighGamut => high_gamut(combined, config.gamut_amount)
            .into_keys()
            .collect(),
        Filter::Outliers => outliers(combined, config.outlier_factor)
            .into_keys()
            .collect(),
        Filter::Exceptions => exceptions(masters, combined).into_keys().collect(),
        Filter::SmallAverage => small_average(combined, config.small_average_threshold)
            .into_keys()
            .collect(),
    };
    debug!("filter {}: {} pairs", filter, pairs.len());
    pairs
}

fn select(combined: &KernMap, keep: impl Fn(&Pair, &ValueList) -> bool) -> KernMap {
    combined
        .iter()
        .filter(|(pair, values)| keep(pair, values))
        .map(|(pair, values)| (pair.clone(), values.clone()))
        .collect()
}

/// Pairs between two glyphs, no group on either side.
pub fn single_pairs(combined: &KernMap) -> KernMap {
    select(combined, |pair, _| {
        !pair.left.starts_with("public") && !pair.right.starts_with("public")
    })
}

/// Pairs whose slots are all identical. An unset slot only equals another
/// unset slot, so `[0, None]` does not qualify while `[None, None]` does.
pub fn same_value(combined: &KernMap) -> KernMap {
    select(combined, |_, values| all_same(values))
}

/// Pairs that are unset or explicitly zero in every master.
pub fn zero_value(combined: &KernMap) -> KernMap {
    select(combined, |_, values| values.iter().all(|v| v.unwrap_or(0) == 0))
}

/// Pairs with at least one value `factor` times larger than the average
/// magnitude of its slots (unset counting as zero).
pub fn outliers(combined: &KernMap, factor: f64) -> KernMap {
    select(combined, |_, values| {
        let magnitudes: Vec<f64> = numeric_values(values)
            .map(|v| v.unsigned_abs() as f64)
            .collect();
        if magnitudes.is_empty() || magnitudes.iter().all(|&m| m == magnitudes[0]) {
            return false;
        }
        let average = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
        magnitudes.iter().any(|&m| m >= average * factor)
    })
}

/// Pairs with the widest spread between masters, widest first.
///
/// Whole tie groups are taken until at least `approx_amount` pairs are in,
/// so the result can be longer than asked for.
pub fn high_gamut(combined: &KernMap, approx_amount: usize) -> KernMap {
    let mut by_gamut: BTreeMap<Reverse<i64>, Vec<usize>> = BTreeMap::new();
    for (i, values) in combined.values().enumerate() {
        by_gamut.entry(Reverse(gamut(values))).or_default().push(i);
    }

    let mut output = KernMap::new();
    for indices in by_gamut.into_values() {
        if output.len() >= approx_amount {
            break;
        }
        for i in indices {
            if let Some((pair, values)) = combined.get_index(i) {
                output.insert(pair.clone(), values.clone());
            }
        }
    }
    output
}

/// Up to `amount / 2` pairs with the largest positive value followed by up to
/// `amount / 2` pairs with the most negative value. Each half is ordered by
/// the sum of its slots, highest first. A pair can appear in both halves.
pub fn largest_values(combined: &KernMap, amount: usize) -> Vec<(Pair, ValueList)> {
    let per_side = amount / 2;
    let entries: Vec<(&Pair, &ValueList)> = combined.iter().collect();
    let sums: Vec<i64> = entries
        .iter()
        .map(|(_, values)| numeric_values(values).sum())
        .collect();

    let extremes = |pick: fn(i64, i64) -> i64| -> Vec<i64> {
        entries
            .iter()
            .map(|(_, values)| numeric_values(values).reduce(pick).unwrap_or(0))
            .collect()
    };
    let maxima = extremes(i64::max);
    let minima = extremes(i64::min);

    let positive = top_indices(
        (0..entries.len()).filter(|&i| maxima[i] > 0),
        per_side,
        |i| Reverse(maxima[i]),
        &sums,
    );
    let negative = top_indices(
        (0..entries.len()).filter(|&i| minima[i] < 0),
        per_side,
        |i| minima[i],
        &sums,
    );

    positive
        .into_iter()
        .chain(negative)
        .map(|i| (entries[i].0.clone(), entries[i].1.clone()))
        .collect()
}

/// The `count` candidates ranking lowest by `rank`, ties resolved by input
/// position, then reordered by descending sum.
fn top_indices<K: Ord>(
    candidates: impl Iterator<Item = usize>,
    count: usize,
    rank: impl Fn(usize) -> K,
    sums: &[i64],
) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let mut selected: Vec<usize> = candidates.collect();
    if selected.len() > count {
        selected.select_nth_unstable_by(count - 1, |&a, &b| rank(a).cmp(&rank(b)).then(a.cmp(&b)));
        selected.truncate(count);
    }
    selected.sort_by_key(|&i| (Reverse(sums[i]), i));
    selected
}

/// Exceptions found in any master, in first-seen order, with their combined
/// values. Pairs the map does not know get all-unset values.
pub fn exceptions<M: KerningSource>(masters: &[M], combined: &KernMap) -> KernMap {
    let mut output = KernMap::new();
    let mut seen = HashSet::new();
    for master in masters {
        for pair in groups::exceptions(master) {
            if seen.insert(pair.clone()) {
                let values = combined
                    .get(&pair)
                    .cloned()
                    .unwrap_or_else(|| vec![None; masters.len()]);
                output.insert(pair, values);
            }
        }
    }
    output
}

/// Pairs whose average value magnitude stays below `threshold`.
pub fn small_average(combined: &KernMap, threshold: f64) -> KernMap {
    select(combined, |_, values| {
        let average = average_magnitude(values);
        -threshold < average && average < threshold
    })
}

/// Pairs with at least one group on either side.
pub fn group_pairs(combined: &KernMap) -> KernMap {
    select(combined, |pair, _| {
        is_group_name(&pair.left) || is_group_name(&pair.right)
    })
}
