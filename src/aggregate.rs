use std::collections::BTreeSet;

use tracing::debug;

use crate::fonts::KerningSource;
use crate::types::{KernMap, Pair, ValueList};

/// Combine the kerning of all masters into one map.
///
/// Every pair kerned in at least one master gets a value list with one slot
/// per master, `None` where that master has no explicit value. Entries are
/// ordered by pair.
pub fn aggregate<M: KerningSource>(masters: &[M]) -> KernMap {
    let pairs: BTreeSet<&Pair> = masters
        .iter()
        .flat_map(|master| master.kerning().keys())
        .collect();

    let combined: KernMap = pairs
        .into_iter()
        .map(|pair| (pair.clone(), values_for(masters, pair)))
        .collect();

    debug!(
        "combined {} pairs across {} masters",
        combined.len(),
        masters.len()
    );
    combined
}

/// The per-master values of a single pair.
pub fn values_for<M: KerningSource>(masters: &[M], pair: &Pair) -> ValueList {
    masters
        .iter()
        .map(|master| master.kerning_value(pair))
        .collect()
}
