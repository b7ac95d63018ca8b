//! Group membership lookups, representative glyphs and kerning exceptions.
//!
//! An exception is a kerning rule that is more specific than another rule
//! covering the same glyphs: a glyph/glyph pair next to the group/group pair
//! of the groups those glyphs belong to, for example. Editing the general
//! rule leaves the exception untouched, which is why they are worth listing.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::fonts::{Groups, KerningSource};
use crate::types::{LEFT_GROUP_PREFIX, Pair, RIGHT_GROUP_PREFIX, is_group_name};

/// Which left and right kerning group each glyph belongs to.
///
/// A glyph listed in several groups of the same side ends up in the last one,
/// with groups visited in name order.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    left: HashMap<String, String>,
    right: HashMap<String, String>,
}

impl GroupIndex {
    pub fn new(groups: &Groups) -> GroupIndex {
        let mut index = GroupIndex::default();
        for (name, members) in groups {
            let side = if name.starts_with(LEFT_GROUP_PREFIX) {
                &mut index.left
            } else if name.starts_with(RIGHT_GROUP_PREFIX) {
                &mut index.right
            } else {
                continue;
            };
            for glyph in members {
                if let Some(previous) = side.insert(glyph.clone(), name.clone()) {
                    debug!("{} is in both {} and {}, keeping {}", glyph, previous, name, name);
                }
            }
        }
        index
    }

    pub fn from_source<M: KerningSource + ?Sized>(master: &M) -> GroupIndex {
        GroupIndex::new(master.groups())
    }

    pub fn left_group(&self, glyph: &str) -> Option<&str> {
        self.left.get(glyph).map(String::as_str)
    }

    pub fn right_group(&self, glyph: &str) -> Option<&str> {
        self.right.get(glyph).map(String::as_str)
    }

    fn left_or_self<'a>(&'a self, item: &'a str) -> &'a str {
        self.left_group(item).unwrap_or(item)
    }

    fn right_or_self<'a>(&'a self, item: &'a str) -> &'a str {
        self.right_group(item).unwrap_or(item)
    }
}

/// Glyphs that can stand in for `pair` when previewing it in `master`.
///
/// Groups resolve to their member that comes first in the glyph order.
/// Returns `None` if a side is neither a group nor a glyph of this master,
/// or names a group with no member in the glyph order.
pub fn representative_pair<M: KerningSource + ?Sized>(
    master: &M,
    pair: &Pair,
) -> Option<(String, String)> {
    let left = representative_glyph(master, &pair.left)?;
    let right = representative_glyph(master, &pair.right)?;
    Some((left, right))
}

fn representative_glyph<M: KerningSource + ?Sized>(master: &M, item: &str) -> Option<String> {
    if let Some(members) = master.groups().get(item) {
        return members
            .iter()
            .filter_map(|glyph| master.glyph_position(glyph).map(|pos| (pos, glyph)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, glyph)| glyph.clone());
    }
    master.glyph_position(item).map(|_| item.to_string())
}

/// All pairs of `master` that coexist with a less or more specific rule for
/// the same glyphs, sorted by pair.
pub fn exceptions<M: KerningSource + ?Sized>(master: &M) -> Vec<Pair> {
    let index = GroupIndex::from_source(master);

    let mut group_group = HashSet::new();
    let mut glyph_group = HashSet::new();
    let mut group_glyph = HashSet::new();
    let mut glyph_glyph = Vec::new();
    for pair in master.kerning().keys() {
        match (is_group_name(&pair.left), is_group_name(&pair.right)) {
            (true, true) => {
                group_group.insert(pair);
            }
            (false, true) => {
                glyph_group.insert(pair);
            }
            (true, false) => {
                group_glyph.insert(pair);
            }
            (false, false) => glyph_glyph.push(pair),
        }
    }

    let mut flagged = BTreeSet::new();
    let mut covered = HashSet::new();

    // Kerning keys iterate in order, so the HashSets are only used for lookups.
    for pair in master.kerning().keys() {
        let counterpart = if group_glyph.contains(pair) {
            Pair::new(pair.left.as_str(), index.right_or_self(&pair.right))
        } else if glyph_group.contains(pair) {
            Pair::new(index.left_or_self(&pair.left), pair.right.as_str())
        } else {
            continue;
        };
        if group_group.contains(&counterpart) {
            flagged.insert(pair.clone());
            flagged.insert(counterpart);
            covered.insert(pair.clone());
        }
    }

    for pair in glyph_glyph {
        let left_group = index.left_or_self(&pair.left);
        let right_group = index.right_or_self(&pair.right);
        let candidates = [
            (Pair::new(left_group, pair.right.as_str()), &group_glyph),
            (Pair::new(pair.left.as_str(), right_group), &glyph_group),
            (Pair::new(left_group, right_group), &group_group),
        ];
        for (counterpart, class) in candidates {
            if class.contains(&counterpart) && !covered.contains(&counterpart) {
                flagged.insert(pair.clone());
                flagged.insert(counterpart.clone());
                covered.insert(counterpart);
            }
        }
    }

    debug!(
        "{}: {} pairs involved in exceptions",
        master.style_name(),
        flagged.len()
    );
    flagged.into_iter().collect()
}

/// Narrow `pairs` down to those involving the given items.
///
/// A glyph item also matches the group it belongs to on that side. Blank or
/// absent items do not filter.
pub fn filter_by_items(
    index: &GroupIndex,
    pairs: &[Pair],
    left: Option<&str>,
    right: Option<&str>,
) -> Vec<Pair> {
    let left = left.map(str::trim).filter(|s| !s.is_empty());
    let right = right.map(str::trim).filter(|s| !s.is_empty());
    if left.is_none() && right.is_none() {
        return pairs.to_vec();
    }

    let matches = |item: Option<&str>, group: Option<&str>, side: &str| match item {
        None => true,
        Some(item) => side == item || group == Some(side),
    };
    let left_group = left.and_then(|item| index.left_group(item));
    let right_group = right.and_then(|item| index.right_group(item));

    pairs
        .iter()
        .filter(|pair| {
            matches(left, left_group, &pair.left) && matches(right, right_group, &pair.right)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fonts::MasterSnapshot;

    fn master() -> MasterSnapshot {
        MasterSnapshot::new("Regular")
            .with_glyph_order(["A", "Aacute", "O", "V", "W", "a", "b", "o"])
            .with_group("public.kern1.A", ["Aacute", "A"])
            .with_group("public.kern2.V", ["W", "V"])
            .with_group("public.kern1.O", ["O"])
            .with_group("public.kern2.o", ["o", "missing"])
    }

    #[test]
    fn index_maps_glyphs_to_groups() {
        let index = GroupIndex::from_source(&master());
        assert_eq!(index.left_group("A"), Some("public.kern1.A"));
        assert_eq!(index.right_group("A"), None);
        assert_eq!(index.right_group("W"), Some("public.kern2.V"));
    }

    #[test]
    fn last_group_in_name_order_wins() {
        let master = MasterSnapshot::new("Regular")
            .with_group("public.kern1.b", ["x"])
            .with_group("public.kern1.a", ["x"]);
        let index = GroupIndex::from_source(&master);
        assert_eq!(index.left_group("x"), Some("public.kern1.b"));
    }

    #[test]
    fn representative_uses_glyph_order() {
        let master = master();
        assert_eq!(
            representative_pair(&master, &Pair::new("public.kern1.A", "public.kern2.V")),
            Some(("A".to_string(), "V".to_string()))
        );
        assert_eq!(
            representative_pair(&master, &Pair::new("O", "public.kern2.o")),
            Some(("O".to_string(), "o".to_string()))
        );
    }

    #[test]
    fn representative_of_unknown_item_is_none() {
        let master = master();
        assert_eq!(representative_pair(&master, &Pair::new("A", "zeta")), None);
        assert_eq!(
            representative_pair(&master, &Pair::new("public.kern1.X", "V")),
            None
        );
    }

    #[test]
    fn glyph_pair_inside_kerned_groups_is_exception() {
        let master = MasterSnapshot::new("Regular")
            .with_glyph_order(["a", "b", "c"])
            .with_group("public.kern1.X", ["a"])
            .with_group("public.kern2.Y", ["b"])
            .with_kerning(("public.kern1.X", "public.kern2.Y"), -20)
            .with_kerning(("a", "b"), -35)
            .with_kerning(("c", "b"), 10);
        assert_eq!(
            exceptions(&master),
            vec![
                Pair::new("a", "b"),
                Pair::new("public.kern1.X", "public.kern2.Y")
            ]
        );
    }

    #[test]
    fn group_pair_is_claimed_by_first_glyph_pair_only() {
        let master = MasterSnapshot::new("Regular")
            .with_glyph_order(["a", "a2", "b"])
            .with_group("public.kern1.X", ["a", "a2"])
            .with_group("public.kern2.Y", ["b"])
            .with_kerning(("public.kern1.X", "public.kern2.Y"), -20)
            .with_kerning(("a", "b"), -35)
            .with_kerning(("a2", "b"), -30);
        assert_eq!(
            exceptions(&master),
            vec![
                Pair::new("a", "b"),
                Pair::new("public.kern1.X", "public.kern2.Y")
            ]
        );
    }

    #[test]
    fn covered_mixed_pair_is_skipped_for_glyph_pairs() {
        // (X, b) is claimed against (X, Y) first, so glyph pairs only reach
        // (X, Y), and only once.
        let master = MasterSnapshot::new("Regular")
            .with_glyph_order(["a", "a2", "b"])
            .with_group("public.kern1.X", ["a", "a2"])
            .with_group("public.kern2.Y", ["b"])
            .with_kerning(("public.kern1.X", "public.kern2.Y"), -20)
            .with_kerning(("public.kern1.X", "b"), -25)
            .with_kerning(("a", "b"), -35)
            .with_kerning(("a2", "b"), -30);
        assert_eq!(
            exceptions(&master),
            vec![
                Pair::new("a", "b"),
                Pair::new("public.kern1.X", "b"),
                Pair::new("public.kern1.X", "public.kern2.Y"),
            ]
        );
    }

    #[test]
    fn mixed_pairs_against_group_pairs() {
        let master = master()
            .with_kerning(("public.kern1.A", "public.kern2.V"), -60)
            .with_kerning(("public.kern1.A", "W"), -40)
            .with_kerning(("Aacute", "public.kern2.V"), -50)
            .with_kerning(("public.kern1.O", "V"), -30);
        assert_eq!(
            exceptions(&master),
            vec![
                Pair::new("Aacute", "public.kern2.V"),
                Pair::new("public.kern1.A", "W"),
                Pair::new("public.kern1.A", "public.kern2.V"),
            ]
        );
    }

    #[test]
    fn glyph_pair_against_mixed_pair() {
        let master = master()
            .with_kerning(("public.kern1.O", "V"), -30)
            .with_kerning(("O", "V"), -25)
            .with_kerning(("b", "public.kern2.o"), 5)
            .with_kerning(("b", "o"), 0);
        assert_eq!(
            exceptions(&master),
            vec![
                Pair::new("O", "V"),
                Pair::new("b", "o"),
                Pair::new("b", "public.kern2.o"),
                Pair::new("public.kern1.O", "V"),
            ]
        );
    }

    #[test]
    fn no_groups_no_exceptions() {
        let master = MasterSnapshot::new("Regular")
            .with_kerning(("A", "V"), -50)
            .with_kerning(("V", "A"), -50);
        assert!(exceptions(&master).is_empty());
    }

    #[test]
    fn filtering_by_glyph_includes_its_group() {
        let index = GroupIndex::from_source(&master());
        let pairs = vec![
            Pair::new("A", "V"),
            Pair::new("public.kern1.A", "public.kern2.V"),
            Pair::new("O", "V"),
            Pair::new("A", "o"),
        ];
        assert_eq!(
            filter_by_items(&index, &pairs, Some("A"), Some("W")),
            vec![Pair::new("public.kern1.A", "public.kern2.V")]
        );
        assert_eq!(
            filter_by_items(&index, &pairs, Some("Aacute"), None),
            vec![Pair::new("public.kern1.A", "public.kern2.V")]
        );
        assert_eq!(filter_by_items(&index, &pairs, Some(" "), None), pairs);
    }
}
