//! Ordering masters by what their style names say about optical size, width
//! and weight.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::data::*;

struct Axis {
    terms: Vec<(usize, &'static str, Regex)>,
    normal: usize,
    ignore_spaces: bool,
}

impl Axis {
    fn new(names: &'static [&'static [&'static str]], normal: usize, ignore_spaces: bool) -> Axis {
        let terms = names
            .iter()
            .enumerate()
            .flat_map(|(position, spellings)| {
                spellings.iter().map(move |&term| {
                    let pattern = format!("(?i){}", regex::escape(term));
                    let regex = Regex::new(&pattern).expect("escaped vocabulary term");
                    (position, term, regex)
                })
            })
            .collect();
        Axis {
            terms,
            normal,
            ignore_spaces,
        }
    }

    /// Position of the longest term found in `name`. Between terms of equal
    /// length the later position wins.
    fn position(&self, name: &str) -> Option<usize> {
        let subject: Cow<str> = if self.ignore_spaces {
            Cow::Owned(name.replace(' ', ""))
        } else {
            Cow::Borrowed(name)
        };
        self.terms
            .iter()
            .filter(|(_, _, regex)| regex.is_match(&subject))
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then(a.0.cmp(&b.0)))
            .map(|(position, _, _)| *position)
    }
}

static OPTICAL_SIZE: LazyLock<Axis> =
    LazyLock::new(|| Axis::new(OPTICAL_SIZE_NAMES, OPTICAL_SIZE_NORMAL, false));
static WIDTH: LazyLock<Axis> = LazyLock::new(|| Axis::new(WIDTH_NAMES, WIDTH_NORMAL, true));
static WEIGHT: LazyLock<Axis> = LazyLock::new(|| Axis::new(WEIGHT_NAMES, WEIGHT_REGULAR, true));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)it(alic)?").expect("italic pattern"));
static NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*$").expect("suffix pattern"));

/// Where a style name sits on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleScore {
    pub optical_size: usize,
    pub width: usize,
    pub weight: usize,
    /// Trailing number of the name, capped at 99.
    pub suffix: u64,
    pub italic: bool,
    /// Whether any axis term was found. Unmatched names use the defaults.
    pub matched: bool,
}

impl StyleScore {
    pub fn of(name: &str) -> StyleScore {
        let optical_size = OPTICAL_SIZE.position(name);
        let width = WIDTH.position(name);
        let weight = WEIGHT.position(name);
        let suffix = NUMBER_SUFFIX
            .captures(name)
            .and_then(|c| c[1].parse::<u64>().ok())
            .map_or(0, |n| n.min(99));

        StyleScore {
            optical_size: optical_size.unwrap_or(OPTICAL_SIZE.normal),
            width: width.unwrap_or(WIDTH.normal),
            weight: weight.unwrap_or(WEIGHT.normal),
            suffix,
            italic: ITALIC.is_match(name),
            matched: optical_size.is_some() || width.is_some() || weight.is_some(),
        }
    }

    /// Composite sort key: three digits each for optical size, width and
    /// weight, two for the suffix, and with interspersed italics one more for
    /// the italic flag. Otherwise italics are pushed past every upright weight.
    pub fn key(&self, italics_interspersed: bool) -> u64 {
        let mut weight = self.weight as u64;
        if self.italic && !italics_interspersed {
            weight += ITALIC_WEIGHT_OFFSET as u64;
        }
        let key = ((self.optical_size as u64 * 1000 + self.width as u64) * 1000 + weight) * 100
            + self.suffix;
        if italics_interspersed {
            key * 10 + self.italic as u64
        } else {
            key
        }
    }
}

/// Result of [`sort_by_style_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct SortedStyles<T> {
    /// Instances whose names matched at least one axis, in axis order.
    pub sorted: Vec<T>,
    /// Instances whose names matched nothing, in input order.
    pub unsortable: Vec<T>,
}

impl<T> SortedStyles<T> {
    /// Sorted instances followed by the unsortable ones.
    pub fn into_ordered(self) -> Vec<T> {
        let mut ordered = self.sorted;
        ordered.extend(self.unsortable);
        ordered
    }
}

struct Candidate<T> {
    id: T,
    name: String,
    key: u64,
    matched: bool,
}

/// Order instances by the optical size, width and weight their style names
/// describe.
///
/// An identifier listed more than once is sorted by its lowest key. Equal
/// keys keep their input order.
pub fn sort_by_style_name<T, S, I>(instances: I, italics_interspersed: bool) -> SortedStyles<T>
where
    T: PartialEq,
    S: AsRef<str>,
    I: IntoIterator<Item = (T, S)>,
{
    let mut candidates: Vec<Candidate<T>> = Vec::new();
    for (id, name) in instances {
        let name = name.as_ref();
        let score = StyleScore::of(name);
        let key = score.key(italics_interspersed);
        debug!("style {:?} scored {} ({:?})", name, key, score);

        match candidates.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                if score.matched && !existing.matched {
                    existing.key = key;
                    existing.matched = true;
                } else if score.matched == existing.matched {
                    existing.key = existing.key.min(key);
                }
            }
            None => candidates.push(Candidate {
                id,
                name: name.to_string(),
                key,
                matched: score.matched,
            }),
        }
    }

    let (mut sorted, unsortable): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|c| c.matched);
    sorted.sort_by_key(|c| c.key);
    for candidate in &unsortable {
        warn!("could not sort style {:?}", candidate.name);
    }

    SortedStyles {
        sorted: sorted.into_iter().map(|c| c.id).collect(),
        unsortable: unsortable.into_iter().map(|c| c.id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn order(names: &[&'static str], italics_interspersed: bool) -> Vec<&'static str> {
        sort_by_style_name(names.iter().map(|&n| (n, n)), italics_interspersed).into_ordered()
    }

    #[test]
    fn longest_term_wins() {
        assert_eq!(StyleScore::of("ExtraCondensed Bold").width, 0);
        assert_eq!(StyleScore::of("Bold Condensed").width, 2);
        assert_eq!(StyleScore::of("Semi Condensed").width, 3);
        assert_eq!(StyleScore::of("ExtraLight").weight, 3);
        assert_eq!(StyleScore::of("SmallText").optical_size, 4);
    }

    #[test]
    fn equal_length_terms_take_the_later_position() {
        // "subh" and "text" are both four letters
        assert_eq!(StyleScore::of("Subh Text").optical_size, 7);
        assert_eq!(StyleScore::of("Text Subh").optical_size, 7);
    }

    #[test]
    fn width_then_weight() {
        assert_eq!(
            order(&["Bold Condensed", "Light", "Regular", "ExtraCondensed Bold"], false),
            vec!["ExtraCondensed Bold", "Bold Condensed", "Light", "Regular"]
        );
    }

    #[test]
    fn weights_in_vocabulary_order() {
        assert_eq!(
            order(&["Black", "Thin", "SemiBold", "Regular", "ExtraLight"], false),
            vec!["Thin", "ExtraLight", "Regular", "SemiBold", "Black"]
        );
    }

    #[test]
    fn optical_size_comes_first() {
        assert_eq!(
            order(&["Display", "Caption", "Regular", "Text"], false),
            vec!["Caption", "Text", "Regular", "Display"]
        );
    }

    #[test]
    fn italics_after_romans_or_interspersed() {
        let names = ["Bold Italic", "Regular Italic", "Regular", "Bold"];
        assert_eq!(
            order(&names, false),
            vec!["Regular", "Bold", "Regular Italic", "Bold Italic"]
        );
        assert_eq!(
            order(&names, true),
            vec!["Regular", "Regular Italic", "Bold", "Bold Italic"]
        );
    }

    #[test]
    fn key_layout() {
        let score = StyleScore::of("Bold Italic 3");
        assert_eq!(score.suffix, 3);
        assert_eq!(score.key(false), 6_004_110_03);
        assert_eq!(score.key(true), 6_004_010_031);
    }

    #[test]
    fn numeric_suffix_breaks_ties() {
        assert_eq!(order(&["Light 2", "Light 1"], false), vec!["Light 1", "Light 2"]);
    }

    #[test]
    fn unmatched_names_go_last_in_input_order() {
        let sorted = sort_by_style_name([("foo", "Foo"), ("bold", "Bold"), ("bar", "Bar")], false);
        assert_eq!(sorted.sorted, vec!["bold"]);
        assert_eq!(sorted.unsortable, vec!["foo", "bar"]);
        assert_eq!(sorted.into_ordered(), vec!["bold", "foo", "bar"]);
    }

    #[test]
    fn repeated_identifier_uses_lowest_key() {
        let sorted = sort_by_style_name(
            [("a", "Foo"), ("b", "Light"), ("a", "Bold"), ("a", "Black")],
            false,
        );
        assert_eq!(sorted.sorted, vec!["b", "a"]);
        assert!(sorted.unsortable.is_empty());
    }
}
