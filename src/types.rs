use std::fmt;

use indexmap::IndexMap;

/// Prefix shared by every kerning group name.
pub const GROUP_PREFIX: &str = "public.kern";
/// Prefix of groups used on the left side of a pair.
pub const LEFT_GROUP_PREFIX: &str = "public.kern1.";
/// Prefix of groups used on the right side of a pair.
pub const RIGHT_GROUP_PREFIX: &str = "public.kern2.";

/// What a pair side refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    LeftGroup,
    RightGroup,
    Glyph,
}

impl Side {
    /// Classify an identifier by its naming convention.
    pub fn of(name: &str) -> Side {
        if name.starts_with(LEFT_GROUP_PREFIX) {
            Side::LeftGroup
        } else if name.starts_with(RIGHT_GROUP_PREFIX) {
            Side::RightGroup
        } else {
            Side::Glyph
        }
    }

    pub fn is_group(self) -> bool {
        self != Side::Glyph
    }
}

/// A left/right kerning context. Either side may name a glyph or a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    pub left: String,
    pub right: String,
}

impl Pair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Pair {
        Pair {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn left_side(&self) -> Side {
        Side::of(&self.left)
    }

    pub fn right_side(&self) -> Side {
        Side::of(&self.right)
    }

    /// True when either side carries the group prefix, whatever the side tag.
    pub fn has_group(&self) -> bool {
        is_group_name(&self.left) || is_group_name(&self.right)
    }
}

impl<L: Into<String>, R: Into<String>> From<(L, R)> for Pair {
    fn from((left, right): (L, R)) -> Self {
        Pair::new(left, right)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.left, self.right)
    }
}

pub(crate) fn is_group_name(name: &str) -> bool {
    name.starts_with(GROUP_PREFIX)
}

/// One optional kerning value per master, in master order.
/// `None` means the master has no explicit value for the pair.
pub type ValueList = Vec<Option<i64>>;

/// Pair to per-master values, in a deterministic iteration order.
pub type KernMap = IndexMap<Pair, ValueList>;

/// Human-readable rendering of a value list, leaving unset slots blank.
pub struct Values<'a>(pub &'a [Option<i64>]);

impl fmt::Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match value {
                Some(v) => write!(f, "{:>6}", v)?,
                None => write!(f, "{:>6}", "-")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_follows_prefix() {
        assert_eq!(Side::of("public.kern1.O"), Side::LeftGroup);
        assert_eq!(Side::of("public.kern2.O"), Side::RightGroup);
        assert_eq!(Side::of("O"), Side::Glyph);
        assert!(!Side::of("public.kernel").is_group());
    }

    #[test]
    fn pairs_order_lexicographically() {
        let mut pairs = vec![Pair::new("b", "a"), Pair::new("a", "z"), Pair::new("a", "b")];
        pairs.sort();
        assert_eq!(
            pairs,
            vec![Pair::new("a", "b"), Pair::new("a", "z"), Pair::new("b", "a")]
        );
    }

    #[test]
    fn values_display() {
        let values = [Some(-40), None, Some(0)];
        assert_eq!(Values(&values).to_string(), "   -40      -      0");
    }
}
