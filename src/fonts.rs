//! The data-access seam between the analysis code and whatever application
//! or file format actually holds the fonts.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use crate::error::KernError;
use crate::types::Pair;

/// Explicit kerning of one master, iterated in pair order.
pub type Kerning = BTreeMap<Pair, i64>;

/// Group name to ordered member glyph names, iterated in name order.
pub type Groups = BTreeMap<String, Vec<String>>;

/// Read access to one master.
pub trait KerningSource: Debug {
    fn kerning(&self) -> &Kerning;
    fn groups(&self) -> &Groups;
    fn glyph_order(&self) -> &[String];
    fn style_name(&self) -> &str;

    fn kerning_value(&self, pair: &Pair) -> Option<i64> {
        self.kerning().get(pair).copied()
    }

    /// Position of `glyph` in the glyph order.
    fn glyph_position(&self, glyph: &str) -> Option<usize> {
        self.glyph_order().iter().position(|g| g == glyph)
    }
}

macro_rules! forward_source {
    ($($ty:ty),*) => {$(
        impl<T: KerningSource + ?Sized> KerningSource for $ty {
            fn kerning(&self) -> &Kerning {
                (**self).kerning()
            }

            fn groups(&self) -> &Groups {
                (**self).groups()
            }

            fn glyph_order(&self) -> &[String] {
                (**self).glyph_order()
            }

            fn style_name(&self) -> &str {
                (**self).style_name()
            }

            fn glyph_position(&self, glyph: &str) -> Option<usize> {
                (**self).glyph_position(glyph)
            }
        }
    )*};
}

forward_source!(&T, Box<T>);

/// Write access to one master's kerning.
pub trait KerningSink {
    /// Fails if this master cannot store `pair` at all. Nothing is changed.
    fn check_pair(&self, _pair: &Pair) -> Result<(), KernError> {
        Ok(())
    }

    /// Set `pair` to `value`, or remove it when `value` is `None`.
    fn set_kerning(&mut self, pair: &Pair, value: Option<i64>) -> Result<(), KernError>;
}

/// A plain in-memory copy of the kerning-relevant parts of a master.
#[derive(Debug, Clone, Default)]
pub struct MasterSnapshot {
    style_name: String,
    kerning: Kerning,
    groups: Groups,
    glyph_order: Vec<String>,
    positions: HashMap<String, usize>,
}

impl MasterSnapshot {
    pub fn new(style_name: impl Into<String>) -> Self {
        MasterSnapshot {
            style_name: style_name.into(),
            ..Default::default()
        }
    }

    pub fn with_glyph_order<I, S>(mut self, glyphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.glyph_order = glyphs.into_iter().map(Into::into).collect();
        self.positions.clear();
        for (i, glyph) in self.glyph_order.iter().enumerate() {
            // first occurrence wins, as a linear search would find it
            self.positions.entry(glyph.clone()).or_insert(i);
        }
        self
    }

    pub fn with_group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_kerning(mut self, pair: impl Into<Pair>, value: i64) -> Self {
        self.kerning.insert(pair.into(), value);
        self
    }
}

impl KerningSource for MasterSnapshot {
    fn kerning(&self) -> &Kerning {
        &self.kerning
    }

    fn groups(&self) -> &Groups {
        &self.groups
    }

    fn glyph_order(&self) -> &[String] {
        &self.glyph_order
    }

    fn style_name(&self) -> &str {
        &self.style_name
    }

    fn glyph_position(&self, glyph: &str) -> Option<usize> {
        self.positions.get(glyph).copied()
    }
}

impl KerningSink for MasterSnapshot {
    fn set_kerning(&mut self, pair: &Pair, value: Option<i64>) -> Result<(), KernError> {
        match value {
            Some(value) => {
                self.kerning.insert(pair.clone(), value);
            }
            None => {
                self.kerning.remove(pair);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_lookup_and_edit() {
        let mut master = MasterSnapshot::new("Bold")
            .with_glyph_order(["A", "V", "A"])
            .with_kerning(("A", "V"), -80);

        assert_eq!(master.glyph_position("A"), Some(0));
        assert_eq!(master.glyph_position("V"), Some(1));
        assert_eq!(master.glyph_position("W"), None);
        assert_eq!(master.kerning_value(&Pair::new("A", "V")), Some(-80));

        master.set_kerning(&Pair::new("A", "V"), Some(0)).unwrap();
        assert_eq!(master.kerning_value(&Pair::new("A", "V")), Some(0));
        master.set_kerning(&Pair::new("A", "V"), None).unwrap();
        assert_eq!(master.kerning_value(&Pair::new("A", "V")), None);
        assert!(master.kerning().is_empty());
    }
}
