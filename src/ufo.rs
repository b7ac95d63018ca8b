//! Kerning masters stored as UFO sources.

use std::path::{Path, PathBuf};

use norad::{Font, Name};
use tracing::{debug, warn};

use crate::error::KernError;
use crate::fonts::{Groups, Kerning, KerningSink, KerningSource, MasterSnapshot};
use crate::types::Pair;
use crate::utils::round_half_even;

const GLYPH_ORDER_KEY: &str = "public.glyphOrder";

/// A UFO on disk, with its kerning read into memory.
///
/// Edits go to both the in-memory copy and the loaded font; nothing is
/// written back until [`UfoMaster::save`].
#[derive(Debug)]
pub struct UfoMaster {
    path: PathBuf,
    font: Font,
    snapshot: MasterSnapshot,
}

impl UfoMaster {
    pub fn load(path: impl AsRef<Path>) -> Result<UfoMaster, KernError> {
        let path = path.as_ref().to_path_buf();
        let font = Font::load(&path)?;
        let snapshot = snapshot_of(&font);
        debug!(
            "loaded {:?}: {} pairs, {} groups",
            path,
            snapshot.kerning().len(),
            snapshot.groups().len()
        );
        Ok(UfoMaster {
            path,
            font,
            snapshot,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Write the font back where it was loaded from.
    pub fn save(&self) -> Result<(), KernError> {
        self.save_as(&self.path)
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), KernError> {
        self.font.save(path.as_ref())?;
        Ok(())
    }
}

fn snapshot_of(font: &Font) -> MasterSnapshot {
    let style_name = font.font_info.style_name.clone().unwrap_or_default();

    let glyph_order: Vec<String> = match font
        .lib
        .get(GLYPH_ORDER_KEY)
        .and_then(|value| value.as_array())
    {
        Some(names) => names
            .iter()
            .filter_map(|name| name.as_string())
            .map(str::to_string)
            .collect(),
        None => font
            .default_layer()
            .iter()
            .map(|glyph| glyph.name().to_string())
            .collect(),
    };

    let mut snapshot = MasterSnapshot::new(style_name).with_glyph_order(glyph_order);
    for (name, members) in &font.groups {
        snapshot = snapshot.with_group(name.to_string(), members.iter().map(|m| m.to_string()));
    }
    for (left, row) in &font.kerning {
        for (right, value) in row {
            let pair = Pair::new(left.to_string(), right.to_string());
            snapshot = snapshot.with_kerning(pair, round_half_even(*value));
        }
    }
    snapshot
}

fn names(pair: &Pair) -> Result<(Name, Name), KernError> {
    Ok((Name::new(&pair.left)?, Name::new(&pair.right)?))
}

impl KerningSource for UfoMaster {
    fn kerning(&self) -> &Kerning {
        self.snapshot.kerning()
    }

    fn groups(&self) -> &Groups {
        self.snapshot.groups()
    }

    fn glyph_order(&self) -> &[String] {
        self.snapshot.glyph_order()
    }

    fn style_name(&self) -> &str {
        self.snapshot.style_name()
    }

    fn glyph_position(&self, glyph: &str) -> Option<usize> {
        self.snapshot.glyph_position(glyph)
    }
}

impl KerningSink for UfoMaster {
    fn check_pair(&self, pair: &Pair) -> Result<(), KernError> {
        names(pair).map(|_| ())
    }

    fn set_kerning(&mut self, pair: &Pair, value: Option<i64>) -> Result<(), KernError> {
        let (left, right) = names(pair).inspect_err(|e| {
            warn!("cannot store {} in {:?}: {}", pair, self.path, e);
        })?;
        self.snapshot.set_kerning(pair, value)?;

        match value {
            Some(value) => {
                self.font
                    .kerning
                    .entry(left)
                    .or_default()
                    .insert(right, value as f64);
            }
            None => {
                if let Some(row) = self.font.kerning.get_mut(&left) {
                    row.remove(&right);
                    if row.is_empty() {
                        self.font.kerning.remove(&left);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::KerningSession;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn write_ufo(path: &Path) {
        let mut font = Font::new();
        font.font_info.style_name = Some("Bold".to_string());
        for glyph in ["V", "A", "O"] {
            font.default_layer_mut().insert_glyph(norad::Glyph::new(glyph));
        }
        font.groups
            .insert(name("public.kern2.O"), vec![name("O")]);
        font.kerning
            .entry(name("A"))
            .or_default()
            .insert(name("V"), -80.5);
        font.kerning
            .entry(name("V"))
            .or_default()
            .insert(name("public.kern2.O"), -30.);
        font.save(path).unwrap();
    }

    #[test]
    fn reads_kerning_groups_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Family-Bold.ufo");
        write_ufo(&path);

        let master = UfoMaster::load(&path).unwrap();
        assert_eq!(master.style_name(), "Bold");
        assert_eq!(master.kerning_value(&Pair::new("A", "V")), Some(-80));
        assert_eq!(
            master.kerning_value(&Pair::new("V", "public.kern2.O")),
            Some(-30)
        );
        assert_eq!(master.groups()["public.kern2.O"], vec!["O".to_string()]);
        // without a stored order, the default layer supplies the glyphs
        let mut order = master.glyph_order().to_vec();
        order.sort();
        assert_eq!(order, vec!["A", "O", "V"]);
    }

    #[test]
    fn edits_survive_saving() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Family-Bold.ufo");
        write_ufo(&path);

        let mut master = UfoMaster::load(&path).unwrap();
        master.set_kerning(&Pair::new("A", "V"), None).unwrap();
        master.set_kerning(&Pair::new("O", "A"), Some(12)).unwrap();
        master.save().unwrap();

        let reloaded = UfoMaster::load(&path).unwrap();
        assert_eq!(reloaded.kerning_value(&Pair::new("A", "V")), None);
        assert_eq!(reloaded.kerning_value(&Pair::new("O", "A")), Some(12));
        assert!(!reloaded.font().kerning.contains_key(&name("A")));
    }

    #[test_log::test]
    fn invalid_names_leave_everything_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut masters = Vec::new();
        for style in ["Light", "Regular", "Bold"] {
            let path = dir.path().join(format!("Family-{}.ufo", style));
            write_ufo(&path);
            masters.push(UfoMaster::load(&path).unwrap());
        }

        let pair = Pair::new("", "V");
        assert!(matches!(
            masters[0].set_kerning(&pair, Some(10)),
            Err(KernError::UfoError(_))
        ));
        assert_eq!(masters[0].kerning_value(&pair), None);

        let mut session = KerningSession::new(masters);
        let before = session.map().clone();
        let err = session
            .update_pair(&pair, vec![Some(10), Some(20), Some(30)])
            .unwrap_err();
        assert!(matches!(err, KernError::UfoError(_)));
        assert_eq!(session.map(), &before);
        assert!(session.masters().iter().all(|m| m.kerning_value(&pair).is_none()));
    }

    #[test]
    fn missing_ufo_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let err = UfoMaster::load(dir.path().join("Nothing.ufo")).unwrap_err();
        assert!(matches!(err, KernError::UfoError(_)));
    }
}
