//! Finding font sources on disk and reading the names they are sorted by.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{MACINTOSH, UTF_16BE};
use tracing::{debug, trace};
use ttf_parser::{PlatformId, name_id};

use crate::error::KernError;
use crate::style::{SortedStyles, sort_by_style_name};

/// Kinds of font source, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceKind {
    Ufo,
    Otf,
    Ttf,
}

impl SourceKind {
    pub fn of(path: &Path) -> Option<SourceKind> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "ufo" if path.is_dir() => Some(SourceKind::Ufo),
            "otf" if path.is_file() => Some(SourceKind::Otf),
            "ttf" if path.is_file() => Some(SourceKind::Ttf),
            _ => None,
        }
    }
}

/// All font sources below `directory` of the most preferred kind present:
/// UFOs if there are any, otherwise OTFs, otherwise TTFs. The paths are
/// sorted; a missing directory yields nothing.
pub fn font_paths(directory: &Path) -> Result<Vec<PathBuf>, KernError> {
    let mut found: Vec<(SourceKind, PathBuf)> = Vec::new();
    if directory.is_dir() {
        walk(directory, &mut found)?;
    }

    let Some(best) = found.iter().map(|(kind, _)| *kind).min() else {
        return Ok(Vec::new());
    };
    let mut paths: Vec<PathBuf> = found
        .into_iter()
        .filter(|(kind, _)| *kind == best)
        .map(|(_, path)| path)
        .collect();
    paths.sort();
    debug!("{} {:?} sources in {:?}", paths.len(), best, directory);
    Ok(paths)
}

fn walk(directory: &Path, found: &mut Vec<(SourceKind, PathBuf)>) -> Result<(), KernError> {
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        match SourceKind::of(&path) {
            Some(kind) => {
                trace!("found {:?}", path);
                found.push((kind, path));
            }
            // UFOs are packages, their contents are never sources themselves.
            None if path.is_dir() => walk(&path, found)?,
            None => {}
        }
    }
    Ok(())
}

/// The PostScript name of a UFO, OTF or TTF.
pub fn postscript_name(path: &Path) -> Result<String, KernError> {
    match SourceKind::of(path) {
        Some(SourceKind::Ufo) => ufo_postscript_name(path),
        Some(_) => binary_postscript_name(path),
        None => Err(KernError::FontParse(format!(
            "{} is not a UFO, OTF or TTF",
            path.display()
        ))),
    }
}

#[cfg(feature = "ufo")]
fn ufo_postscript_name(path: &Path) -> Result<String, KernError> {
    let font = norad::Font::load_requested_data(path, norad::DataRequest::none())?;
    let info = &font.font_info;
    if let Some(name) = info.postscript_font_name.as_deref().filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }
    let family = info.family_name.as_deref().unwrap_or("Family Name");
    let style = info.style_name.as_deref().unwrap_or("Style Name");
    Ok(format!("{}-{}", family.replace(' ', ""), style.replace(' ', "")))
}

#[cfg(not(feature = "ufo"))]
fn ufo_postscript_name(path: &Path) -> Result<String, KernError> {
    Err(KernError::FontParse(format!(
        "{} is a UFO, but UFO support is not enabled",
        path.display()
    )))
}

fn binary_postscript_name(path: &Path) -> Result<String, KernError> {
    let data = fs::read(path)?;
    let face = ttf_parser::Face::parse(&data, 0)?;

    face.names()
        .into_iter()
        .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
        .find_map(|name| {
            let (text, malformed) = match name.platform_id {
                PlatformId::Macintosh if name.encoding_id == 0 => {
                    MACINTOSH.decode_without_bom_handling(name.name)
                }
                PlatformId::Unicode | PlatformId::Windows => {
                    UTF_16BE.decode_without_bom_handling(name.name)
                }
                _ => return None,
            };
            (!malformed && !text.is_empty()).then(|| text.into_owned())
        })
        .ok_or_else(|| {
            KernError::FontParse(format!("{} has no PostScript name", path.display()))
        })
}

/// Font sources below `directory`, ordered by their PostScript names.
///
/// Sources whose name cannot be read are treated as unsortable.
pub fn sort_font_paths(
    directory: &Path,
    italics_interspersed: bool,
) -> Result<SortedStyles<PathBuf>, KernError> {
    let mut named = Vec::new();
    let mut unreadable = Vec::new();
    for path in font_paths(directory)? {
        match postscript_name(&path) {
            Ok(name) => named.push((path, name)),
            Err(e) => {
                debug!("cannot name {:?}: {}", path, e);
                unreadable.push(path);
            }
        }
    }

    let mut sorted = sort_by_style_name(named, italics_interspersed);
    sorted.unsortable.extend(unreadable);
    sorted.unsortable.sort();
    Ok(sorted)
}
