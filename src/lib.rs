//! Kerning analysis across the masters of a font family
//!
//! This library combines the explicit kerning of several masters into one
//! table, finds suspicious pairs in it, resolves kerning groups and
//! exceptions, edits values across masters, and orders masters by style name.

mod aggregate;
mod classify;
mod data;
mod error;
mod fonts;
mod groups;
mod interpolate;
mod output;
mod session;
mod source;
mod style;
mod types;
#[cfg(feature = "ufo")]
mod ufo;
mod utils;

// Re-export error type
pub use error::KernError;

// Re-export the data-access seam
pub use fonts::{Groups, Kerning, KerningSink, KerningSource, MasterSnapshot};

// Re-export analysis API
pub use aggregate::{aggregate, values_for};
pub use classify::{
    Filter, classify, exceptions as exception_map, group_pairs, high_gamut, largest_values,
    outliers, same_value, single_pairs, small_average, zero_value,
};
pub use groups::{GroupIndex, exceptions, filter_by_items, representative_pair};
pub use interpolate::{MIN_MASTERS, average, cleared, interpolate, interpolate_targets, nudge, transfer};
pub use output::{FilterSummary, PairTable, Report};
pub use session::{AnalysisConfig, KerningSession, SessionBuilder};
pub use source::{SourceKind, font_paths, postscript_name, sort_font_paths};
pub use style::{SortedStyles, StyleScore, sort_by_style_name};
#[cfg(feature = "ufo")]
pub use ufo::UfoMaster;

// Re-export public types
pub use types::{
    GROUP_PREFIX, KernMap, LEFT_GROUP_PREFIX, Pair, RIGHT_GROUP_PREFIX, Side, ValueList, Values,
};
