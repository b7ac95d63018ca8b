//! Style-name vocabularies, one list per design axis, ordered from the
//! smallest to the largest position on that axis. Each position may be
//! spelled several ways.

pub(crate) const OPTICAL_SIZE_NAMES: &[&[&str]] = &[
    &["null"],
    &["caption", "capt"],
    &["5pt"],
    &["7pt"],
    &["smalltext", "smtxt"],
    &["text"],
    &["normal"],
    &["subhead", "subh"],
    &["display", "disp"],
    &["large"],
    &["poster"],
];
pub(crate) const OPTICAL_SIZE_NORMAL: usize = 6;

pub(crate) const WIDTH_NAMES: &[&[&str]] = &[
    &["extracondensed", "extracond", "xcondensed", "xcond"],
    &["narrow"],
    &["condensed", "cond", "cnd"],
    &["semicondensed", "semicond", "semicnd", "semicn"],
    &["normal"],
    &["extended"],
    &["wide"],
    &["xwide"],
    &["expanded"],
];
pub(crate) const WIDTH_NORMAL: usize = 4;

pub(crate) const WEIGHT_NAMES: &[&[&str]] = &[
    &["hair"],
    &["ultralight"],
    &["thin"],
    &["extralight"],
    &["light"],
    &["semilight"],
    &["book"],
    &["regular"],
    &["medium"],
    &["semibold"],
    &["bold"],
    &["extrabold"],
    &["heavy"],
    &["black"],
    &["ultra"],
    &["fat"],
];
pub(crate) const WEIGHT_REGULAR: usize = 7;

/// Added to the weight position of italics unless they are interspersed.
pub(crate) const ITALIC_WEIGHT_OFFSET: usize = 100;
