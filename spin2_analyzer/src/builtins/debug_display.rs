//! Debug display types and their per-type parameter vocabularies
//!
//! `` debug(`scope name title 'x' samples 64) `` declares a display; later
//! `` debug(`name clear) `` feeds it. Setup words are valid at declaration,
//! feed words when writing to an existing display.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugDisplayType {
    Logic,
    Scope,
    #[serde(rename = "scope_xy")]
    ScopeXY,
    Fft,
    Spectro,
    Plot,
    Term,
    Bitmap,
    Midi,
}

impl DebugDisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebugDisplayType::Logic => "logic",
            DebugDisplayType::Scope => "scope",
            DebugDisplayType::ScopeXY => "scope_xy",
            DebugDisplayType::Fft => "fft",
            DebugDisplayType::Spectro => "spectro",
            DebugDisplayType::Plot => "plot",
            DebugDisplayType::Term => "term",
            DebugDisplayType::Bitmap => "bitmap",
            DebugDisplayType::Midi => "midi",
        }
    }

    fn setup_words(&self) -> &'static [&'static str] {
        match self {
            DebugDisplayType::Term => &[
                "title", "pos", "size", "textsize", "color", "backcolor", "update", "hidexy",
            ],
            DebugDisplayType::Scope => &[
                "title", "pos", "size", "samples", "rate", "dotsize", "linesize", "textsize",
                "color", "hidexy", "auto",
            ],
            DebugDisplayType::ScopeXY => &[
                "title", "pos", "size", "range", "samples", "rate", "dotsize", "textsize",
                "color", "polar", "logscale", "hidexy",
            ],
            DebugDisplayType::Logic => &[
                "title", "pos", "samples", "spacing", "rate", "linesize", "textsize", "color",
                "hidexy",
            ],
            DebugDisplayType::Fft => &[
                "title", "pos", "size", "samples", "rate", "dotsize", "linesize", "textsize",
                "color", "logscale", "hidexy",
            ],
            DebugDisplayType::Spectro => &[
                "title", "pos", "samples", "depth", "mag", "range", "rate", "trace", "dotsize",
                "logscale", "hidexy",
            ],
            DebugDisplayType::Plot => &[
                "title", "pos", "size", "dotsize", "lutcolors", "backcolor", "update", "hidexy",
            ],
            DebugDisplayType::Bitmap => &[
                "title", "pos", "size", "dotsize", "lutcolors", "trace", "rate", "scroll",
                "update", "hidexy", "sparse",
            ],
            DebugDisplayType::Midi => &["title", "pos", "size", "range", "channel", "color"],
        }
    }

    fn feed_words(&self) -> &'static [&'static str] {
        match self {
            DebugDisplayType::Term => &["clear", "update", "save", "close"],
            DebugDisplayType::Scope => &[
                "trigger", "holdoff", "samples", "clear", "save", "window", "close", "auto",
            ],
            DebugDisplayType::Logic => &["trigger", "holdoff", "clear", "save", "window", "close"],
            DebugDisplayType::ScopeXY
            | DebugDisplayType::Fft
            | DebugDisplayType::Spectro
            | DebugDisplayType::Midi => &["clear", "save", "window", "close"],
            DebugDisplayType::Plot => &[
                "lutcolors", "backcolor", "color", "opacity", "precise", "linesize", "origin",
                "set", "dot", "line", "circle", "oval", "box", "obox", "text", "textsize",
                "textstyle", "textangle", "spritedef", "sprite", "polar", "cartesian", "update",
                "clear", "save", "window", "close",
            ],
            DebugDisplayType::Bitmap => &[
                "lutcolors", "trace", "rate", "set", "scroll", "clear", "update", "save",
                "window", "close",
            ],
        }
    }

    /// Feed words added by later language versions
    fn gated_feed_words(&self) -> &'static [(&'static str, u32)] {
        match self {
            DebugDisplayType::Plot => &[("crop", 50), ("layer", 50)],
            _ => &[],
        }
    }

    fn accepts_packed_data(&self) -> bool {
        !matches!(
            self,
            DebugDisplayType::Term | DebugDisplayType::Plot | DebugDisplayType::Midi
        )
    }

    fn color_modes(&self) -> &'static [&'static str] {
        match self {
            DebugDisplayType::Bitmap | DebugDisplayType::Plot | DebugDisplayType::Term => {
                COLOR_MODES
            }
            DebugDisplayType::Spectro => SPECTRO_COLOR_MODES,
            _ => &[],
        }
    }
}

const PACKED_DATA_MODES: &[&str] = &[
    "longs_1bit",
    "longs_2bit",
    "longs_4bit",
    "longs_8bit",
    "longs_16bit",
    "words_1bit",
    "words_2bit",
    "words_4bit",
    "words_8bit",
    "bytes_1bit",
    "bytes_2bit",
    "bytes_4bit",
    "alt",
    "signed",
];

#[rustfmt::skip]
const COLOR_MODES: &[&str] = &[
    "lut1", "lut2", "lut4", "lut8", "luma8", "luma8w", "luma8x", "hsv8", "hsv8w", "hsv8x",
    "rgbi8", "rgbi8w", "rgbi8x", "rgb8", "rgb16", "rgb24", "hsv16", "hsv16w", "hsv16x",
];

const SPECTRO_COLOR_MODES: &[&str] = &["luma8", "luma8w", "luma8x", "hsv16", "hsv16w", "hsv16x"];

/// Display type named by the word after the backtick
pub fn display_type_for(name: &str) -> Option<DebugDisplayType> {
    match name.to_ascii_lowercase().as_str() {
        "logic" => Some(DebugDisplayType::Logic),
        "scope" => Some(DebugDisplayType::Scope),
        "scope_xy" => Some(DebugDisplayType::ScopeXY),
        "fft" => Some(DebugDisplayType::Fft),
        "spectro" => Some(DebugDisplayType::Spectro),
        "plot" => Some(DebugDisplayType::Plot),
        "term" => Some(DebugDisplayType::Term),
        "bitmap" => Some(DebugDisplayType::Bitmap),
        "midi" => Some(DebugDisplayType::Midi),
        _ => None,
    }
}

fn contains(list: &[&str], word: &str) -> bool {
    list.iter().any(|candidate| candidate.eq_ignore_ascii_case(word))
}

/// Whether `name` is valid while declaring a display of this type
pub fn is_setup_parameter(display: DebugDisplayType, name: &str) -> bool {
    contains(display.setup_words(), name)
        || contains(display.color_modes(), name)
        || (display.accepts_packed_data() && contains(PACKED_DATA_MODES, name))
}

/// Whether `name` is valid while feeding an existing display of this type
pub fn is_feed_parameter(display: DebugDisplayType, name: &str, version: u32) -> bool {
    if contains(display.feed_words(), name) {
        return true;
    }
    if display.accepts_packed_data() && contains(PACKED_DATA_MODES, name) {
        return true;
    }
    display
        .gated_feed_words()
        .iter()
        .any(|(word, gate)| word.eq_ignore_ascii_case(name) && super::version_allows(version, *gate))
}

pub fn is_debug_color(name: &str) -> bool {
    contains(super::tables::DEBUG_COLORS, name)
}
