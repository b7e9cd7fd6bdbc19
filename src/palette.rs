//! Approximation of arbitrary sheet colors and fonts onto the closed
//! palette of the target surface.
//!
//! The color classifier is "nearest named color by brightness bucket then
//! dominant channel", not a true nearest-neighbor search in color space: an
//! exact-match table handles common values, then perceptual brightness
//! buckets off near-black and near-white, then the dominant RGB channel
//! picks a hue with ties broken toward composite hues. Lossy, deterministic,
//! order-dependent.

use crate::types::{DashStyle, FontFamily, FontSize, SceneColor};

/// RGB color with u8 components for channel math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Perceptual brightness on the 0..=255 scale:
    /// `0.299*R + 0.587*G + 0.114*B`.
    #[must_use]
    pub fn brightness(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }
}

/// Brightness below which everything is the darkest palette entry.
const DARK_CUTOFF: f64 = 50.0;

/// Brightness above which strokes and text become the lightest entry.
const LIGHT_CUTOFF: f64 = 200.0;

/// Brightness above which a fill is dropped entirely (near-white fills
/// would be invisible against the surface background).
const FILL_NONE_CUTOFF: f64 = 240.0;

/// Channels within this distance of the maximum count as tied with it.
const TIE_TOLERANCE: u8 = 30;

/// A strictly dominant channel above this value is a candidate for the
/// light variant of its hue.
const LIGHT_DOMINANT: u8 = 180;

/// Minimum channel floor that turns a bright dominant into a washed-out
/// (light) variant.
const LIGHT_FLOOR: u8 = 110;

/// Map an arbitrary hex color onto the palette, for strokes and text.
///
/// Unparseable input silently defaults to black; color approximation is
/// lossy by design and never an error.
#[must_use]
pub fn map_color(hex: &str) -> SceneColor {
    let Some(rgb) = Rgb::from_hex(hex) else {
        return SceneColor::Black;
    };
    if let Some(color) = exact_match(hex) {
        return color;
    }
    let brightness = rgb.brightness();
    if brightness < DARK_CUTOFF {
        return SceneColor::Black;
    }
    if brightness > LIGHT_CUTOFF {
        return SceneColor::White;
    }
    classify_dominant(rgb)
}

/// Map a fill color onto the palette, or `None` when the fill should be
/// skipped (absent, unparseable, or near-white).
#[must_use]
pub fn map_fill_color(hex: &str) -> Option<SceneColor> {
    let rgb = Rgb::from_hex(hex)?;
    if let Some(color) = exact_match(hex) {
        return match color {
            SceneColor::White => None,
            other => Some(other),
        };
    }
    let brightness = rgb.brightness();
    if brightness < DARK_CUTOFF {
        return Some(SceneColor::Black);
    }
    if brightness > FILL_NONE_CUTOFF {
        return None;
    }
    Some(classify_dominant(rgb))
}

/// Exact-match table for common sheet colors. Checked before any channel
/// math so that canonical values land on their canonical entries.
fn exact_match(hex: &str) -> Option<SceneColor> {
    let normalized = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    let upper = normalized.to_ascii_uppercase();
    let color = match upper.as_str() {
        "000000" => SceneColor::Black,
        "FFFFFF" => SceneColor::White,
        "FF0000" => SceneColor::Red,
        "C00000" => SceneColor::Red,
        "00FF00" | "008000" | "70AD47" => SceneColor::Green,
        "90EE90" | "C6EFCE" => SceneColor::LightGreen,
        "0000FF" | "4472C4" | "002060" => SceneColor::Blue,
        "00FFFF" | "ADD8E6" | "5B9BD5" | "00B0F0" => SceneColor::LightBlue,
        "FFFF00" | "FFC000" => SceneColor::Yellow,
        "FFA500" | "ED7D31" | "FF8C00" => SceneColor::Orange,
        "800080" | "7030A0" => SceneColor::Violet,
        "EE82EE" | "DDA0DD" => SceneColor::LightViolet,
        "FFC0CB" | "FFCCCC" | "FFC7CE" => SceneColor::LightRed,
        "808080" | "C0C0C0" | "D3D3D3" | "A5A5A5" | "BFBFBF" => SceneColor::Grey,
        _ => return None,
    };
    Some(color)
}

/// Pick a hue from channel dominance. Two-way near-ties resolve to the
/// composite hue; a washed-out bright dominant picks the light variant.
fn classify_dominant(rgb: Rgb) -> SceneColor {
    let Rgb { r, g, b } = rgb;
    let hi = r.max(g).max(b);
    let lo = r.min(g).min(b);
    let r_high = hi - r <= TIE_TOLERANCE;
    let g_high = hi - g <= TIE_TOLERANCE;
    let b_high = hi - b <= TIE_TOLERANCE;
    let light = hi > LIGHT_DOMINANT && lo > LIGHT_FLOOR;

    match (r_high, g_high, b_high) {
        (true, true, true) => SceneColor::Grey,
        (true, true, false) => SceneColor::Yellow,
        (true, false, true) => {
            if light {
                SceneColor::LightViolet
            } else {
                SceneColor::Violet
            }
        }
        (false, true, true) => SceneColor::LightBlue,
        (true, false, false) => {
            // Orange sits inside the red family: warm green, no blue.
            if g >= 100 && b < 100 {
                SceneColor::Orange
            } else if light {
                SceneColor::LightRed
            } else {
                SceneColor::Red
            }
        }
        (false, true, false) => {
            if light {
                SceneColor::LightGreen
            } else {
                SceneColor::Green
            }
        }
        (false, false, true) => {
            if light {
                SceneColor::LightBlue
            } else {
                SceneColor::Blue
            }
        }
        // hi equals one of the channels, so at least one flag is set.
        (false, false, false) => SceneColor::Grey,
    }
}

/// Map a font family name onto the four supported families by lowercase
/// substring match. Unknown names default to sans.
#[must_use]
pub fn map_font_family(name: &str) -> FontFamily {
    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return FontFamily::Sans;
    }

    const MONO: &[&str] = &["courier", "mono", "consol"];
    const SERIF: &[&str] = &["times", "georgia", "serif", "roman", "garamond", "simsun", "宋体"];
    const DECORATIVE: &[&str] = &["comic", "script", "hand", "marker", "brush"];

    if MONO.iter().any(|frag| lower.contains(frag)) {
        return FontFamily::Mono;
    }
    // "serif" would also match "sans-serif"; sans names are the default
    // anyway, so check the sans fragments first.
    const SANS: &[&str] = &[
        "arial", "calibri", "helvetic", "verdana", "tahoma", "segoe", "yahei", "msyh", "gothic",
        "雅黑",
    ];
    if SANS.iter().any(|frag| lower.contains(frag)) {
        return FontFamily::Sans;
    }
    if SERIF.iter().any(|frag| lower.contains(frag)) {
        return FontFamily::Serif;
    }
    if DECORATIVE.iter().any(|frag| lower.contains(frag)) {
        return FontFamily::Decorative;
    }
    FontFamily::Sans
}

/// Point size assumed when a document omits or corrupts one.
pub const DEFAULT_FONT_SIZE_PT: f64 = 12.0;

/// Effective point size: the recorded value when valid, else the default.
#[must_use]
pub fn effective_font_size(pt: Option<f64>) -> f64 {
    match pt {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => DEFAULT_FONT_SIZE_PT,
    }
}

/// Bucket a point size into the four display tiers.
///
/// The surface only supports discrete sizes; the thresholds are fixed and
/// the mapping is lossy. Missing or invalid sizes count as 12pt.
#[must_use]
pub fn map_font_size(pt: f64) -> FontSize {
    let pt = effective_font_size(Some(pt));
    if pt <= 12.0 {
        FontSize::S
    } else if pt <= 18.0 {
        FontSize::M
    } else if pt <= 24.0 {
        FontSize::L
    } else {
        FontSize::Xl
    }
}

/// Map a source border style keyword onto a dash pattern. Unknown styles
/// fall back to solid.
#[must_use]
pub fn map_border_dash(style: &str) -> DashStyle {
    match style.trim() {
        "dashed" | "dashDot" | "dashDotDot" | "mediumDashed" | "mediumDashDot"
        | "mediumDashDotDot" | "longDash" => DashStyle::Dashed,
        "dotted" | "hair" => DashStyle::Dotted,
        _ => DashStyle::Solid,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_exact_matches_win() {
        assert_eq!(map_color("#FF0000"), SceneColor::Red);
        assert_eq!(map_color("#FFA500"), SceneColor::Orange);
        assert_eq!(map_color("#808080"), SceneColor::Grey);
        assert_eq!(map_color("#FFFFFF"), SceneColor::White);
    }

    #[test]
    fn test_brightness_buckets() {
        // 0x20 everywhere -> brightness 32, below the dark cutoff
        assert_eq!(map_color("#202020"), SceneColor::Black);
        // near-white but not exact
        assert_eq!(map_color("#FAFAF0"), SceneColor::White);
    }

    #[test]
    fn test_dominant_channel() {
        assert_eq!(map_color("#CC2200"), SceneColor::Red);
        assert_eq!(map_color("#22AA22"), SceneColor::Green);
        assert_eq!(map_color("#2244CC"), SceneColor::Blue);
        // r == g tie -> yellow
        assert_eq!(map_color("#AAAA20"), SceneColor::Yellow);
        // r == b tie -> violet
        assert_eq!(map_color("#AA20AA"), SceneColor::Violet);
        // warm red with mid green, no blue -> orange
        assert_eq!(map_color("#FF8000"), SceneColor::Orange);
    }

    #[test]
    fn test_light_variants() {
        assert_eq!(map_color("#E69999"), SceneColor::LightRed);
        assert_eq!(map_color("#87CEEB"), SceneColor::LightBlue);
        // bright enough to cross the stroke cutoff, but still a fill hue
        assert_eq!(map_color("#FFB3B3"), SceneColor::White);
        assert_eq!(map_fill_color("#FFB3B3"), Some(SceneColor::LightRed));
    }

    #[test]
    fn test_fill_near_white_skipped() {
        assert_eq!(map_fill_color("#FFFFFF"), None);
        assert_eq!(map_fill_color("#FDFDF5"), None);
        // between the stroke cutoff (200) and the fill cutoff (240) a fill
        // still classifies
        assert!(map_fill_color("#D0D0D0").is_some());
        assert_eq!(map_fill_color("#FF0000"), Some(SceneColor::Red));
        assert_eq!(map_fill_color("not-a-color"), None);
    }

    #[test]
    fn test_unparseable_defaults_to_black() {
        assert_eq!(map_color(""), SceneColor::Black);
        assert_eq!(map_color("#GGHHII"), SceneColor::Black);
        assert_eq!(map_color("red"), SceneColor::Black);
    }

    #[test]
    fn test_determinism() {
        for hex in ["#123456", "#FF8040", "#ABCDEF", "#777777"] {
            assert_eq!(map_color(hex), map_color(hex));
        }
    }

    #[test_case("Courier New", FontFamily::Mono)]
    #[test_case("Consolas", FontFamily::Mono)]
    #[test_case("Times New Roman", FontFamily::Serif)]
    #[test_case("Georgia", FontFamily::Serif)]
    #[test_case("Arial", FontFamily::Sans)]
    #[test_case("Calibri", FontFamily::Sans)]
    #[test_case("Microsoft YaHei", FontFamily::Sans)]
    #[test_case("Comic Sans MS", FontFamily::Decorative)]
    #[test_case("Wingdings", FontFamily::Sans; "unknown defaults to sans")]
    #[test_case("", FontFamily::Sans; "empty defaults to sans")]
    fn test_font_family(name: &str, expected: FontFamily) {
        assert_eq!(map_font_family(name), expected);
    }

    #[test_case(8.0, FontSize::S)]
    #[test_case(12.0, FontSize::S)]
    #[test_case(12.5, FontSize::M)]
    #[test_case(18.0, FontSize::M)]
    #[test_case(24.0, FontSize::L)]
    #[test_case(36.0, FontSize::Xl)]
    #[test_case(f64::NAN, FontSize::S; "nan counts as 12pt")]
    #[test_case(-4.0, FontSize::S; "negative counts as 12pt")]
    fn test_font_size_tiers(pt: f64, expected: FontSize) {
        assert_eq!(map_font_size(pt), expected);
    }

    #[test]
    fn test_border_dash_mapping() {
        assert_eq!(map_border_dash("dashDot"), DashStyle::Dashed);
        assert_eq!(map_border_dash("dashDotDot"), DashStyle::Dashed);
        assert_eq!(map_border_dash("dotted"), DashStyle::Dotted);
        assert_eq!(map_border_dash("hair"), DashStyle::Dotted);
        assert_eq!(map_border_dash("solid"), DashStyle::Solid);
        assert_eq!(map_border_dash("anything"), DashStyle::Solid);
    }
}
