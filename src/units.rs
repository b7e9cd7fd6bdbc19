//! Spreadsheet-native unit conversions at the 96 DPI reference scale.
//!
//! Layout documents mix three native units: font sizes in points, column
//! widths in character-width units, and drawing offsets in EMU (English
//! Metric Units, 914400 per inch). Everything downstream works in device
//! pixels, so these conversions happen once, at the edges.

/// Reference display density used by every conversion.
pub const PX_PER_INCH: f64 = 96.0;

/// Typographic points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// English Metric Units per inch (OOXML drawing unit).
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert typographic points to pixels (96 DPI).
#[must_use]
pub fn points_to_pixels(pt: f64) -> f64 {
    pt * PX_PER_INCH / PT_PER_INCH
}

/// Convert a spreadsheet column-width unit to pixels.
///
/// The `(w + 0.12) * 7` coefficients are an empirical approximation
/// calibrated against an 11pt reference font. Column-width-to-pixel mapping
/// is font- and renderer-dependent; this is approximate, not exact.
#[must_use]
pub fn column_width_to_pixels(width: f64) -> f64 {
    if !width.is_finite() {
        return 0.0;
    }
    ((width + 0.12) * 7.0).floor()
}

/// Convert EMU to pixels (914400 EMU per inch).
///
/// Returns 0 for non-finite input; anchor offsets are frequently absent and
/// must default to zero rather than poisoning downstream geometry.
#[must_use]
pub fn emu_to_pixels(emu: f64) -> f64 {
    if !emu.is_finite() {
        return 0.0;
    }
    emu * PX_PER_INCH / EMU_PER_INCH
}

/// Convert an optional EMU offset to pixels, treating `None` as zero.
#[must_use]
pub fn emu_offset_to_pixels(emu: Option<i64>) -> f64 {
    match emu {
        Some(v) => emu_to_pixels(to_f64(v)),
        None => 0.0,
    }
}

/// Lossless enough for drawing offsets; EMU values in real documents are
/// far below 2^53.
#[allow(clippy::cast_precision_loss)]
fn to_f64(v: i64) -> f64 {
    v as f64
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

    #[test]
    fn test_points_to_pixels() {
        assert_eq!(points_to_pixels(0.0), 0.0);
        assert_eq!(points_to_pixels(72.0), 96.0);
        assert_eq!(points_to_pixels(12.0), 16.0);
    }

    #[test]
    fn test_column_width_to_pixels() {
        // Excel default width 8.43 -> floor(8.55 * 7) = 59
        assert_eq!(column_width_to_pixels(8.43), 59.0);
        assert_eq!(column_width_to_pixels(0.0), 0.0);
        assert_eq!(column_width_to_pixels(f64::NAN), 0.0);
    }

    #[test]
    fn test_emu_to_pixels() {
        assert_eq!(emu_to_pixels(0.0), 0.0);
        assert_eq!(emu_to_pixels(914_400.0), 96.0);
        assert_eq!(emu_to_pixels(f64::NAN), 0.0);
        assert_eq!(emu_to_pixels(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_emu_offset_defaults_to_zero() {
        assert_eq!(emu_offset_to_pixels(None), 0.0);
        assert_eq!(emu_offset_to_pixels(Some(914_400)), 96.0);
        assert_eq!(emu_offset_to_pixels(Some(-914_400)), -96.0);
    }

    #[test]
    fn test_monotonic_increasing() {
        let samples = [0.0, 0.5, 1.0, 7.25, 11.0, 64.0, 1024.0];
        for pair in samples.windows(2) {
            assert!(points_to_pixels(pair[0]) <= points_to_pixels(pair[1]));
            assert!(emu_to_pixels(pair[0]) <= emu_to_pixels(pair[1]));
            assert!(column_width_to_pixels(pair[0]) <= column_width_to_pixels(pair[1]));
        }
    }
}
