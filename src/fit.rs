//! Contain-mode image placement.
//!
//! Fits a source image inside a container rectangle with adaptive padding,
//! centered, never spilling past the container. Pure geometry; callers
//! decide what the container and the source are.

use crate::types::Rect;

/// Dynamic padding ceiling in pixels.
const MAX_DYNAMIC_PADDING: f64 = 8.0;

/// Divisor applied to sqrt(container area) when deriving padding.
const PADDING_AREA_DIVISOR: f64 = 50.0;

/// Aspect ratio beyond which (or below whose inverse) a source counts as
/// extreme. Extreme-ratio images read as clipped at tight paddings.
const EXTREME_RATIO: f64 = 3.0;

/// Padding multiplier for extreme-ratio sources.
const EXTREME_PADDING_FACTOR: f64 = 1.4;

/// Fraction of the dominant dimension kept when shaving the safety margin
/// off an extreme-ratio placement.
const EXTREME_SHAVE_KEEP: f64 = 0.998;

/// Place a source of natural size `source_width x source_height` inside
/// `container`, contain-style.
///
/// Padding grows with the container up to 8px (`sqrt(area) / 50`), never
/// below `base_padding`. The scale is the contain ratio itself; sources
/// smaller than the inner area are magnified up to it, never beyond. Draw
/// sizes floor rather than round so a half-pixel never lands outside the
/// container. Degenerate source sizes produce a zero-size placement at the
/// container origin rather than an error.
#[must_use]
pub fn contain_fit(
    container: &Rect,
    source_width: f64,
    source_height: f64,
    base_padding: f64,
) -> Rect {
    if !source_width.is_finite()
        || !source_height.is_finite()
        || source_width <= 0.0
        || source_height <= 0.0
    {
        return Rect::new(container.x, container.y, 0.0, 0.0);
    }

    let ratio = source_width / source_height;
    let extreme = ratio > EXTREME_RATIO || ratio < 1.0 / EXTREME_RATIO;

    let area = (container.width * container.height).max(0.0);
    let mut pad = base_padding.max((area.sqrt() / PADDING_AREA_DIVISOR).min(MAX_DYNAMIC_PADDING));
    if extreme {
        pad *= EXTREME_PADDING_FACTOR;
    }

    let inner_width = (container.width - 2.0 * pad).max(0.0);
    let inner_height = (container.height - 2.0 * pad).max(0.0);

    let scale = (inner_width / source_width).min(inner_height / source_height);
    let mut draw_width = (source_width * scale).floor();
    let mut draw_height = (source_height * scale).floor();

    if extreme {
        if draw_width >= draw_height {
            draw_width = (draw_width * EXTREME_SHAVE_KEEP).floor();
        } else {
            draw_height = (draw_height * EXTREME_SHAVE_KEEP).floor();
        }
    }

    let x = (container.x + (container.width - draw_width) / 2.0)
        .round()
        .max(container.x);
    let y = (container.y + (container.height - draw_height) / 2.0)
        .round()
        .max(container.y);

    Rect::new(x, y, draw_width, draw_height)
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

    /// Containment property with the 1px rounding tolerance.
    fn assert_contained(placed: &Rect, container: &Rect) {
        assert!(container.contains(placed, 1.0), "{placed:?} escapes {container:?}");
    }

    #[test]
    fn test_centered_fit() {
        let container = Rect::new(0.0, 0.0, 200.0, 100.0);
        // pad = sqrt(20000)/50 ~= 2.83; inner 194.3 x 94.3; height binds
        let placed = contain_fit(&container, 400.0, 200.0, 0.0);
        assert_eq!(placed.width, 188.0);
        assert_eq!(placed.height, 94.0);
        assert_eq!(placed.x, 6.0);
        assert_eq!(placed.y, 3.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_magnifies_up_to_contain_ratio() {
        let container = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        // pad caps at 8; inner 984; scale = 984/8 = 123
        let placed = contain_fit(&container, 8.0, 8.0, 0.0);
        assert_eq!(placed.width, 984.0);
        assert_eq!(placed.height, 984.0);
        assert_eq!(placed.x, 8.0);
        assert_eq!(placed.y, 8.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_extreme_wide_ratio_shaves_width() {
        let container = Rect::new(0.0, 0.0, 200.0, 100.0);
        // ratio 8: pad * 1.4, then 0.2% off the dominant (width) axis
        let placed = contain_fit(&container, 400.0, 50.0, 0.0);
        assert_eq!(placed.width, 191.0);
        assert_eq!(placed.height, 24.0);
        assert_eq!(placed.x, 5.0);
        assert_eq!(placed.y, 38.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_extreme_tall_ratio_shaves_height() {
        let container = Rect::new(0.0, 0.0, 100.0, 200.0);
        let placed = contain_fit(&container, 50.0, 400.0, 0.0);
        assert_eq!(placed.width, 24.0);
        assert_eq!(placed.height, 191.0);
        assert_eq!(placed.x, 38.0);
        assert_eq!(placed.y, 5.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_base_padding_floor() {
        let container = Rect::new(0.0, 0.0, 200.0, 100.0);
        // base 6 beats the dynamic ~2.83; inner 188 x 88
        let placed = contain_fit(&container, 188.0, 88.0, 6.0);
        assert_eq!(placed.width, 188.0);
        assert_eq!(placed.height, 88.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_degenerate_source_is_zero_size_at_origin() {
        let container = Rect::new(10.0, 20.0, 100.0, 50.0);
        for (w, h) in [(0.0, 100.0), (100.0, 0.0), (-5.0, 100.0), (f64::NAN, 100.0)] {
            let placed = contain_fit(&container, w, h, 2.0);
            assert_eq!(placed.x, 10.0);
            assert_eq!(placed.y, 20.0);
            assert_eq!(placed.width, 0.0);
            assert_eq!(placed.height, 0.0);
        }
    }

    #[test]
    fn test_tiny_container_collapses_gracefully() {
        let container = Rect::new(0.0, 0.0, 4.0, 4.0);
        let placed = contain_fit(&container, 100.0, 100.0, 0.0);
        assert!(placed.width <= 4.0);
        assert!(placed.height <= 4.0);
        assert_contained(&placed, &container);
    }

    #[test]
    fn test_offset_container_keeps_offset() {
        let container = Rect::new(300.0, 150.0, 200.0, 100.0);
        let placed = contain_fit(&container, 400.0, 200.0, 0.0);
        assert_eq!(placed.x, 306.0);
        assert_eq!(placed.y, 153.0);
        assert_contained(&placed, &container);
    }
}
