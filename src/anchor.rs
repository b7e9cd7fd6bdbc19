//! Drawing anchor resolution.
//!
//! A spreadsheet anchor places a floating object by cell reference plus
//! sub-cell EMU offsets. Pixel bounds are resolved through a fixed priority
//! ladder: two-corner anchors are exact, explicit extents size-only, and
//! everything below that is heuristic.

use crate::error::{Result, XlsceneError};
use crate::types::{Anchor, Rect};
use crate::units::{emu_offset_to_pixels, emu_to_pixels};

/// Cell-bounds lookup supplied by the caller.
///
/// Implementations derive bounds from column widths and row heights;
/// [`crate::grid::SheetGrid`] is the ready-made one. Lookups past the known
/// range must extrapolate rather than fail.
pub trait CellGrid {
    /// Pixel bounds of the cell at `(row, col)`, 0-based.
    fn cell_bounds(&self, row: u32, col: u32) -> Rect;
}

/// Absolute width floor for resolved drawing bounds. Anything smaller is
/// effectively invisible on the surface.
pub const MIN_DRAWING_WIDTH: f64 = 100.0;

/// Absolute height floor for resolved drawing bounds.
pub const MIN_DRAWING_HEIGHT: f64 = 50.0;

/// Resolve an anchor to absolute pixel bounds.
///
/// Priority: two-corner difference, then explicit extent, then source
/// dimensions scaled into the anchor cell, then a cell-multiple
/// placeholder. The result always satisfies the drawing size floors.
///
/// # Errors
/// Returns [`XlsceneError::Anchor`] when the top-left cell reference is
/// missing; there is nothing defensible to guess a position from.
pub fn resolve_anchor(
    anchor: &Anchor,
    grid: &dyn CellGrid,
    source_size: Option<(u32, u32)>,
) -> Result<Rect> {
    let top_left = anchor
        .top_left
        .ok_or_else(|| XlsceneError::Anchor("missing top-left cell reference".to_string()))?;

    let origin_cell = grid.cell_bounds(top_left.row, top_left.col);
    let x = origin_cell.x + emu_offset_to_pixels(top_left.col_offset_emu);
    let y = origin_cell.y + emu_offset_to_pixels(top_left.row_offset_emu);

    let (width, height) = if let Some(corner) = anchor.bottom_right {
        let corner_cell = grid.cell_bounds(corner.row, corner.col);
        let corner_x = corner_cell.x + emu_offset_to_pixels(corner.col_offset_emu);
        let corner_y = corner_cell.y + emu_offset_to_pixels(corner.row_offset_emu);
        (corner_x - x, corner_y - y)
    } else if let Some(extent) = anchor.explicit_extent {
        (
            emu_to_pixels(emu_f64(extent.cx)),
            emu_to_pixels(emu_f64(extent.cy)),
        )
    } else if let Some((source_w, source_h)) = source_size {
        scale_into_cell(&origin_cell, source_w, source_h)
    } else {
        // Last-resort placeholder sizing.
        (origin_cell.width * 2.0, origin_cell.height * 3.0)
    };

    Ok(apply_size_floors(Rect::new(x, y, width, height)))
}

/// Scale known source dimensions to fit the anchor cell without upscaling,
/// while keeping a minimum footprint of 1.5 cell widths by 2 cell heights.
/// The per-axis minimums can distort aspect ratio; this path is a
/// heuristic, not a precise one.
fn scale_into_cell(cell: &Rect, source_w: u32, source_h: u32) -> (f64, f64) {
    let source_w = f64::from(source_w.max(1));
    let source_h = f64::from(source_h.max(1));
    let scale = (cell.width / source_w).min(cell.height / source_h).min(1.0);
    (
        (source_w * scale).max(cell.width * 1.5),
        (source_h * scale).max(cell.height * 2.0),
    )
}

/// Clamp resolved bounds to the drawing floors, then to >= 1px. `f64::max`
/// also repairs NaN sizes, since `NaN.max(floor)` is the floor.
#[must_use]
pub fn apply_size_floors(rect: Rect) -> Rect {
    let width = rect.width.max(MIN_DRAWING_WIDTH).max(1.0);
    let height = rect.height.max(MIN_DRAWING_HEIGHT).max(1.0);
    Rect::new(rect.x, rect.y, width, height)
}

/// EMU extents in real documents are far below 2^53.
#[allow(clippy::cast_precision_loss)]
fn emu_f64(v: i64) -> f64 {
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
    use crate::types::{AnchorPoint, Extent};

    /// Uniform grid: 64px columns, 20px rows.
    struct FixedGrid;

    impl CellGrid for FixedGrid {
        fn cell_bounds(&self, row: u32, col: u32) -> Rect {
            Rect::new(f64::from(col) * 64.0, f64::from(row) * 20.0, 64.0, 20.0)
        }
    }

    fn point(row: u32, col: u32, col_emu: i64, row_emu: i64) -> AnchorPoint {
        AnchorPoint {
            row,
            col,
            col_offset_emu: Some(col_emu),
            row_offset_emu: Some(row_emu),
        }
    }

    #[test]
    fn test_two_corner_anchor() {
        // 914400 EMU = 96px
        let anchor = Anchor {
            top_left: Some(point(0, 0, 914_400, 0)),
            bottom_right: Some(point(10, 5, 0, 914_400)),
            explicit_extent: None,
        };
        let rect = resolve_anchor(&anchor, &FixedGrid, None).unwrap();
        assert_eq!(rect.x, 96.0);
        assert_eq!(rect.y, 0.0);
        // br x = 5*64 = 320; width = 320 - 96 = 224
        assert_eq!(rect.width, 224.0);
        // br y = 10*20 + 96 = 296
        assert_eq!(rect.height, 296.0);
    }

    #[test]
    fn test_explicit_extent() {
        let anchor = Anchor {
            top_left: Some(point(2, 3, 0, 0)),
            bottom_right: None,
            explicit_extent: Some(Extent {
                cx: 1_828_800,
                cy: 914_400,
            }),
        };
        let rect = resolve_anchor(&anchor, &FixedGrid, None).unwrap();
        assert_eq!(rect.x, 192.0);
        assert_eq!(rect.y, 40.0);
        assert_eq!(rect.width, 192.0);
        assert_eq!(rect.height, 96.0);
    }

    #[test]
    fn test_source_dims_never_upscale() {
        let anchor = Anchor {
            top_left: Some(point(0, 0, 0, 0)),
            bottom_right: None,
            explicit_extent: None,
        };
        // Source larger than the cell: scaled down, then the minimum
        // footprint (1.5 cells = 96, 2 cells = 40) and the absolute floors
        // take over
        let rect = resolve_anchor(&anchor, &FixedGrid, Some((640, 400))).unwrap();
        assert_eq!(rect.width, MIN_DRAWING_WIDTH);
        assert_eq!(rect.height, MIN_DRAWING_HEIGHT);
    }

    #[test]
    fn test_default_placeholder_sizing() {
        let anchor = Anchor {
            top_left: Some(point(0, 0, 0, 0)),
            bottom_right: None,
            explicit_extent: None,
        };
        let rect = resolve_anchor(&anchor, &FixedGrid, None).unwrap();
        assert_eq!(rect.width, 128.0); // 2 cell widths
        assert_eq!(rect.height, 60.0); // 3 cell heights
    }

    #[test]
    fn test_missing_top_left_is_an_error() {
        let anchor = Anchor {
            top_left: None,
            bottom_right: Some(point(4, 4, 0, 0)),
            explicit_extent: None,
        };
        let err = resolve_anchor(&anchor, &FixedGrid, None).unwrap_err();
        assert!(matches!(err, XlsceneError::Anchor(_)));
    }

    #[test]
    fn test_floors_repair_degenerate_sizes() {
        // bottom-right behind top-left yields negative sizes
        let anchor = Anchor {
            top_left: Some(point(5, 5, 0, 0)),
            bottom_right: Some(point(0, 0, 0, 0)),
            explicit_extent: None,
        };
        let rect = resolve_anchor(&anchor, &FixedGrid, None).unwrap();
        assert_eq!(rect.width, MIN_DRAWING_WIDTH);
        assert_eq!(rect.height, MIN_DRAWING_HEIGHT);
    }

    #[test]
    fn test_missing_offsets_default_to_zero() {
        let anchor = Anchor {
            top_left: Some(AnchorPoint {
                row: 1,
                col: 1,
                col_offset_emu: None,
                row_offset_emu: None,
            }),
            bottom_right: None,
            explicit_extent: None,
        };
        let rect = resolve_anchor(&anchor, &FixedGrid, None).unwrap();
        assert_eq!(rect.x, 64.0);
        assert_eq!(rect.y, 20.0);
    }
}
