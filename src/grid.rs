//! Sheet grid geometry.
//!
//! Cell positions are computed once per sheet from native column widths and
//! row heights, giving O(1) bounds lookups during reconstruction. Indices
//! past the computed range extrapolate with the default sizes, so anchors
//! that reference cells beyond the used area still resolve.

use std::collections::HashMap;

use crate::anchor::CellGrid;
use crate::types::Rect;
use crate::units::{column_width_to_pixels, points_to_pixels};

/// Default column width in pixels (spreadsheet default ~64px at 100% zoom).
pub const DEFAULT_COL_WIDTH: f64 = 64.0;

/// Default row height in pixels (spreadsheet default ~20px at 100% zoom).
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Pre-computed cell geometry for one sheet.
///
/// `col_positions[i]` is the x of column i's left edge; both position
/// vectors carry one trailing entry for the final edge.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    col_positions: Vec<f64>,
    row_positions: Vec<f64>,
    col_widths: Vec<f64>,
    row_heights: Vec<f64>,
}

impl SheetGrid {
    /// Build a grid from native sheet measurements.
    ///
    /// `col_widths_map` is keyed by column index and holds widths in
    /// spreadsheet column-width units; `row_heights_map` is keyed by row
    /// index and holds heights in points. Unlisted indices get the default
    /// sizes.
    #[must_use]
    pub fn new(
        max_row: u32,
        max_col: u32,
        col_widths_map: &HashMap<u32, f64>,
        row_heights_map: &HashMap<u32, f64>,
    ) -> Self {
        let mut col_positions = Vec::with_capacity(max_col as usize + 2);
        let mut col_widths = Vec::with_capacity(max_col as usize + 1);
        let mut x: f64 = 0.0;

        for col in 0..=max_col {
            col_positions.push(x);
            let w = col_widths_map
                .get(&col)
                .map_or(DEFAULT_COL_WIDTH, |&native| {
                    column_width_to_pixels(native)
                });
            col_widths.push(w);
            x += w;
        }
        col_positions.push(x); // Final edge

        let mut row_positions = Vec::with_capacity(max_row as usize + 2);
        let mut row_heights = Vec::with_capacity(max_row as usize + 1);
        let mut y: f64 = 0.0;

        for row in 0..=max_row {
            row_positions.push(y);
            let h = row_heights_map
                .get(&row)
                .map_or(DEFAULT_ROW_HEIGHT, |&points| points_to_pixels(points));
            row_heights.push(h);
            y += h;
        }
        row_positions.push(y); // Final edge

        SheetGrid {
            col_positions,
            row_positions,
            col_widths,
            row_heights,
        }
    }

    /// Total width of the computed range in pixels.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Total height of the computed range in pixels.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }
}

impl CellGrid for SheetGrid {
    fn cell_bounds(&self, row: u32, col: u32) -> Rect {
        Rect::new(
            edge_position(&self.col_positions, DEFAULT_COL_WIDTH, col),
            edge_position(&self.row_positions, DEFAULT_ROW_HEIGHT, row),
            size_at(&self.col_widths, DEFAULT_COL_WIDTH, col),
            size_at(&self.row_heights, DEFAULT_ROW_HEIGHT, row),
        )
    }
}

/// Edge position with default-size extrapolation past the computed range.
fn edge_position(positions: &[f64], default_size: f64, index: u32) -> f64 {
    let index = index as usize;
    if let Some(&position) = positions.get(index) {
        return position;
    }
    match positions.split_last() {
        Some((&last, _)) => last + steps(index + 1 - positions.len()) * default_size,
        None => steps(index) * default_size,
    }
}

fn size_at(sizes: &[f64], default_size: f64, index: u32) -> f64 {
    sizes.get(index as usize).copied().unwrap_or(default_size)
}

/// Extrapolation step counts stay tiny in practice.
#[allow(clippy::cast_precision_loss)]
fn steps(count: usize) -> f64 {
    count as f64
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
    fn test_default_sized_grid() {
        let grid = SheetGrid::new(10, 5, &HashMap::new(), &HashMap::new());

        assert_eq!(grid.total_width(), DEFAULT_COL_WIDTH * 6.0);
        assert_eq!(grid.total_height(), DEFAULT_ROW_HEIGHT * 11.0);

        let rect = grid.cell_bounds(0, 0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);

        let rect = grid.cell_bounds(1, 2);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_native_unit_conversion() {
        let mut col_widths = HashMap::new();
        col_widths.insert(1, 10.0); // floor((10 + 0.12) * 7) = 70
        let mut row_heights = HashMap::new();
        row_heights.insert(0, 15.0); // 15pt * 96/72 = 20px

        let grid = SheetGrid::new(2, 2, &col_widths, &row_heights);

        let rect = grid.cell_bounds(0, 1);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH);
        assert_eq!(rect.width, 70.0);
        assert_eq!(rect.height, 20.0);

        // Column 2 starts after the widened column 1
        let rect = grid.cell_bounds(0, 2);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH + 70.0);
    }

    #[test]
    fn test_extrapolates_past_computed_range() {
        let grid = SheetGrid::new(1, 1, &HashMap::new(), &HashMap::new());

        // Computed columns are 0 and 1; column 5 keeps the uniform stride
        let rect = grid.cell_bounds(0, 5);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH * 5.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);

        let rect = grid.cell_bounds(100, 0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT * 100.0);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_empty_grid_behaves_uniformly() {
        let grid = SheetGrid::default();

        let rect = grid.cell_bounds(3, 2);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT * 3.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);
        assert_eq!(grid.total_width(), 0.0);
    }
}
