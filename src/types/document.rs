use serde::{Deserialize, Serialize};

use super::Rect;
use crate::error::Result;

/// Root input: one sheet's extracted layout description.
///
/// Produced entirely by the external spreadsheet parser, deserialized once
/// per import, and discarded after reconstruction.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// Name of the source worksheet.
    pub sheet_name: String,
    /// Overall sheet extent in pixels.
    pub size_px: SheetSize,
    /// Grid cells rendered as filled/bordered rectangles plus optional text.
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Floating text boxes, independent of the cell grid.
    #[serde(default)]
    pub textboxes: Vec<TextBox>,
    /// Floating images.
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl LayoutDocument {
    /// Deserialize a layout document from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or missing required fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize a layout document from JSON bytes.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or missing required fields.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }
}

/// Sheet extent in pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SheetSize {
    pub width: f64,
    pub height: f64,
}

/// One spreadsheet cell: a filled/bordered rectangle plus optional text.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Row index (0-based).
    pub row: u32,
    /// Column index (0-based).
    pub col: u32,
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Width in pixels.
    pub w: f64,
    /// Height in pixels.
    pub h: f64,
    /// Display text, if the cell has content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Background fill as #RRGGBB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Font family name as recorded in the sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    /// Text color as #RRGGBB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    /// Horizontal text alignment.
    #[serde(default)]
    pub h_align: HAlign,
    /// Vertical text alignment.
    #[serde(default)]
    pub v_align: VAlign,
}

/// Cell default width when the recorded value is missing or non-positive.
pub const CELL_DEFAULT_WIDTH: f64 = 50.0;

/// Cell default height when the recorded value is missing or non-positive.
pub const CELL_DEFAULT_HEIGHT: f64 = 20.0;

impl Cell {
    /// Cell bounds with degenerate geometry repaired: non-finite positions
    /// become 0, non-positive sizes fall back to the 50x20 defaults.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let x = if self.x.is_finite() { self.x } else { 0.0 };
        let y = if self.y.is_finite() { self.y } else { 0.0 };
        let w = if self.w.is_finite() && self.w > 0.0 {
            self.w
        } else {
            CELL_DEFAULT_WIDTH
        };
        let h = if self.h.is_finite() && self.h > 0.0 {
            self.h
        } else {
            CELL_DEFAULT_HEIGHT
        };
        Rect::new(x, y, w, h)
    }

    /// Identifier used in diagnostics, e.g. `cell R3C7`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("cell R{}C{}", self.row, self.col)
    }
}

/// Horizontal alignment of cell text.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment of cell text. Spreadsheets default to bottom.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// A floating text box, positioned independently of the cell grid.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    /// Drawing name from the source sheet.
    pub name: String,
    /// Left edge in pixels.
    pub left: f64,
    /// Top edge in pixels.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Stacking order; lower values sit further back.
    #[serde(default)]
    pub z: i32,
    /// Text content.
    pub text: String,
    /// Base font size in points (12 when absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    /// Font family name as recorded in the sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Outline border, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    /// Background fill, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillSpec>,
    /// Character-range formatting runs, non-overlapping and ordered by
    /// `start`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_text_formatting: Option<Vec<RichTextRun>>,
}

impl TextBox {
    /// Raw bounding box as recorded, without repair.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// Border style for a text box outline.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BorderSpec {
    /// Source style keyword ("solid", "dashed", "dashDot", "none", ...).
    pub style: String,
    /// Stroke width in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Background fill for a text box.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FillSpec {
    /// Fill color as #RRGGBB.
    pub color: String,
    /// Opacity in [0, 1]; 0 means the fill is ignored.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

/// One character-range formatting run inside a text box.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RichTextRun {
    /// Start character index (inclusive).
    pub start: usize,
    /// End character index (exclusive).
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    /// Run font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A floating image.
///
/// The display box is either recorded directly (`left`/`top`/`width`/
/// `height`) or derivable from the raw drawing `anchor`; when an anchor is
/// present it takes precedence.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Drawing name from the source sheet.
    pub name: String,
    /// Left edge in pixels (anchor-derived display box).
    #[serde(default)]
    pub left: f64,
    /// Top edge in pixels.
    #[serde(default)]
    pub top: f64,
    /// Width in pixels.
    #[serde(default)]
    pub width: f64,
    /// Height in pixels.
    #[serde(default)]
    pub height: f64,
    /// Stacking order; lower values sit further back.
    #[serde(default)]
    pub z: i32,
    /// Raw drawing anchor, when the parser did not pre-resolve the box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    /// Handle to the source pixel data.
    #[serde(default)]
    pub source: PixelSource,
}

impl ImageRef {
    /// Pre-resolved display box as recorded, without floors applied.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// Opaque handle to an image's source pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PixelSource {
    /// Natural width in pixels, when known from image metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_width: Option<u32>,
    /// Natural height in pixels, when known from image metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_height: Option<u32>,
    /// Base64-encoded payload carried inline by the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A spreadsheet drawing anchor: top-left cell plus sub-cell EMU offsets,
/// with an optional second corner and an optional explicit extent.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    /// Required in well-formed anchors; absent in malformed documents, in
    /// which case the element is skipped rather than guessed at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<AnchorPoint>,
    /// Second corner for two-cell anchors (most precise sizing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<AnchorPoint>,
    /// Explicit size in EMU for one-cell anchors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_extent: Option<Extent>,
}

/// One corner of an anchor: a cell reference plus EMU offsets into it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPoint {
    pub row: u32,
    pub col: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_offset_emu: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_offset_emu: Option<i64>,
}

/// Explicit drawing extent in EMU.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

/// Discriminated view over the three element kinds.
///
/// The driver dispatches on this by exhaustive match; elements never carry
/// runtime type tags.
#[derive(Debug, Clone, Copy)]
pub enum LayoutElement<'a> {
    Cell(&'a Cell),
    TextBox(&'a TextBox),
    Image(&'a ImageRef),
}

impl LayoutElement<'_> {
    /// Identifying name used in diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Cell(cell) => cell.label(),
            Self::TextBox(textbox) => format!("textbox {}", textbox.name),
            Self::Image(image) => format!("image {}", image.name),
        }
    }

    /// Stacking order. Cells are tiered, not z-sorted, and report 0.
    #[must_use]
    pub fn z(&self) -> i32 {
        match self {
            Self::Cell(_) => 0,
            Self::TextBox(textbox) => textbox.z,
            Self::Image(image) => image.z,
        }
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

    #[test]
    fn test_document_from_json() {
        let json = r##"{
            "sheetName": "Sheet1",
            "sizePx": { "width": 800.0, "height": 600.0 },
            "cells": [
                { "row": 0, "col": 0, "x": 0, "y": 0, "w": 100, "h": 20,
                  "value": "A1", "fillColor": "#FF0000" }
            ],
            "textboxes": [
                { "name": "TextBox 1", "left": 10, "top": 10, "width": 200,
                  "height": 80, "z": 2, "text": "hello" }
            ],
            "images": [
                { "name": "Picture 1", "left": 50, "top": 50, "width": 120,
                  "height": 90, "z": 1 }
            ]
        }"##;

        let doc = LayoutDocument::from_json_str(json).unwrap();
        assert_eq!(doc.sheet_name, "Sheet1");
        assert_eq!(doc.cells.len(), 1);
        assert_eq!(doc.cells[0].value.as_deref(), Some("A1"));
        assert_eq!(doc.cells[0].h_align, HAlign::Left);
        assert_eq!(doc.cells[0].v_align, VAlign::Bottom);
        assert_eq!(doc.textboxes[0].z, 2);
        assert_eq!(doc.images[0].z, 1);
        assert!(doc.images[0].anchor.is_none());
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let json = r#"{
            "sheetName": "Empty",
            "sizePx": { "width": 100.0, "height": 100.0 }
        }"#;
        let doc = LayoutDocument::from_json_str(json).unwrap();
        assert!(doc.cells.is_empty());
        assert!(doc.textboxes.is_empty());
        assert!(doc.images.is_empty());
    }

    #[test]
    fn test_cell_bounds_repairs_degenerate_geometry() {
        let cell = Cell {
            row: 0,
            col: 0,
            x: f64::NAN,
            y: 5.0,
            w: -3.0,
            h: 0.0,
            value: None,
            fill_color: None,
            font_name: None,
            font_size_pt: None,
            font_color: None,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
        };
        let rect = cell.bounds();
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 5.0);
        assert_eq!(rect.width, CELL_DEFAULT_WIDTH);
        assert_eq!(rect.height, CELL_DEFAULT_HEIGHT);
    }

    #[test]
    fn test_anchor_without_top_left_deserializes() {
        let json = r#"{
            "name": "Picture 2",
            "z": 3,
            "anchor": { "bottomRight": { "row": 5, "col": 5 } }
        }"#;
        let image: ImageRef = serde_json::from_str(json).unwrap();
        let anchor = image.anchor.unwrap();
        assert!(anchor.top_left.is_none());
        assert!(anchor.bottom_right.is_some());
    }

    #[test]
    fn test_element_labels() {
        let textbox = TextBox {
            name: "Notes".to_string(),
            left: 0.0,
            top: 0.0,
            width: 10.0,
            height: 10.0,
            z: 0,
            text: String::new(),
            font_size_pt: None,
            font_name: None,
            border: None,
            fill: None,
            rich_text_formatting: None,
        };
        assert_eq!(
            LayoutElement::TextBox(&textbox).label(),
            "textbox Notes"
        );
    }
}
