//! Shared builders and assertion helpers for reconstruction tests.
//!
//! Documents are built programmatically (or from JSON literals in the
//! suites themselves); the in-memory scene store plus the uniform default
//! grid keep every run deterministic.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use xlscene::{
    Cell, Diagnostics, DocumentPixels, HAlign, ImageRef, LayoutDocument, MemorySceneStore,
    PixelSource, ReconstructReport, Reconstructor, SheetGrid, SheetSize, TextBox, VAlign,
    XlsceneError,
};

/// Empty single-sheet document.
#[must_use]
pub fn document() -> LayoutDocument {
    LayoutDocument {
        sheet_name: "Sheet1".to_string(),
        size_px: SheetSize {
            width: 800.0,
            height: 600.0,
        },
        cells: Vec::new(),
        textboxes: Vec::new(),
        images: Vec::new(),
    }
}

/// Plain 100x20 cell laid out on a uniform grid of that pitch.
#[must_use]
pub fn cell(row: u32, col: u32, value: Option<&str>) -> Cell {
    Cell {
        row,
        col,
        x: f64::from(col) * 100.0,
        y: f64::from(row) * 20.0,
        w: 100.0,
        h: 20.0,
        value: value.map(str::to_string),
        fill_color: None,
        font_name: None,
        font_size_pt: None,
        font_color: None,
        h_align: HAlign::Left,
        v_align: VAlign::Bottom,
    }
}

/// Bare 200x80 textbox at the origin.
#[must_use]
pub fn textbox(name: &str, z: i32, text: &str) -> TextBox {
    TextBox {
        name: name.to_string(),
        left: 0.0,
        top: 0.0,
        width: 200.0,
        height: 80.0,
        z,
        text: text.to_string(),
        font_size_pt: None,
        font_name: None,
        border: None,
        fill: None,
        rich_text_formatting: None,
    }
}

/// Image with a pre-resolved 200x100 display box and no payload.
#[must_use]
pub fn image(name: &str, z: i32) -> ImageRef {
    ImageRef {
        name: name.to_string(),
        left: 0.0,
        top: 0.0,
        width: 200.0,
        height: 100.0,
        z,
        anchor: None,
        source: PixelSource::default(),
    }
}

/// Minimal PNG header claiming the given dimensions. `filler` trails the
/// header so payloads with equal dimensions can still differ by content.
#[must_use]
pub fn png_bytes(width: u32, height: u32, filler: u8) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0, 0, 0, 13]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.push(filler);
    data
}

/// The same header wrapped as the data URL form documents carry inline.
#[must_use]
pub fn png_data_url(width: u32, height: u32, filler: u8) -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png_bytes(width, height, filler))
    )
}

/// Run a document against a fresh store, the default uniform grid and the
/// document's own inline payloads.
#[must_use]
pub fn run(document: &LayoutDocument) -> (MemorySceneStore, ReconstructReport) {
    let mut store = MemorySceneStore::new();
    let grid = SheetGrid::default();
    let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(document);
    (store, report)
}

/// As [`run`], but with a recording diagnostics sink.
#[must_use]
pub fn run_with_diagnostics(
    document: &LayoutDocument,
    diagnostics: &CollectingDiagnostics,
) -> (MemorySceneStore, ReconstructReport) {
    let mut store = MemorySceneStore::new();
    let grid = SheetGrid::default();
    let report = Reconstructor::new(&mut store, &grid, &DocumentPixels)
        .with_diagnostics(diagnostics)
        .reconstruct(document);
    (store, report)
}

/// Diagnostics sink that records every event for later assertions.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    pub infos: RefCell<Vec<String>>,
    pub skips: RefCell<Vec<String>>,
    pub fallbacks: RefCell<Vec<String>>,
}

impl Diagnostics for CollectingDiagnostics {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn element_skipped(&self, element: &str, error: &XlsceneError) {
        self.skips.borrow_mut().push(format!("{element}: {error}"));
    }

    fn fallback(&self, element: &str, detail: &str) {
        self.fallbacks.borrow_mut().push(format!("{element}: {detail}"));
    }
}

/// Assert two floats agree to within a millionth of a pixel.
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}
