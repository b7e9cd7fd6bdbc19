//! xlscene - spreadsheet layout reconstruction
//!
//! Rebuilds an extracted sheet layout description (JSON) as an ordered,
//! layered scene of drawable objects issued to an external scene store:
//! - Four-tier emission: cell fills, cell borders, floating content, cell text
//! - Palette mapping onto a fixed named color set, font family and size buckets
//! - Drawing-anchor resolution and contain-fit image placement
//! - Text reflow with font shrinking toward a floor size
//! - Pixel asset registration with content-identity dedup
//!
//! # Usage
//!
//! ```
//! use xlscene::{DocumentPixels, LayoutDocument, MemorySceneStore, Reconstructor, SheetGrid};
//!
//! # fn main() -> xlscene::Result<()> {
//! let document = LayoutDocument::from_json_str(
//!     r#"{
//!         "sheetName": "Sheet1",
//!         "sizePx": { "width": 800.0, "height": 600.0 },
//!         "cells": [
//!             { "row": 0, "col": 0, "x": 0, "y": 0, "w": 100, "h": 20, "value": "Total" }
//!         ]
//!     }"#,
//! )?;
//!
//! let mut store = MemorySceneStore::new();
//! let grid = SheetGrid::default();
//! let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&document);
//!
//! // One border rectangle and one text object; no fill was recorded.
//! assert_eq!(report.objects_emitted(), 2);
//! # Ok(())
//! # }
//! ```

// Input and mapping modules
pub mod anchor;
pub mod diagnostics;
pub mod error;
pub mod fit;
pub mod grid;
pub mod palette;
pub mod pixels;
pub mod reflow;
pub mod types;
pub mod units;

// Emission modules
pub mod driver;
pub mod scene;

pub use anchor::CellGrid;
pub use diagnostics::{Diagnostics, LogDiagnostics, NullDiagnostics};
pub use driver::{ReconstructOptions, ReconstructReport, Reconstructor};
pub use error::{Result, XlsceneError};
pub use grid::SheetGrid;
pub use pixels::{DocumentPixels, PixelProvider};
pub use reflow::ReflowOptions;
pub use scene::{MemorySceneStore, SceneStore};

pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
