//! Z-order layered reconstruction driver.
//!
//! Walks a parsed layout document and issues drawable-object commands to a
//! scene store in four tiers: cell background fills, cell borders, floating
//! content (textboxes and images interleaved by z), then cell text. Within
//! a tier, document order is kept; floating content is stable-sorted by z
//! first. Grid backgrounds therefore never occlude floating content, and
//! cell text stays legible above its own fill.
//!
//! A failing element is logged through the injected diagnostics and
//! skipped; the run itself never fails.

use serde::{Deserialize, Serialize};

use crate::anchor::{apply_size_floors, resolve_anchor, CellGrid};
use crate::diagnostics::{Diagnostics, NullDiagnostics};
use crate::error::{Result, XlsceneError};
use crate::fit::contain_fit;
use crate::palette::{
    effective_font_size, map_border_dash, map_color, map_fill_color, map_font_family,
    map_font_size,
};
use crate::pixels::{probe_dimensions, ImageFormat, PixelProvider};
use crate::reflow::{estimate_width, fit_text, wrapped_height, ReflowOptions};
use crate::scene::SceneStore;
use crate::types::{
    Cell, DashStyle, DrawableObject, FillMode, FontFamily, HAlign, ImageObject, ImageRef,
    LayoutDocument, LayoutElement, Rect, RectangleObject, SceneColor, TextBox, TextObject,
    VAlign,
};

/// Stroke color for cell borders and image placeholders.
const NEUTRAL_COLOR: SceneColor = SceneColor::Grey;

/// Tuning for one reconstruction run.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconstructOptions {
    /// Wrap and shrink behavior for all emitted text.
    pub reflow: ReflowOptions,
    /// Base padding for contain-fit image placement, in pixels.
    pub image_base_padding: f64,
    /// Inset between a textbox edge and its text.
    pub textbox_text_inset: f64,
    /// Minimum wrap width for textbox text.
    pub textbox_min_text_width: f64,
    /// Inset between a cell edge and its text.
    pub cell_text_inset: f64,
    /// Minimum emitted width for cell text.
    pub cell_min_text_width: f64,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        ReconstructOptions {
            reflow: ReflowOptions::default(),
            image_base_padding: 2.0,
            textbox_text_inset: 6.0,
            textbox_min_text_width: 20.0,
            cell_text_inset: 2.0,
            cell_min_text_width: 10.0,
        }
    }
}

/// What one reconstruction run emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructReport {
    /// Tier 1 rectangles (cell background fills).
    pub cell_fills: usize,
    /// Tier 2 rectangles (cell borders).
    pub cell_borders: usize,
    /// Tier 3 commands (textbox backgrounds and text, images, placeholders).
    pub floating_objects: usize,
    /// Tier 4 text commands (cell values).
    pub cell_texts: usize,
    /// Placeholder rectangles emitted for images without usable pixels.
    pub placeholders: usize,
    /// Pixel assets newly registered with the store.
    pub assets_registered: usize,
    /// Pixel assets reused through content-identity dedup.
    pub assets_reused: usize,
    /// Labels of elements dropped after a per-element failure.
    pub skipped: Vec<String>,
}

impl ReconstructReport {
    /// Total drawable-object commands issued.
    #[must_use]
    pub fn objects_emitted(&self) -> usize {
        self.cell_fills + self.cell_borders + self.floating_objects + self.cell_texts
    }
}

/// Emission phases, entered strictly in order and never re-entered.
/// Nothing is persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    ParsingInput,
    EmittingCellBackgrounds,
    EmittingCellBorders,
    EmittingFloatingContent,
    EmittingCellText,
    Done,
}

impl Phase {
    const fn name(self) -> &'static str {
        match self {
            Self::ParsingInput => "parsing input",
            Self::EmittingCellBackgrounds => "emitting cell backgrounds",
            Self::EmittingCellBorders => "emitting cell borders",
            Self::EmittingFloatingContent => "emitting floating content",
            Self::EmittingCellText => "emitting cell text",
            Self::Done => "done",
        }
    }
}

/// Collapsed single style for a textbox, after rich-run resolution.
struct TextStyle {
    size_pt: f64,
    font: FontFamily,
    color: SceneColor,
}

/// Drives one document through the tiers against an injected store, grid,
/// pixel provider and diagnostics sink.
pub struct Reconstructor<'a> {
    store: &'a mut dyn SceneStore,
    grid: &'a dyn CellGrid,
    pixels: &'a dyn PixelProvider,
    diagnostics: &'a dyn Diagnostics,
    options: ReconstructOptions,
}

static SILENT: NullDiagnostics = NullDiagnostics;

impl<'a> Reconstructor<'a> {
    #[must_use]
    pub fn new(
        store: &'a mut dyn SceneStore,
        grid: &'a dyn CellGrid,
        pixels: &'a dyn PixelProvider,
    ) -> Self {
        Reconstructor {
            store,
            grid,
            pixels,
            diagnostics: &SILENT,
            options: ReconstructOptions::default(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ReconstructOptions) -> Self {
        self.options = options;
        self
    }

    /// Reconstruct one document, issuing commands in tier order.
    ///
    /// Infallible by contract: per-element failures are reported through
    /// the diagnostics sink and listed in the report, and the remaining
    /// elements still emit.
    pub fn reconstruct(&mut self, document: &LayoutDocument) -> ReconstructReport {
        let mut report = ReconstructReport::default();

        self.enter(Phase::ParsingInput);
        self.diagnostics.info(&format!(
            "reconstructing sheet \"{}\": {} cells, {} textboxes, {} images",
            document.sheet_name,
            document.cells.len(),
            document.textboxes.len(),
            document.images.len()
        ));
        let floating = sorted_floating(document);

        self.enter(Phase::EmittingCellBackgrounds);
        for cell in &document.cells {
            match self.emit_cell_fill(cell) {
                Ok(true) => report.cell_fills += 1,
                Ok(false) => {}
                Err(error) => self.skip(cell.label(), &error, &mut report),
            }
        }

        self.enter(Phase::EmittingCellBorders);
        for cell in &document.cells {
            match self.emit_cell_border(cell) {
                Ok(()) => report.cell_borders += 1,
                Err(error) => self.skip(cell.label(), &error, &mut report),
            }
        }

        self.enter(Phase::EmittingFloatingContent);
        for element in floating {
            let outcome = match element {
                LayoutElement::TextBox(textbox) => self.emit_textbox(textbox, &mut report),
                LayoutElement::Image(image) => self.emit_image(image, &mut report),
                LayoutElement::Cell(_) => Ok(()),
            };
            if let Err(error) = outcome {
                self.skip(element.label(), &error, &mut report);
            }
        }

        self.enter(Phase::EmittingCellText);
        for cell in &document.cells {
            match self.emit_cell_text(cell) {
                Ok(true) => report.cell_texts += 1,
                Ok(false) => {}
                Err(error) => self.skip(cell.label(), &error, &mut report),
            }
        }

        self.enter(Phase::Done);
        self.diagnostics.info(&format!(
            "done: {} objects, {} assets registered, {} reused, {} skipped",
            report.objects_emitted(),
            report.assets_registered,
            report.assets_reused,
            report.skipped.len()
        ));
        report
    }

    fn enter(&self, phase: Phase) {
        self.diagnostics.info(phase.name());
    }

    fn skip(&self, label: String, error: &XlsceneError, report: &mut ReconstructReport) {
        self.diagnostics.element_skipped(&label, error);
        report.skipped.push(label);
    }

    /// Tier 1. Emits nothing for unfilled cells and for fills that map to
    /// none (near-white reads as the sheet background).
    fn emit_cell_fill(&mut self, cell: &Cell) -> Result<bool> {
        let Some(hex) = cell.fill_color.as_deref() else {
            return Ok(false);
        };
        let Some(color) = map_fill_color(hex) else {
            return Ok(false);
        };
        self.store
            .create_object(DrawableObject::Rectangle(RectangleObject {
                geometry: cell.bounds(),
                fill: FillMode::Solid,
                color,
                dash: DashStyle::Solid,
            }))?;
        Ok(true)
    }

    /// Tier 2. Every cell gets a thin neutral outline regardless of fill.
    fn emit_cell_border(&mut self, cell: &Cell) -> Result<()> {
        self.store
            .create_object(DrawableObject::Rectangle(RectangleObject {
                geometry: cell.bounds(),
                fill: FillMode::None,
                color: NEUTRAL_COLOR,
                dash: DashStyle::Solid,
            }))?;
        Ok(())
    }

    /// Tier 3, textbox case: optional background rectangle, then text.
    /// The background must precede the text so it never occludes it.
    fn emit_textbox(&mut self, textbox: &TextBox, report: &mut ReconstructReport) -> Result<()> {
        let bounds = textbox.bounds();
        ensure_finite(&bounds)?;

        let fill_color = textbox
            .fill
            .as_ref()
            .filter(|fill| fill.opacity > 0.0)
            .and_then(|fill| map_fill_color(&fill.color));
        let border_dash = textbox
            .border
            .as_ref()
            .filter(|border| border.style != "none")
            .map(|border| map_border_dash(&border.style));

        if fill_color.is_some() || border_dash.is_some() {
            self.store
                .create_object(DrawableObject::Rectangle(RectangleObject {
                    geometry: bounds,
                    fill: if fill_color.is_some() {
                        FillMode::Solid
                    } else {
                        FillMode::None
                    },
                    color: fill_color.unwrap_or(SceneColor::Black),
                    dash: border_dash.unwrap_or_default(),
                }))?;
            report.floating_objects += 1;
        }

        let style = resolve_textbox_style(textbox);
        let inset = self.options.textbox_text_inset;
        let text_width =
            (bounds.width - 2.0 * inset).max(self.options.textbox_min_text_width);
        let text_height_budget = (bounds.height - 2.0 * inset).max(0.0);

        let fit = fit_text(
            &textbox.text,
            text_width,
            text_height_budget,
            style.size_pt,
            &self.options.reflow,
        );
        if fit.lines.is_empty() {
            return Ok(());
        }
        if fit.height(&self.options.reflow) > text_height_budget {
            self.diagnostics.fallback(
                &format!("textbox {}", textbox.name),
                "text overflows at minimum size",
            );
        }

        self.store.create_object(DrawableObject::Text(TextObject {
            geometry: Rect::new(
                bounds.x + inset,
                bounds.y + inset,
                text_width,
                fit.height(&self.options.reflow),
            ),
            content: fit.joined(),
            color: style.color,
            font: style.font,
            size: map_font_size(fit.fit_size_pt),
        }))?;
        report.floating_objects += 1;
        Ok(())
    }

    /// Tier 3, image case: resolve the display box, register or reuse the
    /// pixel asset, place contain-style. Images without usable pixels get a
    /// dashed placeholder at the display box instead.
    fn emit_image(&mut self, image: &ImageRef, report: &mut ReconstructReport) -> Result<()> {
        let display = self.resolve_image_box(image)?;

        let bytes = match self.pixels.bytes_for(image) {
            Ok(Some(bytes)) if !bytes.is_empty() => bytes,
            Ok(_) => {
                return self.emit_placeholder(image, &display, "no pixel data", report);
            }
            Err(error) => {
                let detail = format!("undecodable pixel data: {error}");
                return self.emit_placeholder(image, &display, &detail, report);
            }
        };

        let (natural_w, natural_h) = natural_dimensions(image, &bytes, &display);

        let asset = match self.store.find_asset_by_content(&bytes) {
            Some(existing) => {
                report.assets_reused += 1;
                existing
            }
            None => {
                let format = ImageFormat::from_magic_bytes(&bytes);
                let id = self.store.register_pixel_asset(
                    &bytes,
                    format.mime_type(),
                    natural_w,
                    natural_h,
                )?;
                report.assets_registered += 1;
                id
            }
        };

        let placement = contain_fit(
            &display,
            f64::from(natural_w),
            f64::from(natural_h),
            self.options.image_base_padding,
        );
        self.store.create_object(DrawableObject::Image(ImageObject {
            geometry: placement,
            asset,
        }))?;
        report.floating_objects += 1;
        Ok(())
    }

    /// Anchor takes precedence over the pre-resolved box; both paths end
    /// at the drawing size floors.
    fn resolve_image_box(&self, image: &ImageRef) -> Result<Rect> {
        if let Some(anchor) = &image.anchor {
            let source_dims = declared_dimensions(image);
            return resolve_anchor(anchor, self.grid, source_dims);
        }
        let bounds = image.bounds();
        if !bounds.x.is_finite() || !bounds.y.is_finite() {
            return Err(XlsceneError::Image(
                "non-finite display position".to_string(),
            ));
        }
        Ok(apply_size_floors(bounds))
    }

    fn emit_placeholder(
        &mut self,
        image: &ImageRef,
        display: &Rect,
        detail: &str,
        report: &mut ReconstructReport,
    ) -> Result<()> {
        self.diagnostics
            .fallback(&format!("image {}", image.name), detail);
        self.store
            .create_object(DrawableObject::Rectangle(RectangleObject {
                geometry: *display,
                fill: FillMode::None,
                color: NEUTRAL_COLOR,
                dash: DashStyle::Dashed,
            }))?;
        report.placeholders += 1;
        report.floating_objects += 1;
        Ok(())
    }

    /// Tier 4. The surface has no native alignment, so alignment becomes
    /// an x/y offset against the estimated text extent, clamped to the
    /// cell origin.
    fn emit_cell_text(&mut self, cell: &Cell) -> Result<bool> {
        let Some(value) = cell.value.as_deref() else {
            return Ok(false);
        };
        if value.trim().is_empty() {
            return Ok(false);
        }

        let bounds = cell.bounds();
        let size_pt = effective_font_size(cell.font_size_pt);
        let reflow = &self.options.reflow;
        let est_width = estimate_width(value.chars().count(), size_pt, reflow.width_factor);
        let text_height = wrapped_height(1, size_pt, reflow.line_height);
        let inset = self.options.cell_text_inset;

        let x = match cell.h_align {
            HAlign::Left => bounds.x + inset,
            HAlign::Center => bounds.x + (bounds.width - est_width) / 2.0,
            HAlign::Right => bounds.x + bounds.width - est_width - inset,
        }
        .max(bounds.x);
        let y = match cell.v_align {
            VAlign::Top => bounds.y + inset,
            VAlign::Middle => bounds.y + (bounds.height - text_height) / 2.0,
            VAlign::Bottom => bounds.y + bounds.height - text_height - inset,
        }
        .max(bounds.y);
        let width = (bounds.width - 2.0 * inset).max(self.options.cell_min_text_width);

        self.store.create_object(DrawableObject::Text(TextObject {
            geometry: Rect::new(x, y, width, text_height),
            content: value.to_string(),
            color: cell
                .font_color
                .as_deref()
                .map_or(SceneColor::Black, map_color),
            font: cell
                .font_name
                .as_deref()
                .map(map_font_family)
                .unwrap_or_default(),
            size: map_font_size(size_pt),
        }))?;
        Ok(true)
    }
}

/// Merge textboxes and images, stable-sorted ascending by z. Ties keep
/// input order: textboxes before images, document order within each.
fn sorted_floating(document: &LayoutDocument) -> Vec<LayoutElement<'_>> {
    let mut floating: Vec<LayoutElement<'_>> = document
        .textboxes
        .iter()
        .map(LayoutElement::TextBox)
        .chain(document.images.iter().map(LayoutElement::Image))
        .collect();
    floating.sort_by_key(LayoutElement::z);
    floating
}

/// Collapse rich-text runs onto one style by the smallest run size; runs
/// without a valid size are ignored. The winning run also supplies font
/// and color when it has them, the box defaults cover the rest.
fn resolve_textbox_style(textbox: &TextBox) -> TextStyle {
    let smallest = textbox
        .rich_text_formatting
        .iter()
        .flatten()
        .filter(|run| {
            run.font_size
                .is_some_and(|size| size.is_finite() && size > 0.0)
        })
        .min_by(|a, b| {
            let left = a.font_size.unwrap_or(f64::MAX);
            let right = b.font_size.unwrap_or(f64::MAX);
            left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal)
        });

    let size_pt = effective_font_size(
        smallest
            .and_then(|run| run.font_size)
            .or(textbox.font_size_pt),
    );
    let font_name = smallest
        .and_then(|run| run.font_name.as_deref())
        .or(textbox.font_name.as_deref());
    let color = smallest
        .and_then(|run| run.color.as_deref())
        .map_or(SceneColor::Black, map_color);

    TextStyle {
        size_pt,
        font: font_name.map(map_font_family).unwrap_or_default(),
        color,
    }
}

/// Natural asset size: header probe first, then the declared source dims,
/// then the display box itself.
fn natural_dimensions(image: &ImageRef, bytes: &[u8], display: &Rect) -> (u32, u32) {
    probe_dimensions(bytes)
        .or_else(|| declared_dimensions(image))
        .unwrap_or((px_u32(display.width), px_u32(display.height)))
}

fn declared_dimensions(image: &ImageRef) -> Option<(u32, u32)> {
    image
        .source
        .source_width
        .zip(image.source.source_height)
        .filter(|&(w, h)| w > 0 && h > 0)
}

fn ensure_finite(rect: &Rect) -> Result<()> {
    if rect.x.is_finite() && rect.y.is_finite() && rect.width.is_finite() && rect.height.is_finite()
    {
        Ok(())
    } else {
        Err(XlsceneError::Other("non-finite geometry".to_string()))
    }
}

/// Display boxes are floored to at least 1px before this runs.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px_u32(value: f64) -> u32 {
    value.round().clamp(1.0, f64::from(u32::MAX)) as u32
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
    use crate::grid::SheetGrid;
    use crate::pixels::DocumentPixels;
    use crate::scene::MemorySceneStore;
    use crate::types::{PixelSource, RichTextRun, SheetSize};

    fn textbox(z: i32) -> TextBox {
        TextBox {
            name: format!("TextBox {z}"),
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 80.0,
            z,
            text: "hello".to_string(),
            font_size_pt: None,
            font_name: None,
            border: None,
            fill: None,
            rich_text_formatting: None,
        }
    }

    fn image(z: i32) -> ImageRef {
        ImageRef {
            name: format!("Picture {z}"),
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 50.0,
            z,
            anchor: None,
            source: PixelSource::default(),
        }
    }

    fn cell(value: Option<&str>, fill: Option<&str>) -> Cell {
        Cell {
            row: 0,
            col: 0,
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 20.0,
            value: value.map(str::to_string),
            fill_color: fill.map(str::to_string),
            font_name: None,
            font_size_pt: None,
            font_color: None,
            h_align: HAlign::Left,
            v_align: VAlign::Bottom,
        }
    }

    fn document() -> LayoutDocument {
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

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0, 0, 0, 13]);
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }

    #[test]
    fn test_floating_sort_is_stable_ascending() {
        let mut doc = document();
        doc.textboxes = vec![textbox(3), textbox(1)];
        doc.images = vec![image(1), image(2)];

        let labels: Vec<String> = sorted_floating(&doc)
            .iter()
            .map(LayoutElement::label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "textbox TextBox 1",
                "image Picture 1",
                "image Picture 2",
                "textbox TextBox 3"
            ]
        );
    }

    #[test]
    fn test_smallest_rich_run_wins() {
        let mut tb = textbox(0);
        tb.font_size_pt = Some(14.0);
        tb.rich_text_formatting = Some(vec![
            RichTextRun {
                start: 0,
                end: 2,
                font_name: Some("Courier New".to_string()),
                font_size: Some(18.0),
                color: None,
            },
            RichTextRun {
                start: 2,
                end: 5,
                font_name: None,
                font_size: Some(9.0),
                color: Some("#FF0000".to_string()),
            },
        ]);

        let style = resolve_textbox_style(&tb);
        assert_eq!(style.size_pt, 9.0);
        assert_eq!(style.color, SceneColor::Red);
        assert_eq!(style.font, FontFamily::Sans);
    }

    #[test]
    fn test_sizeless_runs_fall_back_to_box_style() {
        let mut tb = textbox(0);
        tb.font_size_pt = Some(16.0);
        tb.rich_text_formatting = Some(vec![RichTextRun {
            start: 0,
            end: 5,
            font_name: None,
            font_size: None,
            color: Some("#0000FF".to_string()),
        }]);

        let style = resolve_textbox_style(&tb);
        assert_eq!(style.size_pt, 16.0);
        assert_eq!(style.color, SceneColor::Black);
    }

    #[test]
    fn test_natural_dimension_ladder() {
        let display = Rect::new(0.0, 0.0, 300.0, 200.0);
        let mut img = image(0);

        assert_eq!(natural_dimensions(&img, b"junk", &display), (300, 200));

        img.source.source_width = Some(640);
        img.source.source_height = Some(480);
        assert_eq!(natural_dimensions(&img, b"junk", &display), (640, 480));

        let png = png_bytes(32, 16);
        assert_eq!(natural_dimensions(&img, &png, &display), (32, 16));
    }

    #[test]
    fn test_cell_emits_fill_border_text_in_order() {
        let mut doc = document();
        doc.cells = vec![cell(Some("total"), Some("#FF0000"))];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.cell_fills, 1);
        assert_eq!(report.cell_borders, 1);
        assert_eq!(report.cell_texts, 1);
        assert_eq!(report.floating_objects, 0);
        assert!(report.skipped.is_empty());

        match &store.objects()[0] {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.fill, FillMode::Solid);
                assert_eq!(rect.color, SceneColor::Red);
            }
            other => panic!("expected fill rectangle, got {other:?}"),
        }
        match &store.objects()[1] {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.fill, FillMode::None);
                assert_eq!(rect.color, SceneColor::Grey);
                assert_eq!(rect.dash, DashStyle::Solid);
            }
            other => panic!("expected border rectangle, got {other:?}"),
        }
        match &store.objects()[2] {
            DrawableObject::Text(text) => assert_eq!(text.content, "total"),
            other => panic!("expected cell text, got {other:?}"),
        }
    }

    #[test]
    fn test_near_white_fill_is_skipped() {
        let mut doc = document();
        doc.cells = vec![cell(None, Some("#FFFFFF"))];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.cell_fills, 0);
        assert_eq!(report.cell_borders, 1);
        assert_eq!(store.objects().len(), 1);
    }

    #[test]
    fn test_border_only_textbox_gets_unfilled_black_outline() {
        let mut doc = document();
        let mut tb = textbox(0);
        tb.border = Some(crate::types::BorderSpec {
            style: "dashDot".to_string(),
            width: None,
        });
        doc.textboxes = vec![tb];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.floating_objects, 2);
        match &store.objects()[0] {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.fill, FillMode::None);
                assert_eq!(rect.color, SceneColor::Black);
                assert_eq!(rect.dash, DashStyle::Dashed);
            }
            other => panic!("expected background rectangle, got {other:?}"),
        }
        match &store.objects()[1] {
            DrawableObject::Text(text) => {
                assert_eq!(text.content, "hello");
                assert_eq!(text.geometry.x, 6.0);
                assert_eq!(text.geometry.y, 6.0);
            }
            other => panic!("expected textbox text, got {other:?}"),
        }
    }

    #[test]
    fn test_borderless_unfilled_textbox_emits_text_only() {
        let mut doc = document();
        doc.textboxes = vec![textbox(0)];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.floating_objects, 1);
        assert!(matches!(&store.objects()[0], DrawableObject::Text(_)));
    }

    #[test]
    fn test_image_without_pixels_gets_placeholder() {
        let mut doc = document();
        doc.images = vec![image(0)];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.placeholders, 1);
        assert_eq!(report.assets_registered, 0);
        match &store.objects()[0] {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.fill, FillMode::None);
                assert_eq!(rect.color, SceneColor::Grey);
                assert_eq!(rect.dash, DashStyle::Dashed);
                assert_eq!(rect.geometry.width, 100.0);
                assert_eq!(rect.geometry.height, 50.0);
            }
            other => panic!("expected placeholder rectangle, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_anchor_skips_element_and_continues() {
        let mut doc = document();
        let mut img = image(0);
        img.anchor = Some(crate::types::Anchor {
            top_left: None,
            bottom_right: None,
            explicit_extent: None,
        });
        doc.images = vec![img];
        doc.cells = vec![cell(Some("kept"), None)];

        let mut store = MemorySceneStore::new();
        let grid = SheetGrid::default();
        let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(&doc);

        assert_eq!(report.skipped, vec!["image Picture 0".to_string()]);
        assert_eq!(report.cell_texts, 1);
        assert_eq!(report.floating_objects, 0);
    }
}
