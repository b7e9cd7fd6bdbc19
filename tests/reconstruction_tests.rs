//! End-to-end reconstruction tests: tier ordering, run reports and phase
//! diagnostics over whole documents.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{
    assert_close, cell, document, image, png_data_url, run, run_with_diagnostics, textbox,
    CollectingDiagnostics,
};
use xlscene::{
    Anchor, BorderSpec, DashStyle, DocumentPixels, DrawableObject, FillMode, FontSize,
    LayoutDocument, LogDiagnostics, MemorySceneStore, Reconstructor, SceneColor, SheetGrid,
};

#[test]
fn test_objects_emit_in_tier_order() {
    let mut doc = document();
    let mut filled = cell(0, 0, Some("a"));
    filled.fill_color = Some("#FF0000".to_string());
    doc.cells = vec![filled, cell(0, 1, Some("b"))];

    let mut note = textbox("Note", 1, "hello");
    note.border = Some(BorderSpec {
        style: "solid".to_string(),
        width: Some(1.0),
    });
    doc.textboxes = vec![note];
    doc.images = vec![image("Pic", 0)];

    let (store, report) = run(&doc);

    assert_eq!(report.cell_fills, 1);
    assert_eq!(report.cell_borders, 2);
    assert_eq!(report.floating_objects, 3);
    assert_eq!(report.cell_texts, 2);
    assert_eq!(report.placeholders, 1);
    assert_eq!(report.objects_emitted(), 8);
    assert_eq!(store.objects().len(), 8);

    // Tier 1: the one mapped fill.
    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.fill, FillMode::Solid);
            assert_eq!(rect.color, SceneColor::Red);
        }
        other => panic!("expected fill rectangle, got {other:?}"),
    }

    // Tier 2: a grey border per cell.
    for object in &store.objects()[1..3] {
        match object {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.fill, FillMode::None);
                assert_eq!(rect.color, SceneColor::Grey);
                assert_eq!(rect.dash, DashStyle::Solid);
            }
            other => panic!("expected border rectangle, got {other:?}"),
        }
    }

    // Tier 3: the z 0 placeholder precedes the z 1 textbox pair.
    match &store.objects()[3] {
        DrawableObject::Rectangle(rect) => assert_eq!(rect.dash, DashStyle::Dashed),
        other => panic!("expected placeholder, got {other:?}"),
    }
    match &store.objects()[4] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.fill, FillMode::None);
            assert_eq!(rect.color, SceneColor::Black);
            assert_eq!(rect.dash, DashStyle::Solid);
        }
        other => panic!("expected textbox outline, got {other:?}"),
    }
    match &store.objects()[5] {
        DrawableObject::Text(text) => assert_eq!(text.content, "hello"),
        other => panic!("expected textbox text, got {other:?}"),
    }

    // Tier 4: cell values in document order.
    match &store.objects()[6] {
        DrawableObject::Text(text) => assert_eq!(text.content, "a"),
        other => panic!("expected cell text, got {other:?}"),
    }
    match &store.objects()[7] {
        DrawableObject::Text(text) => assert_eq!(text.content, "b"),
        other => panic!("expected cell text, got {other:?}"),
    }
}

#[test]
fn test_phases_logged_in_order() {
    let doc = document();
    let diagnostics = CollectingDiagnostics::default();
    let (store, report) = run_with_diagnostics(&doc, &diagnostics);

    assert_eq!(report.objects_emitted(), 0);
    assert!(store.objects().is_empty());

    let infos = diagnostics.infos.borrow();
    let position = |needle: &str| {
        infos
            .iter()
            .position(|message| message == needle)
            .unwrap_or_else(|| panic!("missing phase line {needle:?}"))
    };
    assert!(position("parsing input") < position("emitting cell backgrounds"));
    assert!(position("emitting cell backgrounds") < position("emitting cell borders"));
    assert!(position("emitting cell borders") < position("emitting floating content"));
    assert!(position("emitting floating content") < position("emitting cell text"));
    assert!(position("emitting cell text") < position("done"));
    assert!(infos.iter().any(|message| message.starts_with("done:")));
}

#[test]
fn test_json_document_full_pipeline() {
    let payload = png_data_url(40, 20, 1);
    let json = format!(
        r##"{{
            "sheetName": "Mixed",
            "sizePx": {{ "width": 640.0, "height": 400.0 }},
            "cells": [
                {{ "row": 0, "col": 0, "x": 0, "y": 0, "w": 100, "h": 20,
                   "value": "Title", "fillColor": "#4472C4", "fontColor": "#FFFFFF",
                   "fontSizePt": 14, "hAlign": "center", "vAlign": "middle" }}
            ],
            "textboxes": [
                {{ "name": "TextBox 1", "left": 120, "top": 40, "width": 200, "height": 60,
                   "z": 2, "text": "note", "fill": {{ "color": "#FFFF00" }} }}
            ],
            "images": [
                {{ "name": "Picture 1", "left": 10, "top": 200, "width": 160, "height": 120,
                   "z": 1, "source": {{ "data": "{payload}" }} }}
            ]
        }}"##
    );
    let doc = LayoutDocument::from_json_str(&json).unwrap();
    let (store, report) = run(&doc);

    assert_eq!(report.cell_fills, 1);
    assert_eq!(report.cell_borders, 1);
    assert_eq!(report.floating_objects, 3);
    assert_eq!(report.cell_texts, 1);
    assert_eq!(report.assets_registered, 1);
    assert_eq!(report.assets_reused, 0);
    assert!(report.skipped.is_empty());

    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.fill, FillMode::Solid);
            assert_eq!(rect.color, SceneColor::Blue);
        }
        other => panic!("expected fill rectangle, got {other:?}"),
    }

    // Floating order by z: the image (z 1) precedes the textbox (z 2).
    assert!(matches!(&store.objects()[2], DrawableObject::Image(_)));
    match &store.objects()[3] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.fill, FillMode::Solid);
            assert_eq!(rect.color, SceneColor::Yellow);
            assert_eq!(rect.dash, DashStyle::Solid);
        }
        other => panic!("expected textbox background, got {other:?}"),
    }
    match &store.objects()[4] {
        DrawableObject::Text(text) => assert_eq!(text.content, "note"),
        other => panic!("expected textbox text, got {other:?}"),
    }

    // Centered white 14pt title: offset against the estimated extent.
    match &store.objects()[5] {
        DrawableObject::Text(text) => {
            assert_eq!(text.content, "Title");
            assert_eq!(text.color, SceneColor::White);
            assert_eq!(text.size, FontSize::M);
            assert_close(text.geometry.x, 29.0, "centered x");
            assert_close(text.geometry.y, 0.55, "middle y");
        }
        other => panic!("expected cell text, got {other:?}"),
    }

    let asset = &store.assets()[0];
    assert_eq!(asset.mime_type, "image/png");
    assert_eq!(asset.natural_width, 40);
    assert_eq!(asset.natural_height, 20);
}

#[test]
fn test_skipped_elements_reported_and_run_continues() {
    let mut doc = document();
    let mut broken = image("Broken", 0);
    broken.anchor = Some(Anchor {
        top_left: None,
        bottom_right: None,
        explicit_extent: None,
    });
    doc.images = vec![broken];
    doc.cells = vec![cell(0, 0, Some("kept"))];

    let diagnostics = CollectingDiagnostics::default();
    let (store, report) = run_with_diagnostics(&doc, &diagnostics);

    assert_eq!(report.skipped, vec!["image Broken".to_string()]);
    assert_eq!(report.cell_texts, 1);
    assert_eq!(store.objects().len(), 2);

    let skips = diagnostics.skips.borrow();
    assert_eq!(skips.len(), 1);
    assert!(skips[0].starts_with("image Broken:"));
}

#[test]
fn test_log_diagnostics_sink_accepts_a_run() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut doc = document();
    doc.cells = vec![cell(0, 0, Some("logged"))];

    let mut store = MemorySceneStore::new();
    let grid = SheetGrid::default();
    let diagnostics = LogDiagnostics;
    let report = Reconstructor::new(&mut store, &grid, &DocumentPixels)
        .with_diagnostics(&diagnostics)
        .reconstruct(&doc);

    assert_eq!(report.objects_emitted(), 2);
}

#[test]
fn test_negative_z_sorts_below_zero() {
    let mut doc = document();
    doc.textboxes = vec![textbox("Front", 0, "front")];
    doc.images = vec![image("Back", -5)];

    let (store, report) = run(&doc);

    assert_eq!(report.floating_objects, 2);
    assert!(matches!(&store.objects()[0], DrawableObject::Rectangle(_)));
    match &store.objects()[1] {
        DrawableObject::Text(text) => assert_eq!(text.content, "front"),
        other => panic!("expected textbox text, got {other:?}"),
    }
}
