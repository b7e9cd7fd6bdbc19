//! Image pipeline tests: asset registration and dedup, anchor-derived
//! display boxes, contain-fit placement and placeholder fallbacks.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{document, image, png_data_url, run, run_with_diagnostics, CollectingDiagnostics};
use xlscene::{
    Anchor, AnchorPoint, AssetId, DashStyle, DrawableObject, Extent, FillMode, Rect, SceneColor,
};

fn image_asset_ids(store: &xlscene::MemorySceneStore) -> Vec<AssetId> {
    store
        .objects()
        .iter()
        .filter_map(|object| match object {
            DrawableObject::Image(img) => Some(img.asset),
            _ => None,
        })
        .collect()
}

#[test]
fn test_identical_payloads_register_once() {
    let mut doc = document();
    let mut first = image("Pic 1", 0);
    first.source.data = Some(png_data_url(40, 20, 7));
    let mut second = image("Pic 2", 1);
    second.left = 300.0;
    second.source.data = Some(png_data_url(40, 20, 7));
    doc.images = vec![first, second];

    let (store, report) = run(&doc);

    assert_eq!(report.assets_registered, 1);
    assert_eq!(report.assets_reused, 1);
    assert_eq!(store.assets().len(), 1);

    let ids = image_asset_ids(&store);
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);
}

#[test]
fn test_distinct_payloads_register_separately() {
    let mut doc = document();
    let mut first = image("Pic 1", 0);
    first.source.data = Some(png_data_url(40, 20, 1));
    let mut second = image("Pic 2", 1);
    second.source.data = Some(png_data_url(40, 20, 2));
    doc.images = vec![first, second];

    let (store, report) = run(&doc);

    assert_eq!(report.assets_registered, 2);
    assert_eq!(report.assets_reused, 0);
    assert_eq!(store.assets().len(), 2);

    let ids = image_asset_ids(&store);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_placement_contained_in_display_box() {
    let mut doc = document();
    let mut img = image("Pic", 0);
    img.left = 10.0;
    img.top = 200.0;
    img.width = 160.0;
    img.height = 120.0;
    img.source.data = Some(png_data_url(40, 20, 3));
    doc.images = vec![img];

    let (store, report) = run(&doc);
    assert_eq!(report.floating_objects, 1);

    let display = Rect::new(10.0, 200.0, 160.0, 120.0);
    match &store.objects()[0] {
        DrawableObject::Image(obj) => {
            assert!(display.contains(&obj.geometry, 1.0));
            // 40x20 source scaled into the padded interior, centered.
            assert_eq!(obj.geometry.width, 154.0);
            assert_eq!(obj.geometry.height, 77.0);
            assert_eq!(obj.geometry.x, 13.0);
            assert_eq!(obj.geometry.y, 222.0);
        }
        other => panic!("expected image object, got {other:?}"),
    }
}

#[test]
fn test_two_point_anchor_resolves_display_box() {
    let mut doc = document();
    let mut img = image("Anchored", 0);
    img.anchor = Some(Anchor {
        top_left: Some(AnchorPoint {
            row: 0,
            col: 0,
            col_offset_emu: None,
            row_offset_emu: None,
        }),
        bottom_right: Some(AnchorPoint {
            row: 2,
            col: 3,
            col_offset_emu: None,
            row_offset_emu: None,
        }),
        explicit_extent: None,
    });
    doc.images = vec![img];

    let (store, _) = run(&doc);

    // Uniform 64x20 grid: 3 columns wide, 2 rows tall; height floored to 50.
    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.geometry, Rect::new(0.0, 0.0, 192.0, 50.0));
            assert_eq!(rect.dash, DashStyle::Dashed);
        }
        other => panic!("expected placeholder, got {other:?}"),
    }
}

#[test]
fn test_explicit_extent_sizes_one_point_anchor() {
    let mut doc = document();
    let mut img = image("Extent", 0);
    img.anchor = Some(Anchor {
        top_left: Some(AnchorPoint {
            row: 1,
            col: 1,
            col_offset_emu: None,
            row_offset_emu: None,
        }),
        bottom_right: None,
        explicit_extent: Some(Extent {
            cx: 1_828_800,
            cy: 457_200,
        }),
    });
    doc.images = vec![img];

    let (store, _) = run(&doc);

    // 1828800 EMU is 192px; 457200 EMU is 48px, floored to 50.
    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.geometry, Rect::new(64.0, 20.0, 192.0, 50.0));
        }
        other => panic!("expected placeholder, got {other:?}"),
    }
}

#[test]
fn test_source_dims_scale_into_anchor_cell() {
    let mut doc = document();
    let mut img = image("Scaled", 0);
    img.anchor = Some(Anchor {
        top_left: Some(AnchorPoint {
            row: 0,
            col: 0,
            col_offset_emu: None,
            row_offset_emu: None,
        }),
        bottom_right: None,
        explicit_extent: None,
    });
    img.source.source_width = Some(32);
    img.source.source_height = Some(16);
    doc.images = vec![img];

    let (store, _) = run(&doc);

    // 32x16 fits the 64x20 cell unscaled, then the sizing minimums and the
    // drawing floors take over.
    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.geometry, Rect::new(0.0, 0.0, 100.0, 50.0));
        }
        other => panic!("expected placeholder, got {other:?}"),
    }
}

#[test]
fn test_undecodable_payload_falls_back_to_placeholder() {
    let mut doc = document();
    let mut img = image("Pic", 0);
    img.source.data = Some("data:image/png;base64,%%%not-base64%%%".to_string());
    doc.images = vec![img];

    let diagnostics = CollectingDiagnostics::default();
    let (store, report) = run_with_diagnostics(&doc, &diagnostics);

    assert_eq!(report.placeholders, 1);
    assert_eq!(report.assets_registered, 0);
    assert!(report.skipped.is_empty());

    match &store.objects()[0] {
        DrawableObject::Rectangle(rect) => {
            assert_eq!(rect.fill, FillMode::None);
            assert_eq!(rect.color, SceneColor::Grey);
            assert_eq!(rect.dash, DashStyle::Dashed);
        }
        other => panic!("expected placeholder, got {other:?}"),
    }

    let fallbacks = diagnostics.fallbacks.borrow();
    assert_eq!(fallbacks.len(), 1);
    assert!(fallbacks[0].starts_with("image Pic:"));
    assert!(fallbacks[0].contains("undecodable"));
}
