//! Text layout tests: textbox reflow and shrinking, rich-run collapse, and
//! cell text alignment offsets.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{
    assert_close, cell, document, run, run_with_diagnostics, textbox, CollectingDiagnostics,
};
use xlscene::{
    DrawableObject, FontFamily, FontSize, HAlign, RichTextRun, SceneColor, VAlign,
};

#[test]
fn test_textbox_text_shrinks_until_it_fits() {
    let mut doc = document();
    let mut tb = textbox("Small", 0, "hi");
    // 14px of text height available; 12pt needs 16.2, 10pt fits at 13.5.
    tb.height = 26.0;
    doc.textboxes = vec![tb];

    let diagnostics = CollectingDiagnostics::default();
    let (store, report) = run_with_diagnostics(&doc, &diagnostics);

    assert_eq!(report.floating_objects, 1);
    assert!(diagnostics.fallbacks.borrow().is_empty());
    match &store.objects()[0] {
        DrawableObject::Text(text) => {
            assert_eq!(text.content, "hi");
            assert_eq!(text.size, FontSize::S);
            assert_close(text.geometry.height, 13.5, "settled text height");
        }
        other => panic!("expected textbox text, got {other:?}"),
    }
}

#[test]
fn test_textbox_overflow_accepted_at_floor() {
    let mut doc = document();
    let mut tb = textbox("Long", 0, "hello world hello world");
    tb.width = 100.0;
    tb.height = 26.0;
    doc.textboxes = vec![tb];

    let diagnostics = CollectingDiagnostics::default();
    let (store, report) = run_with_diagnostics(&doc, &diagnostics);

    // Two lines at every size down to the floor; the floor wins and the
    // overflow is reported, not dropped.
    assert_eq!(report.floating_objects, 1);
    match &store.objects()[0] {
        DrawableObject::Text(text) => {
            assert_eq!(text.content, "hello world hello\nworld");
            assert_eq!(text.size, FontSize::S);
        }
        other => panic!("expected textbox text, got {other:?}"),
    }

    let fallbacks = diagnostics.fallbacks.borrow();
    assert_eq!(fallbacks.len(), 1);
    assert!(fallbacks[0].starts_with("textbox Long:"));
    assert!(fallbacks[0].contains("overflows"));
}

#[test]
fn test_newlines_break_paragraphs() {
    let mut doc = document();
    doc.textboxes = vec![textbox("Para", 0, "a\nb")];

    let (store, _) = run(&doc);

    match &store.objects()[0] {
        DrawableObject::Text(text) => {
            assert_eq!(text.content, "a\nb");
            assert_close(text.geometry.height, 32.4, "two-line height");
        }
        other => panic!("expected textbox text, got {other:?}"),
    }
}

#[test]
fn test_empty_textbox_emits_nothing() {
    let mut doc = document();
    doc.textboxes = vec![textbox("Empty", 0, "   ")];

    let (store, report) = run(&doc);

    assert_eq!(report.floating_objects, 0);
    assert!(store.objects().is_empty());
}

#[test]
fn test_rich_runs_collapse_to_smallest_size() {
    let mut doc = document();
    let mut tb = textbox("Runs", 0, "mixed");
    tb.font_size_pt = Some(24.0);
    tb.rich_text_formatting = Some(vec![
        RichTextRun {
            start: 0,
            end: 2,
            font_name: None,
            font_size: Some(24.0),
            color: None,
        },
        RichTextRun {
            start: 2,
            end: 5,
            font_name: Some("Times New Roman".to_string()),
            font_size: Some(10.0),
            color: Some("#FF0000".to_string()),
        },
    ]);
    doc.textboxes = vec![tb];

    let (store, _) = run(&doc);

    match &store.objects()[0] {
        DrawableObject::Text(text) => {
            assert_eq!(text.size, FontSize::S);
            assert_eq!(text.font, FontFamily::Serif);
            assert_eq!(text.color, SceneColor::Red);
        }
        other => panic!("expected textbox text, got {other:?}"),
    }
}

#[test]
fn test_cell_alignment_offsets() {
    let mut doc = document();
    let mut centered = cell(1, 0, Some("ab"));
    centered.h_align = HAlign::Center;
    centered.v_align = VAlign::Middle;
    let mut right_top = cell(2, 0, Some("ab"));
    right_top.h_align = HAlign::Right;
    right_top.v_align = VAlign::Top;
    doc.cells = vec![cell(0, 0, Some("ab")), centered, right_top];

    let (store, report) = run(&doc);
    assert_eq!(report.cell_texts, 3);

    // Borders occupy the first three slots; texts follow in cell order.
    // "ab" at 12pt estimates 14.4px wide, 16.2px tall.
    match &store.objects()[3] {
        DrawableObject::Text(text) => {
            assert_close(text.geometry.x, 2.0, "left x");
            assert_close(text.geometry.y, 1.8, "bottom y");
        }
        other => panic!("expected cell text, got {other:?}"),
    }
    match &store.objects()[4] {
        DrawableObject::Text(text) => {
            assert_close(text.geometry.x, 42.8, "centered x");
            assert_close(text.geometry.y, 21.9, "middle y");
        }
        other => panic!("expected cell text, got {other:?}"),
    }
    match &store.objects()[5] {
        DrawableObject::Text(text) => {
            assert_close(text.geometry.x, 83.6, "right x");
            assert_close(text.geometry.y, 42.0, "top y");
        }
        other => panic!("expected cell text, got {other:?}"),
    }
}

#[test]
fn test_alignment_clamps_to_cell_origin() {
    let mut doc = document();
    let mut tiny = cell(0, 0, Some("aaaaaaaaaa"));
    tiny.w = 10.0;
    tiny.h = 10.0;
    tiny.h_align = HAlign::Right;
    doc.cells = vec![tiny];

    let (store, _) = run(&doc);

    // Estimated width far exceeds the cell; offsets clamp at the origin
    // instead of going negative.
    match &store.objects()[1] {
        DrawableObject::Text(text) => {
            assert_close(text.geometry.x, 0.0, "clamped x");
            assert_close(text.geometry.y, 0.0, "clamped y");
            assert_close(text.geometry.width, 10.0, "min text width");
        }
        other => panic!("expected cell text, got {other:?}"),
    }
}

#[test]
fn test_whitespace_cell_value_skipped() {
    let mut doc = document();
    doc.cells = vec![cell(0, 0, Some("   "))];

    let (store, report) = run(&doc);

    assert_eq!(report.cell_texts, 0);
    assert_eq!(report.cell_borders, 1);
    assert_eq!(store.objects().len(), 1);
}

#[test]
fn test_cell_font_styling_flows_through() {
    let mut doc = document();
    let mut styled = cell(0, 0, Some("x"));
    styled.font_color = Some("#FF0000".to_string());
    styled.font_name = Some("Courier New".to_string());
    styled.font_size_pt = Some(20.0);
    doc.cells = vec![styled];

    let (store, _) = run(&doc);

    match &store.objects()[1] {
        DrawableObject::Text(text) => {
            assert_eq!(text.color, SceneColor::Red);
            assert_eq!(text.font, FontFamily::Mono);
            assert_eq!(text.size, FontSize::L);
        }
        other => panic!("expected cell text, got {other:?}"),
    }
}
