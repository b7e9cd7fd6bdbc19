//! Benchmarks for layout reconstruction.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlscene::{
    Cell, DocumentPixels, HAlign, ImageRef, LayoutDocument, MemorySceneStore, PixelSource,
    Reconstructor, SheetGrid, SheetSize, TextBox, VAlign,
};

fn png_payload(filler: u8) -> String {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0, 0, 0, 13]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&64u32.to_be_bytes());
    data.extend_from_slice(&48u32.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.push(filler);
    format!("data:image/png;base64,{}", STANDARD.encode(data))
}

fn make_cell(row: u32, col: u32) -> Cell {
    Cell {
        row,
        col,
        x: f64::from(col) * 64.0,
        y: f64::from(row) * 20.0,
        w: 64.0,
        h: 20.0,
        value: ((row + col) % 2 == 0).then(|| format!("r{row}c{col}")),
        fill_color: ((row + col) % 5 == 0).then(|| "#4472C4".to_string()),
        font_name: None,
        font_size_pt: None,
        font_color: None,
        h_align: HAlign::Left,
        v_align: VAlign::Bottom,
    }
}

fn grid_document(rows: u32, cols: u32) -> LayoutDocument {
    let mut cells = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(make_cell(row, col));
        }
    }
    LayoutDocument {
        sheet_name: "Bench".to_string(),
        size_px: SheetSize {
            width: f64::from(cols) * 64.0,
            height: f64::from(rows) * 20.0,
        },
        cells,
        textboxes: Vec::new(),
        images: Vec::new(),
    }
}

fn mixed_document() -> LayoutDocument {
    let mut document = grid_document(20, 10);
    for index in 0..10i32 {
        document.textboxes.push(TextBox {
            name: format!("TextBox {index}"),
            left: f64::from(index) * 30.0,
            top: f64::from(index) * 25.0,
            width: 220.0,
            height: 90.0,
            z: index,
            text: "quarterly summary with a few words to wrap".to_string(),
            font_size_pt: Some(11.0),
            font_name: Some("Calibri".to_string()),
            border: None,
            fill: None,
            rich_text_formatting: None,
        });
    }
    for index in 0..6i32 {
        document.images.push(ImageRef {
            name: format!("Picture {index}"),
            left: 400.0 + f64::from(index) * 10.0,
            top: f64::from(index) * 40.0,
            width: 160.0,
            height: 120.0,
            z: 100 + index,
            anchor: None,
            source: PixelSource {
                source_width: Some(64),
                source_height: Some(48),
                // Two distinct payloads, so both the register and the
                // dedup-reuse paths run.
                data: Some(png_payload(u8::try_from(index % 2).expect("small index"))),
            },
        });
    }
    document
}

fn reconstruct_objects(document: &LayoutDocument) -> usize {
    let mut store = MemorySceneStore::new();
    let grid = SheetGrid::default();
    let report = Reconstructor::new(&mut store, &grid, &DocumentPixels).reconstruct(document);
    report.objects_emitted()
}

/// Benchmark a plain value-and-fill grid sheet
fn bench_grid_sheet(c: &mut Criterion) {
    let document = grid_document(50, 20);

    c.bench_function("reconstruct_grid_50x20", |b| {
        b.iter(|| reconstruct_objects(black_box(&document)))
    });
}

/// Benchmark a sheet with textboxes and images over the grid
fn bench_mixed_content(c: &mut Criterion) {
    let document = mixed_document();

    c.bench_function("reconstruct_mixed", |b| {
        b.iter(|| reconstruct_objects(black_box(&document)))
    });
}

/// Compare reconstruction across sheet sizes
fn bench_sheet_sizes(c: &mut Criterion) {
    let sizes = [(10u32, 10u32), (50, 20), (200, 30)];

    let mut group = c.benchmark_group("sheet_size_comparison");

    for (rows, cols) in sizes {
        let document = grid_document(rows, cols);
        let name = format!("{rows}x{cols}");

        group.throughput(Throughput::Elements(u64::from(rows * cols)));
        group.bench_with_input(
            BenchmarkId::new("reconstruct", name),
            &document,
            |b, document| b.iter(|| reconstruct_objects(black_box(document))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_grid_sheet,
    bench_mixed_content,
    bench_sheet_sizes,
);

criterion_main!(benches);
