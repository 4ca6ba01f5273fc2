//! Benchmarks for windowing, pointer mapping and frame rendering.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridview::layout::Geometry;
use gridview::{
    compute_window, GridBounds, GridConfig, GridEngine, GridHost, RowContext, TreeNode,
    TreeRowList,
};

/// Host that renders nothing but the row number.
struct Counter {
    rows: u32,
}

impl GridHost for Counter {
    type Row = u32;

    fn row_count(&self) -> u32 {
        self.rows
    }

    fn column_count(&self) -> u32 {
        20
    }

    fn column_width(&self, _col: u32) -> f32 {
        100.0
    }

    fn render_row(&mut self, ctx: &RowContext<'_>) -> u32 {
        ctx.row
    }
}

fn bench_compute_window(c: &mut Criterion) {
    c.bench_function("compute_window", |b| {
        b.iter(|| {
            compute_window(
                black_box(1_234_567.0),
                black_box(800.0),
                black_box(25.0),
                black_box(1_000_000),
            )
        })
    });
}

fn bench_pixel_to_row(c: &mut Criterion) {
    let config = GridConfig {
        fixed_row_indices: vec![0, 1, 2],
        ..GridConfig::default()
    };
    let geo = Geometry::new(&config, GridBounds::new(1_000_000, 20), |_| 100.0);

    c.bench_function("pixel_to_row", |b| {
        b.iter(|| geo.pixel_to_row(black_box(412.0), black_box(2_500_000.0)))
    });
    c.bench_function("pixel_to_column", |b| {
        b.iter(|| geo.pixel_to_column(black_box(1_450.0), black_box(300.0)))
    });
}

/// A full frame should cost the same whatever the row count.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");

    for rows in [1_000u32, 100_000, 1_000_000] {
        let mut engine =
            GridEngine::new(Counter { rows }, GridConfig::default()).expect("valid config");
        engine.resize_viewport(1_200.0, 825.0);
        engine.scroll_by(0.0, (rows as f32) * 12.5);

        group.throughput(Throughput::Elements(u64::from(engine.window().visible_count)));
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| {
                engine.force_rerender();
                black_box(engine.render())
            })
        });
    }

    group.finish();
}

fn bench_tree_expand(c: &mut Criterion) {
    let children = |id: &String| -> Option<Vec<TreeNode>> {
        (id == "root").then(|| {
            (0..1_000)
                .map(|i| TreeNode::leaf(format!("child-{i}")))
                .collect()
        })
    };
    let roots: Vec<TreeNode> = std::iter::once(TreeNode::new("root".to_string(), 1_000))
        .chain((0..10_000).map(|i| TreeNode::leaf(format!("root-{i}"))))
        .collect();

    c.bench_function("tree_expand_collapse", |b| {
        let mut list = TreeRowList::from_roots(roots.clone());
        b.iter(|| {
            list.expand(0, &children);
            black_box(list.collapse(0))
        })
    });
}

criterion_group!(
    benches,
    bench_compute_window,
    bench_pixel_to_row,
    bench_render,
    bench_tree_expand,
);

criterion_main!(benches);
