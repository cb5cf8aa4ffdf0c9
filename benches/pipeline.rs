use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meshcast::extract::{self, Style, Viewport};
use meshcast::math::Vec3;
use meshcast::mesh::{FaceVertex, Mesh};
use meshcast::projection::{DepthStrategy, Projector};
use meshcast::Canvas;

const BUFFER_WIDTH: u32 = 1280;
const BUFFER_HEIGHT: u32 = 960;

/// An `n` by `n` grid of quads in the z = 0 plane.
fn grid_mesh(n: u32) -> Mesh {
    let side = n + 1;
    let vertices = (0..side)
        .flat_map(|y| (0..side).map(move |x| Vec3::new(x as f32 - n as f32 / 2.0, y as f32 - n as f32 / 2.0, 0.0)))
        .collect();
    let faces = (0..n)
        .flat_map(|y| (0..n).map(move |x| (x, y)))
        .map(|(x, y)| {
            let i = y * side + x + 1;
            [i, i + 1, i + side + 1, i + side]
                .into_iter()
                .map(|v| FaceVertex::new(v, 0, 0))
                .collect()
        })
        .collect();
    Mesh::new(vertices, faces).with_scale_factor(20.0)
}

fn origin() -> Vec3 {
    Vec3::new(BUFFER_WIDTH as f32 / 2.0, BUFFER_HEIGHT as f32 / 2.0, 100.0)
}

fn benchmark_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    let rotation = Vec3::new(0.3, 0.6, 0.1);

    for n in [8, 32, 128] {
        let mesh = grid_mesh(n);
        for (name, strategy) in [
            ("single_point", DepthStrategy::SinglePoint),
            ("per_vertex", DepthStrategy::PerVertex),
        ] {
            let projector = Projector::new(strategy);
            group.bench_with_input(BenchmarkId::new(name, n), &mesh, |b, mesh| {
                b.iter(|| projector.project(black_box(mesh), origin(), rotation))
            });
        }
    }

    group.finish();
}

fn benchmark_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let viewport = Viewport::from_size(BUFFER_WIDTH, BUFFER_HEIGHT);
    let style = Style::default();

    for n in [8, 32, 128] {
        let mesh = grid_mesh(n);
        let Ok(projected) = Projector::default().project(&mesh, origin(), Vec3::new(0.3, 0.6, 0.1)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &projected, |b, projected| {
            b.iter(|| extract::extract(mesh.faces(), black_box(projected), &viewport, &style))
        });
    }

    group.finish();
}

fn benchmark_draw_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_batch");
    let viewport = Viewport::from_size(BUFFER_WIDTH, BUFFER_HEIGHT);
    let style = Style::default();

    for n in [8, 32] {
        let mesh = grid_mesh(n);
        let Ok(projected) = Projector::default().project(&mesh, origin(), Vec3::ZERO) else {
            continue;
        };
        let Ok(batch) = extract::extract(mesh.faces(), &projected, &viewport, &style) else {
            continue;
        };
        let mut canvas = Canvas::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        group.bench_with_input(BenchmarkId::from_parameter(n), &batch, |b, batch| {
            b.iter(|| canvas.draw_batch(black_box(batch)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_projection, benchmark_extract, benchmark_draw_batch);
criterion_main!(benches);
