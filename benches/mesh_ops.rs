//! Benchmarks for mesh operations.

use criterion::{criterion_group, criterion_main, Criterion};
use sliver::prelude::*;
use nalgebra::Point3;

fn create_grid_mesh(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    c.bench_function("build_grid_50x50", |b| {
        let n = 50;
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        let mut faces = Vec::with_capacity(n * n * 2);

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;

                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        b.iter(|| build_from_triangles(&vertices, &faces).unwrap());
    });
}

fn bench_one_ring(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);

    c.bench_function("one_ring_sweep_50x50", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for v in mesh.vertex_ids() {
                total += mesh.vertex_edges(v).len();
            }
            total
        });
    });
}

fn bench_orientation(c: &mut Criterion) {
    c.bench_function("orient_coherently_50x50", |b| {
        let mesh = create_grid_mesh(50);
        b.iter_batched(
            || mesh.clone(),
            |mut m| m.orient_triangles_coherently(),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);
    let source = VertexId::new(0);
    let target = VertexId::new(mesh.num_vertices() - 1);

    c.bench_function("shortest_path_corner_to_corner_50x50", |b| {
        b.iter(|| shortest_path(&mesh, source, target, &PathOptions::default()));
    });

    c.bench_function("shortest_path_directed_50x50", |b| {
        let options = PathOptions::default().directed();
        b.iter(|| shortest_path(&mesh, source, target, &options));
    });
}

fn bench_smoothing(c: &mut Criterion) {
    c.bench_function("laplacian_smooth_50x50", |b| {
        let mesh = create_grid_mesh(50);
        let options = SmoothOptions::default().with_iterations(2).sequential();
        b.iter_batched(
            || mesh.clone(),
            |mut m| laplacian_smooth(&mut m, &options),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_one_ring,
    bench_orientation,
    bench_shortest_path,
    bench_smoothing
);
criterion_main!(benches);
