use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use znak_core::catalogue::{MemoryCatalogue, Translation};
use znak_core::geometry::{encode_run_length, rasterize, Ellipse};
use znak_core::matcher::{MatchOptions, SignMatcher};
use znak_core::sign::{Placement, ReferenceSign, SignType, UserSign};
use znak_core::taxonomy::HandshapeId;
use znak_core::video::VideoDirectory;

/// Deterministic catalogue of `n` signs spread over the canvas, half of
/// them pre-rasterized.
fn bench_catalogue(n: usize) -> Arc<MemoryCatalogue> {
    let mut signs = Vec::with_capacity(n);
    let mut translations = Vec::with_capacity(n);
    for i in 0..n {
        let shape = HandshapeId::new((i % 54) as u8 + 1).unwrap();
        let ellipse = Ellipse::new(
            (20 + (i * 37) % 200) as f64,
            (20 + (i * 53) % 210) as f64,
            10.0 + (i % 25) as f64,
            10.0 + (i % 25) as f64,
            0.0,
        );
        let placement = if i % 2 == 0 {
            Placement::RunLength(encode_run_length(&rasterize(&ellipse, 240, 250)).unwrap())
        } else {
            Placement::Ellipse(ellipse)
        };
        let sign_type = SignType::ALL[i % 3];
        signs.push(ReferenceSign {
            video_id: format!("v{i}"),
            active_shapes: [shape].into_iter().collect(),
            sign_type,
            passive_shape: None,
            placement: Some(placement),
        });
        translations.push(Translation {
            word: format!("slovo {i}"),
            video_id: format!("v{i}"),
        });
    }
    Arc::new(MemoryCatalogue::new(signs, translations, vec![]))
}

fn bench_query() -> UserSign {
    UserSign::from_query(
        &[1, 12],
        "single hand",
        None,
        Some([120.0, 125.0, 30.0, 18.0, 0.6]),
    )
    .unwrap()
}

fn bench_search(c: &mut Criterion) {
    let user = bench_query();
    let mut group = c.benchmark_group("search/placement");
    for &size in &[100usize, 1000] {
        for parallel in [false, true] {
            let options = MatchOptions {
                parallel,
                ..MatchOptions::default()
            };
            let matcher = SignMatcher::new(bench_catalogue(size), VideoDirectory::empty(), options);
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, size), &user, |b, user| {
                b.iter(|| matcher.search(user));
            });
        }
    }
    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let ellipse = Ellipse::new(120.0, 125.0, 60.0, 40.0, 0.6);
    c.bench_function("rasterize/240x250", |b| {
        b.iter(|| rasterize(&ellipse, 240, 250));
    });
}

criterion_group!(benches, bench_search, bench_rasterize);
criterion_main!(benches);
