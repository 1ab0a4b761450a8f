//! Pipeline benchmarks.
//!
//! Run with: cargo bench --package stroke_core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::f64::consts::PI;
use std::time::Duration;

use stroke_core::analysis::kinematics::extract;
use stroke_core::analysis::signal::find_peaks;
use stroke_core::config::PeakConfig;
use stroke_core::models::{BodyPoint, Landmark, LandmarkFrame, LandmarkModel};
use stroke_core::{analyze, AnalysisConfig};

/// Freestyle-like swimmer with a 1.6 s stroke on the MediaPipe layout.
fn swim_frames(seconds: f64, fps: f64) -> Vec<LandmarkFrame> {
    let model = LandmarkModel::MediapipePose;
    let n = (seconds * fps) as u64;
    (0..n)
        .map(|i| {
            let t = i as f64 / fps;
            let w = 2.0 * PI * t / 1.6;
            let hip_x = 0.2 + 0.02 * t;
            let mut lms = vec![Landmark::new(0.0, 0.0, 0.0, 0.1); model.point_count()];
            let mut put = |p: BodyPoint, x: f64, y: f64| {
                lms[model.index_of(p)] = Landmark::new(x, y, 0.0, 0.95);
            };
            put(BodyPoint::Nose, hip_x + 0.35, 0.45 + 0.03 * (w / 2.0).cos());
            put(BodyPoint::LeftShoulder, hip_x + 0.25, 0.48 - 0.04 * w.sin());
            put(BodyPoint::RightShoulder, hip_x + 0.25, 0.52 + 0.04 * w.sin());
            put(BodyPoint::LeftElbow, hip_x + 0.3, 0.5 + 0.05 * w.sin());
            put(BodyPoint::RightElbow, hip_x + 0.3, 0.5 - 0.05 * w.sin());
            put(BodyPoint::LeftWrist, hip_x + 0.35 + 0.05 * w.cos(), 0.5 + 0.1 * w.sin());
            put(BodyPoint::RightWrist, hip_x + 0.35 - 0.05 * w.cos(), 0.5 - 0.1 * w.sin());
            put(BodyPoint::LeftHip, hip_x, 0.5);
            put(BodyPoint::RightHip, hip_x, 0.52);
            put(BodyPoint::LeftKnee, hip_x - 0.15, 0.5 + 0.02 * (3.0 * w).sin());
            put(BodyPoint::RightKnee, hip_x - 0.15, 0.52 - 0.02 * (3.0 * w).sin());
            put(BodyPoint::LeftAnkle, hip_x - 0.3, 0.5 + 0.04 * (3.0 * w).sin());
            put(BodyPoint::RightAnkle, hip_x - 0.3, 0.52 - 0.04 * (3.0 * w).sin());
            LandmarkFrame::new(i, lms)
        })
        .collect()
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Full Pipeline");
    group.measurement_time(Duration::from_secs(10));
    let config = AnalysisConfig::default();

    for &seconds in &[10.0, 60.0] {
        let frames = swim_frames(seconds, 30.0);
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("analyze", format!("{seconds}s@30fps")),
            &frames,
            |b, frames| b.iter(|| analyze(black_box(frames), 30.0, &config).unwrap()),
        );
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let frames = swim_frames(60.0, 30.0);
    let config = AnalysisConfig::default();

    c.bench_function("kinematics 60s", |b| {
        b.iter(|| extract(black_box(&frames), 30.0, &config.landmarks))
    });

    let signal: Vec<f64> = (0..1800)
        .map(|i| (2.0 * PI * i as f64 / 48.0).sin() + 0.01 * ((i * 37) as f64).sin())
        .collect();
    let peaks = PeakConfig::new(30, 0.02);
    c.bench_function("find_peaks 1800", |b| b.iter(|| find_peaks(black_box(&signal), &peaks)));
}

criterion_group!(benches, bench_full_pipeline, bench_stages);
criterion_main!(benches);
