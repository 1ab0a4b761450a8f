//! Synthetic landmark sequences for tests.

use std::f64::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::models::{BodyPoint, Landmark, LandmarkFrame, LandmarkModel};

/// Freestyle-like swimmer on the MediaPipe layout.
///
/// Hands rise and fall with `period_s`, the torso rolls, hips travel
/// forward, the head lifts every other stroke and legs kick three times per
/// stroke. `noise` is the std of Gaussian jitter on the nose, elbows and
/// wrists, drawn from a ChaCha stream seeded with `seed`.
pub fn synthetic_swim(
    period_s: f64,
    fps: f64,
    seconds: f64,
    noise: f64,
    seed: u64,
) -> Vec<LandmarkFrame> {
    let model = LandmarkModel::MediapipePose;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(0.0, noise.max(1e-12)).unwrap();
    let n = (seconds * fps) as u64;

    (0..n)
        .map(|i| {
            let t = i as f64 / fps;
            let w = 2.0 * PI * t / period_s;
            let mut jitter = || {
                if noise > 0.0 {
                    normal.sample(&mut rng)
                } else {
                    0.0
                }
            };

            let mut lms = vec![Landmark::new(0.0, 0.0, 0.0, 0.1); model.point_count()];
            let put = |lms: &mut [Landmark], p: BodyPoint, x: f64, y: f64| {
                lms[model.index_of(p)] = Landmark::new(x, y, 0.0, 0.95);
            };

            let hip_x = 0.2 + 0.02 * t;
            let roll = 0.04 * w.sin();
            let kick = (3.0 * w).sin();
            put(&mut lms, BodyPoint::Nose, hip_x + 0.35, 0.45 + 0.03 * (w / 2.0).cos() + jitter());
            put(&mut lms, BodyPoint::LeftShoulder, hip_x + 0.25, 0.48 - roll);
            put(&mut lms, BodyPoint::RightShoulder, hip_x + 0.25, 0.52 + roll);
            put(&mut lms, BodyPoint::LeftElbow, hip_x + 0.3, 0.5 + 0.05 * w.sin() + jitter());
            put(&mut lms, BodyPoint::RightElbow, hip_x + 0.3, 0.5 - 0.05 * w.sin() + jitter());
            put(
                &mut lms,
                BodyPoint::LeftWrist,
                hip_x + 0.35 + 0.05 * w.cos(),
                0.5 + 0.1 * w.sin() + jitter(),
            );
            put(
                &mut lms,
                BodyPoint::RightWrist,
                hip_x + 0.35 - 0.05 * w.cos(),
                0.5 + 0.1 * w.sin() + jitter(),
            );
            put(&mut lms, BodyPoint::LeftHip, hip_x, 0.49);
            put(&mut lms, BodyPoint::RightHip, hip_x, 0.51);
            put(&mut lms, BodyPoint::LeftKnee, hip_x - 0.15, 0.5 + 0.01 * kick);
            put(&mut lms, BodyPoint::RightKnee, hip_x - 0.15, 0.5 - 0.01 * kick);
            put(&mut lms, BodyPoint::LeftAnkle, hip_x - 0.3, 0.5 + 0.04 * kick);
            put(&mut lms, BodyPoint::RightAnkle, hip_x - 0.3, 0.5 - 0.04 * kick);
            LandmarkFrame::new(i, lms)
        })
        .collect()
}
