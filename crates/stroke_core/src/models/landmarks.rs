//! # Landmark Model
//!
//! Per-frame body landmarks as delivered by the upstream pose estimator.
//!
//! Upstream models number their points differently (MediaPipe Pose uses 33
//! points, COCO uses 17). The engine never touches raw indices: every lookup
//! goes through [`BodyPoint`] and the [`LandmarkModel`] mapping, and frames
//! are converted once into a fixed-slot [`Skeleton`].

use nalgebra::Vector3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

/// Anatomical points used by the analysis.
///
/// The discriminant is the slot in a [`Skeleton`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum_macros::EnumCount,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum BodyPoint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPoint {
    /// Slot of this point in a [`Skeleton`].
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// Body side for bilateral metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    Left,
    Right,
}

impl BodySide {
    pub fn shoulder(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftShoulder,
            BodySide::Right => BodyPoint::RightShoulder,
        }
    }

    pub fn elbow(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftElbow,
            BodySide::Right => BodyPoint::RightElbow,
        }
    }

    pub fn wrist(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftWrist,
            BodySide::Right => BodyPoint::RightWrist,
        }
    }

    pub fn hip(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftHip,
            BodySide::Right => BodyPoint::RightHip,
        }
    }

    pub fn knee(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftKnee,
            BodySide::Right => BodyPoint::RightKnee,
        }
    }

    pub fn ankle(self) -> BodyPoint {
        match self {
            BodySide::Left => BodyPoint::LeftAnkle,
            BodySide::Right => BodyPoint::RightAnkle,
        }
    }
}

/// Upstream landmark numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkModel {
    /// MediaPipe Pose, 33 points
    #[default]
    MediapipePose,
    /// COCO keypoints, 17 points
    Coco,
}

impl LandmarkModel {
    /// Number of points every frame must carry.
    pub fn point_count(self) -> usize {
        match self {
            LandmarkModel::MediapipePose => 33,
            LandmarkModel::Coco => 17,
        }
    }

    /// Index of `point` in this model's landmark list.
    pub fn index_of(self, point: BodyPoint) -> usize {
        match self {
            LandmarkModel::MediapipePose => match point {
                BodyPoint::Nose => 0,
                BodyPoint::LeftShoulder => 11,
                BodyPoint::RightShoulder => 12,
                BodyPoint::LeftElbow => 13,
                BodyPoint::RightElbow => 14,
                BodyPoint::LeftWrist => 15,
                BodyPoint::RightWrist => 16,
                BodyPoint::LeftHip => 23,
                BodyPoint::RightHip => 24,
                BodyPoint::LeftKnee => 25,
                BodyPoint::RightKnee => 26,
                BodyPoint::LeftAnkle => 27,
                BodyPoint::RightAnkle => 28,
            },
            LandmarkModel::Coco => match point {
                BodyPoint::Nose => 0,
                BodyPoint::LeftShoulder => 5,
                BodyPoint::RightShoulder => 6,
                BodyPoint::LeftElbow => 7,
                BodyPoint::RightElbow => 8,
                BodyPoint::LeftWrist => 9,
                BodyPoint::RightWrist => 10,
                BodyPoint::LeftHip => 11,
                BodyPoint::RightHip => 12,
                BodyPoint::LeftKnee => 13,
                BodyPoint::RightKnee => 14,
                BodyPoint::LeftAnkle => 15,
                BodyPoint::RightAnkle => 16,
            },
        }
    }
}

/// Coordinate space used for joint angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AngleSpace {
    /// Image plane only (x, y). Monocular depth is too noisy for angles.
    #[default]
    Planar,
    /// Full (x, y, z)
    Spatial,
}

/// One tracked point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Detector confidence in [0, 1]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Landmarks observed in one video frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkFrame {
    /// Source frame number (strictly increasing, may skip)
    pub frame_index: u64,
    pub landmarks: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(frame_index: u64, landmarks: Vec<Landmark>) -> Self {
        Self { frame_index, landmarks }
    }

    /// True if at least one landmark clears the visibility threshold.
    pub fn has_visible_landmark(&self, visibility_threshold: f64) -> bool {
        self.landmarks
            .iter()
            .any(|lm| lm.visibility >= visibility_threshold && lm.is_finite())
    }
}

/// Full input handed over by the pose collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkSequence {
    /// Source frame rate
    pub fps: f64,
    pub frames: Vec<LandmarkFrame>,
    /// Total frames in the source video, if known
    #[serde(default)]
    pub total_frames: Option<u64>,
    /// Source duration in seconds, if known
    #[serde(default)]
    pub duration_s: Option<f64>,
    /// Caller tag carried into logs and the result (e.g. a video id)
    #[serde(default)]
    pub label: Option<String>,
}

impl LandmarkSequence {
    pub fn new(fps: f64, frames: Vec<LandmarkFrame>) -> Self {
        Self {
            fps,
            frames,
            total_frames: None,
            duration_s: None,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Visible points of one frame in fixed slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skeleton {
    points: [Option<Vector3<f64>>; BodyPoint::COUNT],
}

impl Skeleton {
    /// Pick the engine's points out of an upstream frame.
    ///
    /// Points below `visibility_threshold`, non-finite points and indices the
    /// frame does not carry are left empty. In [`AngleSpace::Planar`] the depth
    /// component is zeroed.
    pub fn from_frame(
        frame: &LandmarkFrame,
        model: LandmarkModel,
        visibility_threshold: f64,
        space: AngleSpace,
    ) -> Self {
        let mut points = [None; BodyPoint::COUNT];
        for point in <BodyPoint as strum::IntoEnumIterator>::iter() {
            let Some(lm) = frame.landmarks.get(model.index_of(point)) else {
                continue;
            };
            if !(lm.visibility >= visibility_threshold) || !lm.is_finite() {
                continue;
            }
            let z = match space {
                AngleSpace::Planar => 0.0,
                AngleSpace::Spatial => lm.z,
            };
            points[point.slot()] = Some(Vector3::new(lm.x, lm.y, z));
        }
        Self { points }
    }

    #[inline]
    pub fn get(&self, point: BodyPoint) -> Option<Vector3<f64>> {
        self.points[point.slot()]
    }

    pub fn set(&mut self, point: BodyPoint, position: Option<Vector3<f64>>) {
        self.points[point.slot()] = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn frame_with(model: LandmarkModel, point: BodyPoint, lm: Landmark) -> LandmarkFrame {
        let mut landmarks = vec![Landmark::default(); model.point_count()];
        landmarks[model.index_of(point)] = lm;
        LandmarkFrame::new(0, landmarks)
    }

    #[test]
    fn test_model_indices_in_range_and_unique() {
        for model in [LandmarkModel::MediapipePose, LandmarkModel::Coco] {
            let mut seen: Vec<usize> = BodyPoint::iter().map(|p| model.index_of(p)).collect();
            assert!(seen.iter().all(|&i| i < model.point_count()));
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), BodyPoint::COUNT);
        }
    }

    #[test]
    fn test_skeleton_visibility_gate() {
        let model = LandmarkModel::MediapipePose;
        let visible = frame_with(model, BodyPoint::LeftWrist, Landmark::new(0.3, 0.4, 0.1, 0.9));
        let skel = Skeleton::from_frame(&visible, model, 0.5, AngleSpace::Planar);
        assert_eq!(skel.get(BodyPoint::LeftWrist), Some(Vector3::new(0.3, 0.4, 0.0)));
        let others = BodyPoint::iter().filter(|&p| p != BodyPoint::LeftWrist);
        assert!(others.map(|p| skel.get(p)).all(|p| p.is_none()));

        let hidden = frame_with(model, BodyPoint::LeftWrist, Landmark::new(0.3, 0.4, 0.1, 0.2));
        let skel = Skeleton::from_frame(&hidden, model, 0.5, AngleSpace::Planar);
        assert_eq!(skel.get(BodyPoint::LeftWrist), None);
    }

    #[test]
    fn test_nan_visibility_is_hidden_everywhere() {
        let model = LandmarkModel::MediapipePose;
        let mut frame = frame_with(model, BodyPoint::Nose, Landmark::new(0.5, 0.5, 0.0, f64::NAN));
        frame.landmarks.truncate(model.index_of(BodyPoint::Nose) + 1);
        assert!(!frame.has_visible_landmark(0.5));
        let skel = Skeleton::from_frame(&frame, model, 0.5, AngleSpace::Planar);
        assert_eq!(skel.get(BodyPoint::Nose), None);

        let skel = Skeleton::from_frame(&frame, model, 0.0, AngleSpace::Planar);
        assert_eq!(skel.get(BodyPoint::Nose), None);
    }

    #[test]
    fn test_spatial_keeps_depth() {
        let model = LandmarkModel::Coco;
        let frame = frame_with(model, BodyPoint::Nose, Landmark::new(0.5, 0.5, -0.2, 1.0));
        let skel = Skeleton::from_frame(&frame, model, 0.5, AngleSpace::Spatial);
        assert_eq!(skel.get(BodyPoint::Nose), Some(Vector3::new(0.5, 0.5, -0.2)));
    }

    #[test]
    fn test_short_frame_leaves_missing_points_empty() {
        let frame = LandmarkFrame::new(0, vec![Landmark::new(0.1, 0.1, 0.0, 1.0)]);
        let skel = Skeleton::from_frame(&frame, LandmarkModel::MediapipePose, 0.5, AngleSpace::Planar);
        assert!(skel.get(BodyPoint::Nose).is_some());
        assert!(skel.get(BodyPoint::LeftShoulder).is_none());
    }

    #[test]
    fn test_nan_landmark_is_absent() {
        let model = LandmarkModel::MediapipePose;
        let frame = frame_with(model, BodyPoint::Nose, Landmark::new(f64::NAN, 0.5, 0.0, 1.0));
        assert!(!frame.has_visible_landmark(0.5));
    }
}
