/// Joint models for the tracked skeleton
///
/// This module provides the fixed joint vocabulary, per-joint samples and the
/// per-frame sensor input consumed by the analysis engine.

use serde::{Deserialize, Serialize};

use crate::models::geometry::{Transform, Vec3};

/// Number of tracked joints
pub const JOINT_COUNT: usize = 15;

/// Anatomical joint identifiers.
///
/// Left/right follow the person's own viewpoint, not the sensor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Head = 0,
    Neck = 1,
    LeftShoulder = 2,
    LeftElbow = 3,
    LeftHand = 4,
    RightShoulder = 5,
    RightElbow = 6,
    RightHand = 7,
    Torso = 8,
    LeftHip = 9,
    LeftKnee = 10,
    LeftFoot = 11,
    RightHip = 12,
    RightKnee = 13,
    RightFoot = 14,
}

impl Joint {
    /// All joints in index order
    pub const ALL: [Joint; JOINT_COUNT] = [
        Self::Head,
        Self::Neck,
        Self::LeftShoulder,
        Self::LeftElbow,
        Self::LeftHand,
        Self::RightShoulder,
        Self::RightElbow,
        Self::RightHand,
        Self::Torso,
        Self::LeftHip,
        Self::LeftKnee,
        Self::LeftFoot,
        Self::RightHip,
        Self::RightKnee,
        Self::RightFoot,
    ];

    /// Position of this joint in per-joint arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Look up a joint by index; `None` when out of range
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Get joint name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Neck => "neck",
            Self::LeftShoulder => "left_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::LeftHand => "left_hand",
            Self::RightShoulder => "right_shoulder",
            Self::RightElbow => "right_elbow",
            Self::RightHand => "right_hand",
            Self::Torso => "torso",
            Self::LeftHip => "left_hip",
            Self::LeftKnee => "left_knee",
            Self::LeftFoot => "left_foot",
            Self::RightHip => "right_hip",
            Self::RightKnee => "right_knee",
            Self::RightFoot => "right_foot",
        }
    }

    /// Hip, knee and foot; only refreshed with full-body tracking
    pub fn is_lower_body(&self) -> bool {
        matches!(
            self,
            Self::LeftHip
                | Self::LeftKnee
                | Self::LeftFoot
                | Self::RightHip
                | Self::RightKnee
                | Self::RightFoot
        )
    }

    /// The same joint on the other body side. Midline joints map to themselves.
    pub fn opposite(&self) -> Self {
        match self {
            Self::LeftShoulder => Self::RightShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::LeftHand => Self::RightHand,
            Self::RightShoulder => Self::LeftShoulder,
            Self::RightElbow => Self::LeftElbow,
            Self::RightHand => Self::LeftHand,
            Self::LeftHip => Self::RightHip,
            Self::LeftKnee => Self::RightKnee,
            Self::LeftFoot => Self::RightFoot,
            Self::RightHip => Self::LeftHip,
            Self::RightKnee => Self::LeftKnee,
            Self::RightFoot => Self::LeftFoot,
            other => *other,
        }
    }

    /// Whether the joint sits on the anatomical left side
    pub fn is_left(&self) -> bool {
        matches!(
            self,
            Self::LeftShoulder
                | Self::LeftElbow
                | Self::LeftHand
                | Self::LeftHip
                | Self::LeftKnee
                | Self::LeftFoot
        )
    }
}

/// Everything known about one joint in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    /// Position in the sensor's global frame
    pub position: Vec3,
    /// Position in the skeleton's local frame
    pub local_position: Vec3,
    /// Position confidence (0-1)
    pub confidence: f32,
    /// Orientation as rotation columns plus origin
    pub orientation: Transform,
    /// Orientation confidence (0-1)
    pub orientation_confidence: f32,
    /// Distance moved since the previous frame
    pub delta: f32,
}

impl Default for JointSample {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            local_position: Vec3::zeros(),
            confidence: 0.0,
            orientation: Transform::identity(),
            orientation_confidence: 0.0,
            delta: 0.0,
        }
    }
}

impl JointSample {
    /// Sample with every field zero, orientation included
    pub fn zeroed() -> Self {
        Self {
            orientation: Transform::zeros(),
            ..Self::default()
        }
    }
}

/// Fixed-size set of samples keyed by `Joint`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSet {
    samples: [JointSample; JOINT_COUNT],
}

impl JointSet {
    pub fn new() -> Self {
        Self {
            samples: [JointSample::default(); JOINT_COUNT],
        }
    }

    pub fn get(&self, joint: Joint) -> &JointSample {
        &self.samples[joint.index()]
    }

    pub fn get_mut(&mut self, joint: Joint) -> &mut JointSample {
        &mut self.samples[joint.index()]
    }

    /// Sample by raw index, zero-valued default when out of range
    pub fn get_by_index(&self, index: usize) -> JointSample {
        self.samples.get(index).copied().unwrap_or_default()
    }

    /// Global position of a joint
    pub fn position(&self, joint: Joint) -> Vec3 {
        self.get(joint).position
    }

    /// Local-frame position of a joint
    pub fn local(&self, joint: Joint) -> Vec3 {
        self.get(joint).local_position
    }

    /// Iterate over (joint, sample) pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &JointSample)> {
        Joint::ALL.iter().copied().zip(self.samples.iter())
    }
}

impl Default for JointSet {
    fn default() -> Self {
        Self::new()
    }
}

/// One joint as delivered by the acquisition collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointReading {
    pub position: Vec3,
    pub confidence: f32,
    pub orientation: Transform,
    pub orientation_confidence: f32,
}

impl JointReading {
    /// Reading with full confidence and identity orientation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            confidence: 1.0,
            orientation: Transform::identity(),
            orientation_confidence: 1.0,
        }
    }
}

impl Default for JointReading {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

/// Per-frame input from the acquisition collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Frame counter of the caller
    pub frame_index: u64,
    /// Frames per second, used for velocity and elapsed time
    pub frame_rate: f32,
    /// Readings for all joints, indexed by `Joint::index`
    pub joints: [JointReading; JOINT_COUNT],
}

impl SensorFrame {
    /// Empty frame with every joint at the global origin
    pub fn new(frame_index: u64, frame_rate: f32) -> Self {
        Self {
            frame_index,
            frame_rate,
            joints: [JointReading::default(); JOINT_COUNT],
        }
    }

    /// Builder-style setter for a joint position
    pub fn with_joint(mut self, joint: Joint, position: Vec3) -> Self {
        self.joints[joint.index()].position = position;
        self
    }

    pub fn set_reading(&mut self, joint: Joint, reading: JointReading) {
        self.joints[joint.index()] = reading;
    }

    pub fn reading(&self, joint: Joint) -> &JointReading {
        &self.joints[joint.index()]
    }
}
