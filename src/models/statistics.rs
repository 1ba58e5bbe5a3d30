/// Statistics accumulated over a tracking session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::models::geometry::Vec3;
use crate::models::joint::Joint;
use crate::models::posture::ClinicalAngles;

/// Joints whose motion is accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedJoint {
    LeftHand,
    LeftElbow,
    RightHand,
    RightElbow,
}

impl TrackedJoint {
    /// Column order of the statistics rows
    pub const ALL: [TrackedJoint; 4] = [
        Self::LeftHand,
        Self::LeftElbow,
        Self::RightHand,
        Self::RightElbow,
    ];

    pub fn joint(&self) -> Joint {
        match self {
            Self::LeftHand => Joint::LeftHand,
            Self::LeftElbow => Joint::LeftElbow,
            Self::RightHand => Joint::RightHand,
            Self::RightElbow => Joint::RightElbow,
        }
    }

    fn slot(&self) -> usize {
        match self {
            Self::LeftHand => 0,
            Self::LeftElbow => 1,
            Self::RightHand => 2,
            Self::RightElbow => 3,
        }
    }
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Motion accumulators of one tracked joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointTrack {
    /// Total distance travelled
    pub distance: f32,
    /// Current velocity in distance units per second
    pub velocity: f32,
    /// Distance moved in the last processed frame
    pub last_delta: f32,
    /// Local-frame movement since the previous processed frame
    pub direction: Vec3,
    /// Consecutive frames without a direction reversal (> 90°)
    pub constant_movement_count: u32,
    /// Local-frame positions, oldest first
    pub history: VecDeque<Vec3>,
}

impl Default for JointTrack {
    fn default() -> Self {
        Self {
            distance: 0.0,
            velocity: 0.0,
            last_delta: 0.0,
            direction: Vec3::zeros(),
            constant_movement_count: 0,
            history: VecDeque::new(),
        }
    }
}

impl JointTrack {
    /// Most recent local position
    pub fn last_position(&self) -> Option<&Vec3> {
        self.history.back()
    }
}

/// Range-of-motion values of one arm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmRange {
    /// Current lower arm flex angle (lower vs upper arm)
    pub lower_arm_angle: f32,
    /// Current upper arm angle to the local +Y axis
    pub upper_arm_angle: f32,
    /// Largest lower arm flex angle so far
    pub max_lower_arm_angle: f32,
    /// Largest π − upper arm angle so far
    pub max_upper_arm_angle: f32,
    /// Current clinical angles of the upper arm
    pub clinical: ClinicalAngles,
    /// Largest clinical angles so far
    pub max_clinical: ClinicalAngles,
}

/// Complete statistics state; cloning yields an independent deep copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Set when the snapshot was frozen out of a live tracker
    pub frozen_at: Option<DateTime<Utc>>,
    /// Elapsed session time in seconds
    pub seconds: f32,
    /// Number of frames accumulated
    pub frames: u64,
    pub last_frame_index: Option<u64>,
    tracks: [JointTrack; 4],
    pub left_arm: ArmRange,
    pub right_arm: ArmRange,
}

impl StatisticsSnapshot {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            frozen_at: None,
            seconds: 0.0,
            frames: 0,
            last_frame_index: None,
            tracks: Default::default(),
            left_arm: ArmRange::default(),
            right_arm: ArmRange::default(),
        }
    }

    pub fn track(&self, joint: TrackedJoint) -> &JointTrack {
        &self.tracks[joint.slot()]
    }

    pub fn track_mut(&mut self, joint: TrackedJoint) -> &mut JointTrack {
        &mut self.tracks[joint.slot()]
    }

    pub fn arm(&self, side: Side) -> &ArmRange {
        match side {
            Side::Left => &self.left_arm,
            Side::Right => &self.right_arm,
        }
    }

    pub fn arm_mut(&mut self, side: Side) -> &mut ArmRange {
        match side {
            Side::Left => &mut self.left_arm,
            Side::Right => &mut self.right_arm,
        }
    }

    pub fn distance(&self, joint: TrackedJoint) -> f32 {
        self.track(joint).distance
    }

    pub fn velocity(&self, joint: TrackedJoint) -> f32 {
        self.track(joint).velocity
    }

    pub fn history(&self, joint: TrackedJoint) -> &VecDeque<Vec3> {
        &self.track(joint).history
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }

    /// Per-frame row for a log writer
    pub fn current_row(&self) -> StatisticsRow {
        let position = |joint: TrackedJoint| {
            self.track(joint)
                .last_position()
                .map(|p| [p.x, p.y, p.z])
                .unwrap_or([0.0; 3])
        };

        StatisticsRow {
            seconds: self.seconds,
            velocity_left_hand: self.velocity(TrackedJoint::LeftHand),
            velocity_left_elbow: self.velocity(TrackedJoint::LeftElbow),
            velocity_right_hand: self.velocity(TrackedJoint::RightHand),
            velocity_right_elbow: self.velocity(TrackedJoint::RightElbow),
            delta_left_hand: self.track(TrackedJoint::LeftHand).last_delta,
            delta_left_elbow: self.track(TrackedJoint::LeftElbow).last_delta,
            delta_right_hand: self.track(TrackedJoint::RightHand).last_delta,
            delta_right_elbow: self.track(TrackedJoint::RightElbow).last_delta,
            left_hand: position(TrackedJoint::LeftHand),
            left_elbow: position(TrackedJoint::LeftElbow),
            right_hand: position(TrackedJoint::RightHand),
            right_elbow: position(TrackedJoint::RightElbow),
        }
    }

    /// Session summary row; angles in degrees
    pub fn summary(&self) -> SummaryRow {
        SummaryRow {
            seconds: self.seconds,
            distance_left_hand: self.distance(TrackedJoint::LeftHand),
            distance_left_elbow: self.distance(TrackedJoint::LeftElbow),
            distance_right_hand: self.distance(TrackedJoint::RightHand),
            distance_right_elbow: self.distance(TrackedJoint::RightElbow),
            max_angle_left_lower_arm: self.left_arm.max_lower_arm_angle.to_degrees(),
            max_angle_left_upper_arm: self.left_arm.max_upper_arm_angle.to_degrees(),
            max_angle_right_lower_arm: self.right_arm.max_lower_arm_angle.to_degrees(),
            max_angle_right_upper_arm: self.right_arm.max_upper_arm_angle.to_degrees(),
            max_clinical_left_arm: self.left_arm.max_clinical.to_degrees(),
            max_clinical_right_arm: self.right_arm.max_clinical.to_degrees(),
        }
    }
}

impl Default for StatisticsSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// One row per frame: elapsed time, velocities, deltas and local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRow {
    pub seconds: f32,
    pub velocity_left_hand: f32,
    pub velocity_left_elbow: f32,
    pub velocity_right_hand: f32,
    pub velocity_right_elbow: f32,
    pub delta_left_hand: f32,
    pub delta_left_elbow: f32,
    pub delta_right_hand: f32,
    pub delta_right_elbow: f32,
    pub left_hand: [f32; 3],
    pub left_elbow: [f32; 3],
    pub right_hand: [f32; 3],
    pub right_elbow: [f32; 3],
}

/// Totals and maxima of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub seconds: f32,
    pub distance_left_hand: f32,
    pub distance_left_elbow: f32,
    pub distance_right_hand: f32,
    pub distance_right_elbow: f32,
    pub max_angle_left_lower_arm: f32,
    pub max_angle_left_upper_arm: f32,
    pub max_angle_right_lower_arm: f32,
    pub max_angle_right_upper_arm: f32,
    pub max_clinical_left_arm: ClinicalAngles,
    pub max_clinical_right_arm: ClinicalAngles,
}
