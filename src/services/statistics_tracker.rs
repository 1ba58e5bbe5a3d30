/// Statistics Tracking Service
///
/// Accumulates per-session kinematics of hands and elbows from the physically
/// true (un-mirrored) joints:
/// - elapsed time, total distance and current velocity
/// - smoothness counters (frames without a direction reversal)
/// - current and maximum arm angles, clinical angles of the upper arms
/// - bounded history of local positions

use std::f32::consts::{FRAC_PI_2, PI};

use chrono::Utc;
use tracing::info;

use crate::models::geometry::{angle_between, Axis};
use crate::models::joint::{Joint, JointSet};
use crate::models::statistics::{Side, StatisticsSnapshot, TrackedJoint};
use crate::services::posture_classifier::clinical_angles;

/// Live statistics of one tracked person
#[derive(Debug, Clone)]
pub struct StatisticsTracker {
    stats: StatisticsSnapshot,
    history_capacity: Option<usize>,
}

impl StatisticsTracker {
    /// Create a tracker; `None` keeps the full history
    pub fn new(history_capacity: Option<usize>) -> Self {
        Self {
            stats: StatisticsSnapshot::new(),
            history_capacity,
        }
    }

    pub fn history_capacity(&self) -> Option<usize> {
        self.history_capacity
    }

    /// Live accumulators, changing with every update
    pub fn current(&self) -> &StatisticsSnapshot {
        &self.stats
    }

    /// Independent deep copy, stamped with the freeze time
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let mut frozen = self.stats.clone();
        frozen.frozen_at = Some(Utc::now());
        info!(
            "Froze statistics of session {} after {:.1}s",
            frozen.session_id, frozen.seconds
        );
        frozen
    }

    /// Start a new session
    pub fn reset(&mut self) {
        self.stats = StatisticsSnapshot::new();
    }

    /// Accumulate one frame. `joints` must carry local positions and deltas.
    pub fn update(&mut self, frame_index: u64, frame_rate: f32, joints: &JointSet) {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            0.0
        };

        if let Some(last) = self.stats.last_frame_index {
            if frame_rate > 0.0 && frame_index > last {
                self.stats.seconds += (frame_index - last) as f32 / frame_rate;
            }
        }
        self.stats.last_frame_index = Some(frame_index);
        self.stats.frames += 1;

        for tracked in TrackedJoint::ALL {
            self.update_track(tracked, frame_rate, joints);
        }

        self.update_arm(Side::Left, joints);
        self.update_arm(Side::Right, joints);
    }

    fn update_track(&mut self, tracked: TrackedJoint, frame_rate: f32, joints: &JointSet) {
        let sample = joints.get(tracked.joint());
        let position = sample.local_position;
        let delta = sample.delta;
        let capacity = self.history_capacity;
        let track = self.stats.track_mut(tracked);

        if let Some(previous) = track.last_position().copied() {
            let direction = position - previous;
            if angle_between(&direction, &track.direction) < FRAC_PI_2 {
                track.constant_movement_count += 1;
            } else {
                track.constant_movement_count = 0;
            }
            track.direction = direction;
        }

        track.history.push_back(position);
        if let Some(capacity) = capacity {
            while track.history.len() > capacity {
                track.history.pop_front();
            }
        }

        track.distance += delta;
        track.last_delta = delta;
        track.velocity = delta * frame_rate;
    }

    fn update_arm(&mut self, side: Side, joints: &JointSet) {
        let (shoulder, elbow, hand) = match side {
            Side::Left => (Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftHand),
            Side::Right => (Joint::RightShoulder, Joint::RightElbow, Joint::RightHand),
        };

        let upper = joints.local(elbow) - joints.local(shoulder);
        let lower = joints.local(hand) - joints.local(elbow);
        let clinical = clinical_angles(joints, elbow, shoulder);

        let arm = self.stats.arm_mut(side);
        arm.lower_arm_angle = angle_between(&lower, &upper);
        arm.upper_arm_angle = angle_between(&upper, &Axis::Y.unit());
        arm.max_lower_arm_angle = arm.max_lower_arm_angle.max(arm.lower_arm_angle);
        arm.max_upper_arm_angle = arm.max_upper_arm_angle.max(PI - arm.upper_arm_angle);
        arm.clinical = clinical;
        arm.max_clinical = arm.max_clinical.max(&clinical);
    }
}

impl Default for StatisticsTracker {
    fn default() -> Self {
        Self::new(Some(18_000))
    }
}
