/// Gesture Recognition Service
///
/// Detects the push gesture: both hands start close to the shoulders and move
/// along the local Z axis until the arms are straight and point forward, all
/// within a bounded number of frames.

use tracing::{debug, info};

use crate::config::{sanitize_tolerance, DEFAULT_GESTURE_TOLERANCE};
use crate::models::geometry::{angle_between, is_value_between, Axis};
use crate::models::posture::{GestureKind, UpperBody};

/// Reference angle scaled by the tolerance fraction
const GESTURE_REFERENCE_ANGLE_DEG: f32 = 40.0;

/// Default number of frames between start pose and end pose
pub const DEFAULT_PUSH_GESTURE_MAX_FRAMES: u64 = 30;

/// Window state of the push gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// No start pose seen, or the window was abandoned
    Idle,
    /// Start pose seen at `start_frame`
    Windowed { start_frame: u64 },
}

/// Temporal state machine for upper-body gestures
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    tolerance: f32,
    tolerance_angle: f32,
    max_frames: u64,
    state: GestureState,
    last_recognized: Option<(GestureKind, u64)>,
}

impl GestureRecognizer {
    pub fn new(tolerance: f32, max_frames: u64) -> Self {
        let tolerance = sanitize_tolerance(tolerance, DEFAULT_GESTURE_TOLERANCE, "gesture");
        Self {
            tolerance,
            tolerance_angle: GESTURE_REFERENCE_ANGLE_DEG.to_radians() * tolerance,
            max_frames,
            state: GestureState::Idle,
            last_recognized: None,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Set the tolerance; values outside [0, 1] reset it to 0.5
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = sanitize_tolerance(tolerance, DEFAULT_GESTURE_TOLERANCE, "gesture");
        self.tolerance_angle = GESTURE_REFERENCE_ANGLE_DEG.to_radians() * self.tolerance;
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Gesture and frame of the most recent recognition
    pub fn last_recognized(&self) -> Option<(GestureKind, u64)> {
        self.last_recognized
    }

    /// Feed one frame; returns the gesture recognized in this frame, if any
    pub fn evaluate(&mut self, frame_index: u64, body: &UpperBody) -> Option<GestureKind> {
        if self.evaluate_push(frame_index, body) {
            info!("Push gesture recognized at frame {}", frame_index);
            self.last_recognized = Some((GestureKind::Push, frame_index));
            return Some(GestureKind::Push);
        }
        None
    }

    /// Gesture recognized within the last `lookback` frames before `current_frame`
    pub fn last_gesture(&self, current_frame: u64, lookback: u64) -> GestureKind {
        match self.last_recognized {
            Some((kind, frame)) if frame >= current_frame.saturating_sub(lookback) => kind,
            _ => GestureKind::None,
        }
    }

    fn evaluate_push(&mut self, frame_index: u64, body: &UpperBody) -> bool {
        let z = Axis::Z.unit();
        let left_hand_shoulder = body.left_shoulder - body.left_hand;
        let right_hand_shoulder = body.right_shoulder - body.right_hand;
        let corridor = 30f32.to_radians() + self.tolerance_angle;

        let along_z = is_value_between(angle_between(&left_hand_shoulder, &z), 0.0, corridor)
            && is_value_between(angle_between(&right_hand_shoulder, &z), 0.0, corridor);

        if !along_z {
            // The hands must stay on the Z corridor for the whole movement
            self.reset();
            return false;
        }

        let start_distance = 200.0 + 200.0 * self.tolerance;
        if left_hand_shoulder.norm() <= start_distance && right_hand_shoulder.norm() <= start_distance {
            if self.state == GestureState::Idle {
                debug!("Push start pose at frame {}", frame_index);
            }
            self.state = GestureState::Windowed {
                start_frame: frame_index,
            };
        }

        match self.state {
            GestureState::Windowed { start_frame }
                if frame_index >= start_frame && frame_index - start_frame <= self.max_frames =>
            {
                self.is_push_end_pose(body)
            }
            GestureState::Windowed { .. } => {
                debug!("Push window expired at frame {}", frame_index);
                self.reset();
                false
            }
            GestureState::Idle => false,
        }
    }

    /// Straight arms pointing forward (anti-parallel to local Z)
    fn is_push_end_pose(&self, body: &UpperBody) -> bool {
        let z = Axis::Z.unit();
        let straight = 30f32.to_radians() + self.tolerance_angle;
        let forward = 150f32.to_radians() - self.tolerance_angle;
        let half_turn = 180f32.to_radians();

        is_value_between(angle_between(&body.left_upper_arm, &body.left_lower_arm), 0.0, straight)
            && is_value_between(angle_between(&body.right_upper_arm, &body.right_lower_arm), 0.0, straight)
            && is_value_between(angle_between(&body.left_upper_arm, &z), forward, half_turn)
            && is_value_between(angle_between(&body.right_upper_arm, &z), forward, half_turn)
    }

    fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_GESTURE_TOLERANCE, DEFAULT_PUSH_GESTURE_MAX_FRAMES)
    }
}
