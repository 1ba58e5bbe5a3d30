/// Skeleton Analysis Service
///
/// Per-person orchestrator running the full pipeline once per sensor frame:
/// raw joints → local frame → body planes → mirroring → local joints →
/// posture and gesture → statistics.
///
/// Each successful update produces an immutable `FrameAnalysis`. A failed
/// update leaves the previous analysis in place, so accessors never observe a
/// partially computed frame.

use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{SkeletonError, SkeletonResult};
use crate::models::geometry::{angle_between, Axis, BodyPlane, BodyPlanes, LocalFrame};
use crate::models::joint::{Joint, JointSample, JointSet, SensorFrame, JOINT_COUNT};
use crate::models::posture::{ClinicalAngles, GestureKind, MirrorMode, PostureShape, UpperBody};
use crate::models::statistics::{Side, StatisticsSnapshot};
use crate::services::body_plane_service::compute_body_planes;
use crate::services::frame_builder::build_local_frame;
use crate::services::gesture_recognizer::GestureRecognizer;
use crate::services::mirror_service::apply_mirror;
use crate::services::posture_classifier::{clinical_angles, PostureClassifier};
use crate::services::statistics_tracker::StatisticsTracker;

/// Everything derived from one successfully processed frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    pub frame_index: u64,
    pub frame_rate: f32,
    pub local_frame: LocalFrame,
    pub planes: BodyPlanes,
    /// Whether the mirrored side was overwritten this frame
    pub mirror_applied: bool,
    /// Live joints, possibly mirrored, with local positions
    pub joints: JointSet,
    /// Physically measured joints with local positions
    pub unmirrored: JointSet,
    /// Local arm geometry of the live joints
    pub upper_body: UpperBody,
    /// Local arm geometry of the measured joints
    pub upper_body_unmirrored: UpperBody,
    /// Global arm geometry of the live joints
    pub upper_body_global: UpperBody,
    pub posture: PostureShape,
    /// Gesture recognized in this very frame
    pub gesture: Option<GestureKind>,
}

impl FrameAnalysis {
    /// Clinical angles of a limb of the live joints
    pub fn clinical_angles(&self, end: Joint, origin: Joint) -> ClinicalAngles {
        clinical_angles(&self.joints, end, origin)
    }

    /// Mirror plane, only when mirroring was applied
    pub fn mirror_plane(&self) -> Option<&BodyPlane> {
        self.mirror_applied.then(|| self.planes.mirror_plane())
    }
}

/// Analysis state of one tracked person
#[derive(Debug, Clone)]
pub struct Skeleton {
    user_id: u32,
    config: AnalysisConfig,
    raw: JointSet,
    raw_initialized: bool,
    /// Movement of frames that failed after refreshing raw joints
    pending_delta: [f32; JOINT_COUNT],
    posture: PostureClassifier,
    gesture: GestureRecognizer,
    statistics: StatisticsTracker,
    analysis: Option<FrameAnalysis>,
}

impl Skeleton {
    pub fn new(user_id: u32, config: AnalysisConfig) -> Self {
        let config = config.sanitized();
        info!(
            "Tracking user {} (mirror mode {:?}, full body {})",
            user_id, config.mirror_mode, config.full_body_tracking
        );

        Self {
            user_id,
            posture: PostureClassifier::new(config.posture_tolerance),
            gesture: GestureRecognizer::new(config.gesture_tolerance, config.push_gesture_max_frames),
            statistics: StatisticsTracker::new(config.history_limit()),
            config,
            raw: JointSet::new(),
            raw_initialized: false,
            pending_delta: [0.0; JOINT_COUNT],
            analysis: None,
        }
    }

    /// Run the pipeline for one sensor frame.
    ///
    /// On error the raw joints are refreshed (unless the input itself was not
    /// finite) while every derived value keeps the last good frame. Movement
    /// measured on a failed frame is added to the deltas of the next analysed
    /// frame.
    pub fn update(&mut self, frame: &SensorFrame) -> SkeletonResult<&FrameAnalysis> {
        self.refresh_raw(frame)?;

        let local_frame = match build_local_frame(&self.raw) {
            Ok(local_frame) => local_frame,
            Err(err) => {
                warn!("Skipping frame {} for user {}: {}", frame.frame_index, self.user_id, err);
                self.defer_deltas();
                return Err(err);
            }
        };
        let measured = self.take_measured();
        let planes = compute_body_planes(&local_frame);
        let full_body = self.config.full_body_tracking;

        let mut unmirrored = measured;
        localize(&local_frame, &mut unmirrored, full_body);

        let mut joints = measured;
        let mirror_applied = apply_mirror(
            self.config.mirror_mode,
            Some(planes.mirror_plane()),
            &mut joints,
        );
        localize(&local_frame, &mut joints, full_body);

        let upper_body = UpperBody::from_local(&joints);

        let (posture, gesture) = if self.config.evaluate_posture_and_gesture {
            (
                self.posture.classify(&upper_body),
                self.gesture.evaluate(frame.frame_index, &upper_body),
            )
        } else {
            (PostureShape::NoPose, None)
        };

        if self.config.evaluate_statistics {
            self.statistics
                .update(frame.frame_index, frame.frame_rate, &unmirrored);
        }

        let analysis = FrameAnalysis {
            frame_index: frame.frame_index,
            frame_rate: frame.frame_rate,
            local_frame,
            planes,
            mirror_applied,
            upper_body,
            upper_body_unmirrored: UpperBody::from_local(&unmirrored),
            upper_body_global: UpperBody::from_global(&joints),
            joints,
            unmirrored,
            posture,
            gesture,
        };

        Ok(&*self.analysis.insert(analysis))
    }

    /// Copy the sensor readings into the raw joint set and compute per-joint deltas
    fn refresh_raw(&mut self, frame: &SensorFrame) -> SkeletonResult<()> {
        let full_body = self.config.full_body_tracking;
        let refreshed = move || Joint::ALL.into_iter().filter(move |j| full_body || !j.is_lower_body());

        if let Some(joint) = refreshed().find(|j| {
            !frame.reading(*j).position.iter().all(|c| c.is_finite())
        }) {
            warn!("Rejecting frame {}: non-finite {}", frame.frame_index, joint.name());
            return Err(SkeletonError::NonFiniteInput { joint });
        }

        if !full_body {
            for joint in Joint::ALL.into_iter().filter(|j| j.is_lower_body()) {
                *self.raw.get_mut(joint) = JointSample::default();
                self.pending_delta[joint.index()] = 0.0;
            }
        }

        for joint in refreshed() {
            let reading = frame.reading(joint);
            let sample = self.raw.get_mut(joint);
            sample.delta = if self.raw_initialized {
                (reading.position - sample.position).norm()
            } else {
                0.0
            };
            sample.position = reading.position;
            sample.confidence = reading.confidence;
            sample.orientation = reading.orientation;
            sample.orientation_confidence = reading.orientation_confidence;
        }
        self.raw_initialized = true;

        Ok(())
    }

    fn defer_deltas(&mut self) {
        for (joint, sample) in self.raw.iter() {
            self.pending_delta[joint.index()] += sample.delta;
        }
    }

    /// Raw joints with the movement of skipped frames folded into their deltas
    fn take_measured(&mut self) -> JointSet {
        let mut measured = self.raw;
        for joint in Joint::ALL {
            measured.get_mut(joint).delta += std::mem::take(&mut self.pending_delta[joint.index()]);
        }
        measured
    }

    // Setup

    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn mirror_mode(&self) -> MirrorMode {
        self.config.mirror_mode
    }

    pub fn set_mirror_mode(&mut self, mode: MirrorMode) {
        if self.config.mirror_mode != mode {
            info!("User {} mirror mode {:?} -> {:?}", self.user_id, self.config.mirror_mode, mode);
            self.config.mirror_mode = mode;
        }
    }

    pub fn full_body_tracking(&self) -> bool {
        self.config.full_body_tracking
    }

    pub fn set_full_body_tracking(&mut self, enabled: bool) {
        self.config.full_body_tracking = enabled;
    }

    pub fn evaluates_posture_and_gesture(&self) -> bool {
        self.config.evaluate_posture_and_gesture
    }

    pub fn set_evaluate_posture_and_gesture(&mut self, enabled: bool) {
        self.config.evaluate_posture_and_gesture = enabled;
    }

    pub fn evaluates_statistics(&self) -> bool {
        self.config.evaluate_statistics
    }

    pub fn set_evaluate_statistics(&mut self, enabled: bool) {
        self.config.evaluate_statistics = enabled;
    }

    pub fn posture_tolerance(&self) -> f32 {
        self.posture.tolerance()
    }

    /// Values outside [0, 1] reset to the default
    pub fn set_posture_tolerance(&mut self, tolerance: f32) {
        self.posture.set_tolerance(tolerance);
        self.config.posture_tolerance = self.posture.tolerance();
    }

    pub fn gesture_tolerance(&self) -> f32 {
        self.gesture.tolerance()
    }

    /// Values outside [0, 1] reset to the default
    pub fn set_gesture_tolerance(&mut self, tolerance: f32) {
        self.gesture.set_tolerance(tolerance);
        self.config.gesture_tolerance = self.gesture.tolerance();
    }

    // Frame state

    /// Last successfully analysed frame
    pub fn analysis(&self) -> Option<&FrameAnalysis> {
        self.analysis.as_ref()
    }

    /// Latest raw (un-mirrored, global) joints, refreshed even by failed frames
    pub fn raw_joints(&self) -> &JointSet {
        &self.raw
    }

    pub fn local_frame(&self) -> Option<&LocalFrame> {
        self.analysis.as_ref().map(|a| &a.local_frame)
    }

    pub fn body_planes(&self) -> Option<&BodyPlanes> {
        self.analysis.as_ref().map(|a| &a.planes)
    }

    pub fn mirror_plane(&self) -> Option<&BodyPlane> {
        self.analysis.as_ref().and_then(|a| a.mirror_plane())
    }

    /// Live sample of a joint, default before the first analysed frame
    pub fn joint(&self, joint: Joint) -> JointSample {
        self.analysis
            .as_ref()
            .map(|a| *a.joints.get(joint))
            .unwrap_or_default()
    }

    /// Live sample by raw index; out-of-range indices yield an all-zero sample
    pub fn joint_by_index(&self, index: usize) -> JointSample {
        Joint::from_index(index)
            .map(|joint| self.joint(joint))
            .unwrap_or_else(JointSample::zeroed)
    }

    /// Measured (un-mirrored) sample of a joint
    pub fn joint_unmirrored(&self, joint: Joint) -> JointSample {
        self.analysis
            .as_ref()
            .map(|a| *a.unmirrored.get(joint))
            .unwrap_or_default()
    }

    /// Distance of the torso from the sensor
    pub fn distance_to_sensor(&self) -> f32 {
        self.raw.position(Joint::Torso).norm()
    }

    // Posture and gesture

    pub fn current_posture(&self) -> PostureShape {
        self.analysis
            .as_ref()
            .map(|a| a.posture)
            .unwrap_or_default()
    }

    /// Gesture recognized within the last `lookback` frames
    pub fn last_gesture(&self, lookback: u64) -> GestureKind {
        match (&self.analysis, self.config.evaluate_posture_and_gesture) {
            (Some(analysis), true) => self.gesture.last_gesture(analysis.frame_index, lookback),
            _ => GestureKind::None,
        }
    }

    /// Clinical angles of the limb `origin → end` (elbow/shoulder or knee/hip)
    pub fn clinical_angles(&self, end: Joint, origin: Joint) -> ClinicalAngles {
        self.analysis
            .as_ref()
            .map(|a| a.clinical_angles(end, origin))
            .unwrap_or_default()
    }

    pub fn abduction(&self, end: Joint, origin: Joint) -> f32 {
        self.clinical_angles(end, origin).abduction
    }

    pub fn adduction(&self, end: Joint, origin: Joint) -> f32 {
        self.clinical_angles(end, origin).adduction
    }

    pub fn anteversion(&self, end: Joint, origin: Joint) -> f32 {
        self.clinical_angles(end, origin).anteversion
    }

    pub fn retroversion(&self, end: Joint, origin: Joint) -> f32 {
        self.clinical_angles(end, origin).retroversion
    }

    // Angles

    /// Angle between the global limb vectors `a1 − a2` and `b1 − b2`
    pub fn angle_between(&self, a1: Joint, a2: Joint, b1: Joint, b2: Joint) -> f32 {
        let joints = match &self.analysis {
            Some(analysis) => &analysis.joints,
            None => return 0.0,
        };
        angle_between(
            &(joints.position(a1) - joints.position(a2)),
            &(joints.position(b1) - joints.position(b2)),
        )
    }

    /// Angle between the local limb vector `to − from` and a local axis
    pub fn angle_to_local_axis(&self, axis: Axis, to: Joint, from: Joint) -> f32 {
        self.analysis
            .as_ref()
            .map(|a| angle_between(&(a.joints.local(to) - a.joints.local(from)), &axis.unit()))
            .unwrap_or(0.0)
    }

    /// Angle between the global limb vector `to − from` and a sensor axis
    pub fn angle_to_global_axis(&self, axis: Axis, to: Joint, from: Joint) -> f32 {
        self.analysis
            .as_ref()
            .map(|a| angle_between(&(a.joints.position(to) - a.joints.position(from)), &axis.unit()))
            .unwrap_or(0.0)
    }

    /// Upper arm against local +Y: 0 pointing up, π hanging down
    pub fn upper_arm_angle(&self, side: Side) -> f32 {
        self.arm_angles(side, false).0
    }

    /// Elbow flex: angle between lower and upper arm
    pub fn lower_arm_angle(&self, side: Side) -> f32 {
        self.arm_angles(side, false).1
    }

    pub fn upper_arm_angle_unmirrored(&self, side: Side) -> f32 {
        self.arm_angles(side, true).0
    }

    pub fn lower_arm_angle_unmirrored(&self, side: Side) -> f32 {
        self.arm_angles(side, true).1
    }

    fn arm_angles(&self, side: Side, unmirrored: bool) -> (f32, f32) {
        let analysis = match &self.analysis {
            Some(analysis) => analysis,
            None => return (0.0, 0.0),
        };
        let body = if unmirrored {
            &analysis.upper_body_unmirrored
        } else {
            &analysis.upper_body
        };
        let (upper, lower) = match side {
            Side::Left => (body.left_upper_arm, body.left_lower_arm),
            Side::Right => (body.right_upper_arm, body.right_lower_arm),
        };
        (angle_between(&upper, &Axis::Y.unit()), angle_between(&lower, &upper))
    }

    /// Angle between the local X axis and the sensor X axis
    pub fn orientation_alpha(&self) -> f32 {
        self.orientation_angle(Axis::X)
    }

    /// Angle between the local Y axis and the sensor Y axis
    pub fn orientation_beta(&self) -> f32 {
        self.orientation_angle(Axis::Y)
    }

    /// Angle between the local Z axis and the sensor Z axis
    pub fn orientation_gamma(&self) -> f32 {
        self.orientation_angle(Axis::Z)
    }

    fn orientation_angle(&self, axis: Axis) -> f32 {
        self.local_frame()
            .map(|frame| angle_between(&frame.axis(axis), &axis.unit()))
            .unwrap_or(0.0)
    }

    // Statistics

    /// Live statistics
    pub fn statistics(&self) -> &StatisticsSnapshot {
        self.statistics.current()
    }

    /// Frozen deep copy of the statistics
    pub fn freeze_statistics(&self) -> StatisticsSnapshot {
        self.statistics.snapshot()
    }

    /// Discard the statistics and start a new session
    pub fn reset_statistics(&mut self) {
        debug!("Resetting statistics of user {}", self.user_id);
        self.statistics.reset();
    }
}

/// Fill local positions from global ones; lower body only with full-body tracking
fn localize(frame: &LocalFrame, joints: &mut JointSet, full_body: bool) {
    for joint in Joint::ALL {
        if !full_body && joint.is_lower_body() {
            continue;
        }
        let sample = joints.get_mut(joint);
        sample.local_position = frame.to_local(&sample.position);
    }
}
