//! Skeleton frame and biomechanical analysis for body-tracking sensors.
//!
//! Feed one [`SensorFrame`] per sensor frame into a [`Skeleton`]; it builds a
//! torso-attached coordinate frame, optionally mirrors one arm onto the other
//! for mirror therapy, classifies the upper-body posture, recognizes the push
//! gesture and accumulates session statistics.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::{AnalysisConfig, LoggingConfig};
pub use error::{SkeletonError, SkeletonResult};
pub use models::{
    Axis, BodyPlane, BodyPlanes, ClinicalAngles, GestureKind, Joint, JointReading, JointSample,
    JointSet, LocalFrame, MirrorMode, PostureShape, SensorFrame, Side, StatisticsRow,
    StatisticsSnapshot, SummaryRow, TrackedJoint, UpperBody, Vec3,
};
pub use services::{FrameAnalysis, Skeleton};
