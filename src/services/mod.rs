// Frame analysis services

pub mod body_plane_service;
pub mod frame_builder;
pub mod gesture_recognizer;
pub mod mirror_service;
pub mod posture_classifier;
pub mod skeleton;
pub mod statistics_tracker;

pub use body_plane_service::compute_body_planes;
pub use frame_builder::build_local_frame;
pub use gesture_recognizer::{GestureRecognizer, GestureState};
pub use mirror_service::{apply_mirror, mirror_direction, mirror_orientation, mirror_point};
pub use posture_classifier::{clinical_angles, PostureClassifier};
pub use skeleton::{FrameAnalysis, Skeleton};
pub use statistics_tracker::StatisticsTracker;
