use thiserror::Error;

use crate::models::joint::Joint;

/// Per-frame analysis failures. None of them end a session: the skeleton keeps
/// the last good analysis and resumes with the next valid frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkeletonError {
    #[error("Degenerate frame: {reason}")]
    DegenerateFrame { reason: String },
    #[error("Local frame transform is not invertible")]
    NonInvertibleFrame,
    #[error("Non-finite coordinates for joint {}", .joint.name())]
    NonFiniteInput { joint: Joint },
}

impl SkeletonError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateFrame {
            reason: reason.into(),
        }
    }
}

pub type SkeletonResult<T> = std::result::Result<T, SkeletonError>;
