/// Posture, gesture and mirror-therapy vocabulary

use serde::{Deserialize, Serialize};

use crate::models::geometry::Vec3;
use crate::models::joint::{Joint, JointSet};

/// Upper-body shape, viewed along the local X axis.
///
/// (H = hand, E = elbow, S = shoulder)
/// ```text
/// V: H    H   A:  SS     U: H      H   N: E SS E   M: E    E   W: H    H
///     E  E       E  E                               SS          SS
///      SS       H    H     E SS E         H    H     H    H      E    E
/// ```
/// O has the hands meeting above (or below) the head, I has both arms straight
/// up side by side, HandsForwardDown holds straight arms forward at hip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureShape {
    #[default]
    NoPose,
    V,
    A,
    U,
    N,
    M,
    W,
    O,
    I,
    HandsForwardDown,
}

impl PostureShape {
    /// String representation for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPose => "no-pose",
            Self::V => "v-shape",
            Self::A => "a-shape",
            Self::U => "u-shape",
            Self::N => "n-shape",
            Self::M => "m-shape",
            Self::W => "w-shape",
            Self::O => "o-shape",
            Self::I => "i-shape",
            Self::HandsForwardDown => "hands-forward-down",
        }
    }
}

/// Time-extended gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    #[default]
    None,
    /// Hands start near the shoulders and are pushed forward until the arms are straight
    Push,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Push => "push",
        }
    }
}

/// Which body side is reflected onto the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorMode {
    #[default]
    Off,
    /// Left arm drives the right arm
    MirrorLeftToRight,
    /// Right arm drives the left arm
    MirrorRightToLeft,
}

impl MirrorMode {
    /// Parse a mode name; unknown names switch mirroring off
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "left" | "left_to_right" | "mirror_left_to_right" => Self::MirrorLeftToRight,
            "right" | "right_to_left" | "mirror_right_to_left" => Self::MirrorRightToLeft,
            _ => Self::Off,
        }
    }

    /// (source, target) joint pairs for positions: elbow and hand only
    pub fn position_pairs(&self) -> &'static [(Joint, Joint)] {
        match self {
            Self::Off => &[],
            Self::MirrorLeftToRight => &[
                (Joint::LeftElbow, Joint::RightElbow),
                (Joint::LeftHand, Joint::RightHand),
            ],
            Self::MirrorRightToLeft => &[
                (Joint::RightElbow, Joint::LeftElbow),
                (Joint::RightHand, Joint::LeftHand),
            ],
        }
    }

    /// (source, target) joint pairs for orientations: shoulder, elbow and hand
    pub fn orientation_pairs(&self) -> &'static [(Joint, Joint)] {
        match self {
            Self::Off => &[],
            Self::MirrorLeftToRight => &[
                (Joint::LeftShoulder, Joint::RightShoulder),
                (Joint::LeftElbow, Joint::RightElbow),
                (Joint::LeftHand, Joint::RightHand),
            ],
            Self::MirrorRightToLeft => &[
                (Joint::RightShoulder, Joint::LeftShoulder),
                (Joint::RightElbow, Joint::LeftElbow),
                (Joint::RightHand, Joint::LeftHand),
            ],
        }
    }
}

/// Clinical range-of-motion angles of one limb (radians, neutral-zero method)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClinicalAngles {
    pub abduction: f32,
    pub adduction: f32,
    pub anteversion: f32,
    pub retroversion: f32,
}

impl ClinicalAngles {
    /// Component-wise maximum
    pub fn max(&self, other: &ClinicalAngles) -> ClinicalAngles {
        ClinicalAngles {
            abduction: self.abduction.max(other.abduction),
            adduction: self.adduction.max(other.adduction),
            anteversion: self.anteversion.max(other.anteversion),
            retroversion: self.retroversion.max(other.retroversion),
        }
    }

    pub fn to_degrees(&self) -> ClinicalAngles {
        ClinicalAngles {
            abduction: self.abduction.to_degrees(),
            adduction: self.adduction.to_degrees(),
            anteversion: self.anteversion.to_degrees(),
            retroversion: self.retroversion.to_degrees(),
        }
    }
}

/// Local-frame upper-body geometry consumed by the posture and gesture services
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UpperBody {
    pub left_shoulder: Vec3,
    pub left_elbow: Vec3,
    pub left_hand: Vec3,
    pub right_shoulder: Vec3,
    pub right_elbow: Vec3,
    pub right_hand: Vec3,
    /// LeftElbow − LeftShoulder
    pub left_upper_arm: Vec3,
    /// LeftHand − LeftElbow
    pub left_lower_arm: Vec3,
    /// RightElbow − RightShoulder
    pub right_upper_arm: Vec3,
    /// RightHand − RightElbow
    pub right_lower_arm: Vec3,
}

impl UpperBody {
    /// Build from local joint positions
    pub fn new(
        left_shoulder: Vec3,
        left_elbow: Vec3,
        left_hand: Vec3,
        right_shoulder: Vec3,
        right_elbow: Vec3,
        right_hand: Vec3,
    ) -> Self {
        Self {
            left_shoulder,
            left_elbow,
            left_hand,
            right_shoulder,
            right_elbow,
            right_hand,
            left_upper_arm: left_elbow - left_shoulder,
            left_lower_arm: left_hand - left_elbow,
            right_upper_arm: right_elbow - right_shoulder,
            right_lower_arm: right_hand - right_elbow,
        }
    }

    /// Take the local positions of a joint set
    pub fn from_local(joints: &JointSet) -> Self {
        Self::new(
            joints.local(Joint::LeftShoulder),
            joints.local(Joint::LeftElbow),
            joints.local(Joint::LeftHand),
            joints.local(Joint::RightShoulder),
            joints.local(Joint::RightElbow),
            joints.local(Joint::RightHand),
        )
    }

    /// Take the global positions of a joint set
    pub fn from_global(joints: &JointSet) -> Self {
        Self::new(
            joints.position(Joint::LeftShoulder),
            joints.position(Joint::LeftElbow),
            joints.position(Joint::LeftHand),
            joints.position(Joint::RightShoulder),
            joints.position(Joint::RightElbow),
            joints.position(Joint::RightHand),
        )
    }

    /// Distance between the two hands
    pub fn hands_distance(&self) -> f32 {
        (self.right_hand - self.left_hand).norm()
    }

    /// Distance between the two shoulders
    pub fn shoulder_distance(&self) -> f32 {
        (self.right_shoulder - self.left_shoulder).norm()
    }
}
