/// Local Coordinate Frame Construction
///
/// Builds the torso-attached frame every tracked frame:
/// - origin at the torso
/// - +X from the left to the right shoulder
/// - +Y from the torso to its projection onto the shoulder line
/// - +Z = X × Y, pointing out of the back
///
/// When the torso lies on the shoulder line, Y falls back to the sensor's up
/// axis with its X component removed.

use tracing::debug;

use crate::error::{SkeletonError, SkeletonResult};
use crate::models::geometry::{LocalFrame, Transform, Vec3};
use crate::models::joint::{Joint, JointSet};

/// Axis candidates shorter than this (sensor units, mm) count as degenerate
const MIN_AXIS_LENGTH: f32 = 1e-3;

/// Build the local frame from the global Torso and shoulder positions
pub fn build_local_frame(joints: &JointSet) -> SkeletonResult<LocalFrame> {
    let torso = finite_position(joints, Joint::Torso)?;
    let left_shoulder = finite_position(joints, Joint::LeftShoulder)?;
    let right_shoulder = finite_position(joints, Joint::RightShoulder)?;

    let x = right_shoulder - left_shoulder;
    if x.norm() < MIN_AXIS_LENGTH {
        return Err(SkeletonError::degenerate("left and right shoulder coincide"));
    }

    // Project the torso onto the line left_shoulder + λ·x
    let lambda = (torso - left_shoulder).dot(&x) / x.dot(&x);
    let cross_point = left_shoulder + x * lambda;
    let x_axis = x.normalize();

    // Remove residual X component left by rounding
    let mut y = cross_point - torso;
    y -= x_axis * y.dot(&x_axis);
    if y.norm() < MIN_AXIS_LENGTH {
        debug!("Torso lies on the shoulder line, using sensor up axis for Y");
        y = Vec3::y() - x_axis * x_axis.y;
        if y.norm() < MIN_AXIS_LENGTH {
            return Err(SkeletonError::degenerate(
                "shoulder line is vertical and contains the torso",
            ));
        }
    }

    let y_axis = y.normalize();
    let z_axis = x_axis.cross(&y_axis).normalize();

    let forward = Transform::new(
        x_axis.x, y_axis.x, z_axis.x, torso.x,
        x_axis.y, y_axis.y, z_axis.y, torso.y,
        x_axis.z, y_axis.z, z_axis.z, torso.z,
        0.0, 0.0, 0.0, 1.0,
    );
    let inverse = forward
        .try_inverse()
        .ok_or(SkeletonError::NonInvertibleFrame)?;

    Ok(LocalFrame {
        origin: torso,
        x_axis,
        y_axis,
        z_axis,
        forward,
        inverse,
    })
}

fn finite_position(joints: &JointSet, joint: Joint) -> SkeletonResult<Vec3> {
    let position = joints.position(joint);
    if position.iter().all(|c| c.is_finite()) {
        Ok(position)
    } else {
        Err(SkeletonError::NonFiniteInput { joint })
    }
}
