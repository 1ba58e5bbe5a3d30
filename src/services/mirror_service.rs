/// Mirror Therapy Service
///
/// Reflects the elbow and hand positions and the shoulder, elbow and hand
/// orientations of one body side onto the other across the sagittal plane.

use tracing::debug;

use crate::models::geometry::{BodyPlane, Transform, Vec3};
use crate::models::joint::JointSet;
use crate::models::posture::MirrorMode;

/// Reflect a point across a plane
pub fn mirror_point(plane: &BodyPlane, point: &Vec3) -> Vec3 {
    let distance = plane.signed_distance(point);
    point - plane.n0 * (2.0 * distance)
}

/// Reflect a free vector (direction) across a plane; the plane offset does not apply
pub fn mirror_direction(plane: &BodyPlane, direction: &Vec3) -> Vec3 {
    direction - plane.n0 * (2.0 * direction.dot(&plane.n0))
}

/// Reflect the rotation columns of an orientation and negate the X column so the
/// result stays right-handed. The translation column is kept as is.
pub fn mirror_orientation(plane: &BodyPlane, orientation: &Transform) -> Transform {
    let mut mirrored = *orientation;

    for col in 0..3 {
        let axis = column(orientation, col);
        let reflected = mirror_direction(plane, &axis);
        let sign = if col == 0 { -1.0 } else { 1.0 };
        for row in 0..3 {
            mirrored[(row, col)] = sign * reflected[row];
        }
    }

    mirrored
}

/// Overwrite the target side of `joints` with the mirrored source side.
///
/// Returns `false` without touching anything when mirroring is off or no mirror
/// plane is available for this frame.
pub fn apply_mirror(mode: MirrorMode, plane: Option<&BodyPlane>, joints: &mut JointSet) -> bool {
    let plane = match (mode, plane) {
        (MirrorMode::Off, _) => return false,
        (_, None) => {
            debug!("No mirror plane for this frame, skipping {:?}", mode);
            return false;
        }
        (_, Some(plane)) => plane,
    };

    for &(source, target) in mode.position_pairs() {
        let from = *joints.get(source);
        let to = joints.get_mut(target);
        to.position = mirror_point(plane, &from.position);
        to.confidence = from.confidence;
        to.delta = from.delta;
    }

    for &(source, target) in mode.orientation_pairs() {
        let from = *joints.get(source);
        let to = joints.get_mut(target);
        to.orientation = mirror_orientation(plane, &from.orientation);
        to.orientation_confidence = from.orientation_confidence;
    }

    true
}

fn column(matrix: &Transform, col: usize) -> Vec3 {
    Vec3::new(matrix[(0, col)], matrix[(1, col)], matrix[(2, col)])
}
