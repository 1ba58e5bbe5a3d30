/// Anatomical body planes in Hesse Normal Form, taken from the local frame

use crate::models::geometry::{BodyPlane, BodyPlanes, LocalFrame};

/// Sagittal, frontal and transversal planes through the frame origin.
///
/// The sagittal plane (normal = local X) is also the mirror plane.
pub fn compute_body_planes(frame: &LocalFrame) -> BodyPlanes {
    BodyPlanes {
        sagittal: BodyPlane::new(frame.origin, frame.x_axis),
        frontal: BodyPlane::new(frame.origin, frame.z_axis),
        transversal: BodyPlane::new(frame.origin, frame.y_axis),
    }
}

impl BodyPlanes {
    /// The plane used for mirror therapy
    pub fn mirror_plane(&self) -> &BodyPlane {
        &self.sagittal
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyPlane> {
        [&self.sagittal, &self.frontal, &self.transversal].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::Vec3;
    use crate::models::joint::{Joint, JointSet};
    use crate::services::frame_builder::build_local_frame;

    fn frame() -> LocalFrame {
        let mut joints = JointSet::new();
        joints.get_mut(Joint::Torso).position = Vec3::new(35.0, -20.0, 2100.0);
        joints.get_mut(Joint::LeftShoulder).position = Vec3::new(-120.0, 280.0, 2150.0);
        joints.get_mut(Joint::RightShoulder).position = Vec3::new(190.0, 300.0, 2050.0);
        build_local_frame(&joints).unwrap()
    }

    #[test]
    fn test_planes_satisfy_hesse_normal_form() {
        let planes = compute_body_planes(&frame());
        for plane in planes.iter() {
            assert!(plane.residual().abs() < 1e-2, "residual {}", plane.residual());
            assert!((plane.n0.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_normals_follow_local_axes() {
        let frame = frame();
        let planes = compute_body_planes(&frame);

        assert_eq!(planes.sagittal.n0, frame.x_axis);
        assert_eq!(planes.frontal.n0, frame.z_axis);
        assert_eq!(planes.transversal.n0, frame.y_axis);
        assert_eq!(planes.mirror_plane().r, frame.origin);
    }

    #[test]
    fn test_origin_lies_on_every_plane() {
        let frame = frame();
        let planes = compute_body_planes(&frame);
        for plane in planes.iter() {
            assert!(plane.signed_distance(&frame.origin).abs() < 1e-2);
        }
    }
}
