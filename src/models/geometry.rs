/// Geometry primitives shared by the frame, plane and mirror services
///
/// Vectors and transforms are nalgebra types in single precision, matching the
/// millimetre-scale coordinates delivered by the body-tracking sensor.

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// 3-D point or direction
pub type Vec3 = Vector3<f32>;

/// 4×4 homogeneous transform (rotation columns plus translation)
pub type Transform = Matrix4<f32>;

/// Angle between two vectors in radians, in [0, π].
///
/// Returns 0 if either vector has zero length.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f32 {
    let mag_a = a.norm();
    let mag_b = b.norm();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    let cos_angle = a.dot(b) / (mag_a * mag_b);
    cos_angle.clamp(-1.0, 1.0).acos()
}

/// Inclusive range test used by every posture and gesture predicate
pub fn is_value_between(value: f32, lower: f32, upper: f32) -> bool {
    value >= lower && value <= upper
}

/// Apply a homogeneous transform to a point
pub fn transform_point(transform: &Transform, point: &Vec3) -> Vec3 {
    let p = transform * Vector4::new(point.x, point.y, point.z, 1.0);
    Vec3::new(p.x, p.y, p.z)
}

/// Local axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector of this axis
    pub fn unit(&self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Orthonormal coordinate frame attached to the torso
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// Origin of the frame (Torso, global coordinates)
    pub origin: Vec3,
    /// Unit X axis, left shoulder towards right shoulder
    pub x_axis: Vec3,
    /// Unit Y axis, from torso up to the shoulder line
    pub y_axis: Vec3,
    /// Unit Z axis, X × Y (points backwards out of the body)
    pub z_axis: Vec3,
    /// Local → global transform, columns [X, Y, Z, origin]
    pub forward: Transform,
    /// Global → local transform
    pub inverse: Transform,
}

impl LocalFrame {
    /// Map a global point into local coordinates
    pub fn to_local(&self, global: &Vec3) -> Vec3 {
        transform_point(&self.inverse, global)
    }

    /// Map a local point back into global coordinates
    pub fn to_global(&self, local: &Vec3) -> Vec3 {
        transform_point(&self.forward, local)
    }

    /// Global direction of a local axis
    pub fn axis(&self, axis: Axis) -> Vec3 {
        match axis {
            Axis::X => self.x_axis,
            Axis::Y => self.y_axis,
            Axis::Z => self.z_axis,
        }
    }

    /// Largest deviation from orthonormality over the three axes
    pub fn orthonormality_error(&self) -> f32 {
        let lengths = [
            (self.x_axis.norm() - 1.0).abs(),
            (self.y_axis.norm() - 1.0).abs(),
            (self.z_axis.norm() - 1.0).abs(),
        ];
        let dots = [
            self.x_axis.dot(&self.y_axis).abs(),
            self.y_axis.dot(&self.z_axis).abs(),
            self.x_axis.dot(&self.z_axis).abs(),
        ];

        lengths.iter().chain(dots.iter()).fold(0.0f32, |acc, v| acc.max(*v))
    }
}

/// Plane in Hesse Normal Form: r·n0 − d = 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPlane {
    /// Representative point on the plane
    pub r: Vec3,
    /// Unit normal
    pub n0: Vec3,
    /// Signed distance of the plane from the global origin
    pub d: f32,
}

impl BodyPlane {
    /// Build a plane through `r` with unit normal `n0`
    pub fn new(r: Vec3, n0: Vec3) -> Self {
        Self { r, n0, d: r.dot(&n0) }
    }

    /// Signed distance of a point from the plane
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        point.dot(&self.n0) - self.d
    }

    /// Residual of the HNF invariant, zero for a well formed plane
    pub fn residual(&self) -> f32 {
        self.r.dot(&self.n0) - self.d
    }
}

impl Default for BodyPlane {
    fn default() -> Self {
        Self {
            r: Vec3::zeros(),
            n0: Vec3::zeros(),
            d: 0.0,
        }
    }
}

/// The three anatomical planes of a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPlanes {
    /// Normal = local X; doubles as the mirror plane
    pub sagittal: BodyPlane,
    /// Normal = local Z
    pub frontal: BodyPlane,
    /// Normal = local Y
    pub transversal: BodyPlane,
}
