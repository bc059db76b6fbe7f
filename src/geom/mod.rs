//! Vector and rotation math shared by every pipeline stage.
//!
//! Points and normals are plain `DVec3`s. Rotations are axis-angle pairs
//! applied through unit quaternions, which is the same rotation Rodrigues'
//! formula produces.

pub mod torus;

use glam::{DQuat, DVec3};

/// A surface sample or a light position.
pub type Point3 = DVec3;

/// Outward surface direction paired by index with a `Point3`. Only the
/// direction is meaningful.
pub type Normal3 = DVec3;

/// Unit basis vectors.
pub const X: DVec3 = DVec3::X;
pub const Y: DVec3 = DVec3::Y;
pub const Z: DVec3 = DVec3::Z;

pub fn subtract(a: DVec3, b: DVec3) -> DVec3 {
    a - b
}

/// L2-normalize. A zero vector yields NaN components, which callers must
/// either avoid or let propagate.
pub fn normalize(v: DVec3) -> DVec3 {
    v / v.length()
}

/// Row-wise dot product of two index-aligned sequences.
pub fn row_dot(a: &[DVec3], b: &[DVec3]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(u, v)| u.dot(*v)).collect()
}

/// Row-wise cosine between two index-aligned sequences: both sides are
/// normalized before the dot product.
pub fn cosines(a: &[DVec3], b: &[DVec3]) -> Vec<f64> {
    let unit = |vs: &[DVec3]| vs.iter().copied().map(normalize).collect::<Vec<_>>();
    row_dot(&unit(a), &unit(b))
}

/// A single rotation of `angle` radians about `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    axis: DVec3,
    angle: f64,
}

impl Rotation {
    /// `axis` need not be unit length but must be non-zero.
    pub fn new(axis: DVec3, angle: f64) -> Self {
        Self {
            axis: normalize(axis),
            angle,
        }
    }

    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn inverse(&self) -> Self {
        Self {
            axis: self.axis,
            angle: -self.angle,
        }
    }

    fn quat(&self) -> DQuat {
        DQuat::from_axis_angle(self.axis, self.angle)
    }

    pub fn apply(&self, v: DVec3) -> DVec3 {
        self.quat() * v
    }

    pub fn apply_all(&self, vs: &[DVec3]) -> Vec<DVec3> {
        let q = self.quat();
        vs.iter().map(|v| q * *v).collect()
    }
}

/// Two rotations applied left to right. The motion model is biaxial, so a
/// composite always holds exactly two components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeRotation {
    steps: [Rotation; 2],
}

impl CompositeRotation {
    pub fn new(first: Rotation, second: Rotation) -> Self {
        Self {
            steps: [first, second],
        }
    }

    /// Rotate by `angle_a` about `axis_a`, then by `angle_b` about `axis_b`.
    pub fn biaxial(axis_a: DVec3, angle_a: f64, axis_b: DVec3, angle_b: f64) -> Self {
        Self::new(Rotation::new(axis_a, angle_a), Rotation::new(axis_b, angle_b))
    }

    pub fn steps(&self) -> &[Rotation; 2] {
        &self.steps
    }

    /// Undo this composite: reversed order, negated angles.
    pub fn inverse(&self) -> Self {
        Self::new(self.steps[1].inverse(), self.steps[0].inverse())
    }

    pub fn apply(&self, v: DVec3) -> DVec3 {
        self.steps.iter().fold(v, |acc, r| r.apply(acc))
    }

    pub fn apply_all(&self, vs: &[DVec3]) -> Vec<DVec3> {
        let [first, second] = &self.steps;
        second.apply_all(&first.apply_all(vs))
    }
}
