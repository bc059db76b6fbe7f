//! Donut surface sampling

use super::{CompositeRotation, Normal3, Point3, Rotation};
use glam::DVec3;
use std::f64::consts::TAU;

/// Shape parameters for the donut surface.
#[derive(Debug, Clone, Copy)]
pub struct TorusSpec {
    /// Tube radius (R1)
    pub inner_radius: f64,
    /// Distance from the donut center to the tube centerline (R2)
    pub outer_radius: f64,
    /// Direction both radii are laid along
    pub radius_dir: DVec3,
    pub theta_axis: DVec3,
    pub n_theta: usize,
    pub phi_axis: DVec3,
    pub n_phi: usize,
}

impl TorusSpec {
    /// Bounding diameter of the donut.
    pub fn size(&self) -> f64 {
        2.0 * (self.inner_radius + self.outer_radius)
    }

    pub fn n_points(&self) -> usize {
        self.n_theta * self.n_phi
    }
}

/// `n` angles evenly spaced over `[0, 2π)`. A single sample is just `0`.
pub fn sweep_angles(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| TAU * i as f64 / n as f64)
}

/// Surface points with their outward normals, index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    points: Vec<Point3>,
    normals: Vec<Normal3>,
}

impl Surface {
    /// Pair points with normals. Returns `None` when the lengths differ.
    pub fn from_parts(points: Vec<Point3>, normals: Vec<Normal3>) -> Option<Self> {
        (points.len() == normals.len()).then_some(Self { points, normals })
    }

    /// Sample the donut in phi-major, theta-minor order.
    pub fn torus(spec: &TorusSpec) -> Self {
        let r1 = spec.radius_dir * spec.inner_radius;
        let r2 = spec.radius_dir * spec.outer_radius;

        let circle: Vec<DVec3> = sweep_angles(spec.n_theta)
            .map(|theta| Rotation::new(spec.theta_axis, theta).apply(r1))
            .collect();
        let translated: Vec<DVec3> = circle.iter().map(|p| *p + r2).collect();

        let mut points = Vec::with_capacity(spec.n_points());
        let mut normals = Vec::with_capacity(spec.n_points());
        for phi in sweep_angles(spec.n_phi) {
            let sweep = Rotation::new(spec.phi_axis, phi);
            points.extend(sweep.apply_all(&translated));
            normals.extend(sweep.apply_all(&circle));
        }

        Self { points, normals }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn normals(&self) -> &[Normal3] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A new surface with points and normals moved by the same rotation.
    pub fn rotated(&self, rotation: &CompositeRotation) -> Self {
        Self {
            points: rotation.apply_all(&self.points),
            normals: rotation.apply_all(&self.normals),
        }
    }
}
