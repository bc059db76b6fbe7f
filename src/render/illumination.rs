//! Diffuse (Lambertian) shading against a single point light

use crate::geom::torus::Surface;
use crate::geom::{cosines, subtract, Point3};

/// Per-point intensities plus the indices that actually face the light.
#[derive(Debug, Clone, PartialEq)]
pub struct Illumination {
    pub intensities: Vec<f64>,
    pub lit: Vec<usize>,
}

impl Illumination {
    pub fn lit_count(&self) -> usize {
        self.lit.len()
    }
}

/// Intensity at point `i` is the cosine between the light vector
/// `light - p_i` and the normal `n_i`. Only strictly positive values are lit;
/// a light sitting exactly on a point yields NaN, which is never lit.
pub fn illuminate(surface: &Surface, light: Point3) -> Illumination {
    let to_light: Vec<Point3> = surface
        .points()
        .iter()
        .map(|p| subtract(light, *p))
        .collect();
    let intensities = cosines(&to_light, surface.normals());
    let lit = intensities
        .iter()
        .enumerate()
        .filter_map(|(idx, &i)| (i > 0.0).then_some(idx))
        .collect();

    Illumination { intensities, lit }
}
