//! Per-frame pipeline: illuminate, project, quantize.
//!
//! A [`Scene`] owns the evolving surface. The frame loop advances it by the
//! per-frame rotation and asks it for a [`Rendered`] frame at whatever size
//! the display granted.

pub mod glyph;
pub mod illumination;
pub mod raster;

use crate::config::DonutConfig;
use crate::error::DonutError;
use crate::geom::torus::Surface;
use crate::geom::{CompositeRotation, Point3};
use glyph::{Frame, GlyphPalette};
use illumination::illuminate;
use raster::{FrameSize, PixelGrid, Projector};

/// Output of one pipeline pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub grid: PixelGrid,
    pub frame: Frame,
    pub lit: usize,
}

/// Run illumination, projection and glyph mapping for one pose.
pub fn render_surface(
    surface: &Surface,
    light: Point3,
    projector: &Projector,
    palette: &GlyphPalette,
) -> Rendered {
    let lum = illuminate(surface, light);
    let grid = projector.project(surface.points(), &lum);
    let frame = Frame::from_grid(&grid, palette);
    Rendered {
        grid,
        frame,
        lit: lum.lit_count(),
    }
}

/// The donut and everything constant about how it is drawn.
#[derive(Debug, Clone)]
pub struct Scene {
    surface: Surface,
    increment: CompositeRotation,
    light: Point3,
    size: f64,
    zoom: f64,
    palette: GlyphPalette,
}

impl Scene {
    /// Build the surface and move it to its initial pose.
    pub fn new(config: &DonutConfig) -> Result<Self, DonutError> {
        config.validate()?;
        let torus = config.torus();
        let surface = Surface::torus(&torus).rotated(&config.initial_pose());
        Ok(Self {
            surface,
            increment: config.increment(),
            light: config.light,
            size: torus.size(),
            zoom: config.zoom,
            palette: config.palette.clone(),
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Apply the per-frame rotation; motion accumulates frame over frame.
    pub fn advance(&mut self) {
        self.surface = self.surface.rotated(&self.increment);
    }

    pub fn render(&self, frame: FrameSize) -> Result<Rendered, DonutError> {
        if frame.height == 0 || frame.width == 0 {
            return Err(DonutError::Render(format!(
                "empty frame {}x{}",
                frame.height, frame.width
            )));
        }
        let projector = Projector::new(frame, self.size, self.zoom);
        Ok(render_surface(&self.surface, self.light, &projector, &self.palette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DonutConfig {
        DonutConfig {
            n_theta: 12,
            n_phi: 24,
            ..DonutConfig::default()
        }
    }

    #[test]
    fn scene_rejects_bad_config() {
        let c = DonutConfig {
            n_phi: 0,
            ..DonutConfig::default()
        };
        assert!(Scene::new(&c).is_err());
    }

    #[test]
    fn advance_moves_surface() {
        let mut scene = Scene::new(&small()).unwrap();
        let before = scene.surface().clone();
        scene.advance();
        assert_ne!(&before, scene.surface());
        assert_eq!(before.len(), scene.surface().len());
    }

    #[test]
    fn render_is_deterministic() {
        let scene = Scene::new(&small()).unwrap();
        let a = scene.render(FrameSize::new(10, 20)).unwrap();
        let b = scene.render(FrameSize::new(10, 20)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.frame, b.frame);
        assert!(a.lit > 0);
        assert!(a.grid.peak() <= 1.0);
    }

    #[test]
    fn empty_frame_is_an_error() {
        let scene = Scene::new(&small()).unwrap();
        assert!(matches!(
            scene.render(FrameSize::new(0, 0)),
            Err(DonutError::Render(_))
        ));
    }
}
