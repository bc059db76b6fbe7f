use crate::colors::ColorScheme;
use crate::error::DonutError;
use crate::geom::torus::TorusSpec;
use crate::geom::{CompositeRotation, Point3, X, Y, Z};
use crate::render::glyph::GlyphPalette;
use crate::settings::DonutSettings;
use glam::DVec3;
use std::time::Duration;

/// Divisor applied to the user-facing speed to get radians per frame.
const SPEED_DIVISOR: f64 = 5.0;

/// Coordinate axes usable for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn vector(self) -> DVec3 {
        match self {
            Axis::X => X,
            Axis::Y => Y,
            Axis::Z => Z,
        }
    }
}

/// Requested frame size in rows (columns are always twice that).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelRequest {
    /// Largest frame the display can hold
    Auto,
    Fixed(u16),
}

impl PixelRequest {
    /// Any value `<= 0` means autoscale.
    pub fn from_sentinel(pixels: i32) -> Self {
        if pixels <= 0 {
            PixelRequest::Auto
        } else {
            PixelRequest::Fixed(pixels.min(u16::MAX as i32) as u16)
        }
    }
}

/// Everything one run needs
#[derive(Debug, Clone)]
pub struct DonutConfig {
    /// Tube radius (R1)
    pub radius: f64,
    /// R2 / R1
    pub radius_ratio: f64,
    pub n_theta: usize,
    pub n_phi: usize,
    pub axis_a: Axis,
    pub axis_b: Axis,
    pub start_angle_a: f64,
    pub start_angle_b: f64,
    pub speed: f64,
    /// Axis B speed relative to axis A
    pub speed_ratio: f64,
    pub light: Point3,
    pub pixels: PixelRequest,
    pub zoom: f64,
    /// `None` renders until cancelled
    pub frames: Option<u64>,
    pub palette: GlyphPalette,
    pub colors: ColorScheme,
    /// Seconds to sleep after each frame
    pub frame_delay: f32,
    pub debug: bool,
}

impl Default for DonutConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            radius_ratio: 2.0,
            n_theta: 30,
            n_phi: 100,
            axis_a: Axis::X,
            axis_b: Axis::Z,
            start_angle_a: 0.5,
            start_angle_b: -0.5,
            speed: 1.0,
            speed_ratio: 3.0 / 7.0,
            light: DVec3::new(0.0, 2.0, 10.0),
            pixels: PixelRequest::Fixed(40),
            zoom: 1.0,
            frames: Some(500),
            palette: GlyphPalette::default(),
            colors: ColorScheme::Mono,
            frame_delay: 0.03,
            debug: false,
        }
    }
}

impl DonutConfig {
    /// Overlay whatever the settings file provides.
    pub fn with_settings(mut self, s: &DonutSettings) -> Result<Self, DonutError> {
        if let Some(v) = s.radius {
            self.radius = v;
        }
        if let Some(v) = s.ratio {
            self.radius_ratio = v;
        }
        if let Some(v) = s.theta {
            self.n_theta = v;
        }
        if let Some(v) = s.phi {
            self.n_phi = v;
        }
        if let Some(v) = s.axis_a {
            self.axis_a = v;
        }
        if let Some(v) = s.axis_b {
            self.axis_b = v;
        }
        if let Some(v) = s.start_a {
            self.start_angle_a = v;
        }
        if let Some(v) = s.start_b {
            self.start_angle_b = v;
        }
        if let Some(v) = s.speed {
            self.speed = v;
        }
        if let Some(v) = s.speed_ratio {
            self.speed_ratio = v;
        }
        if let Some(v) = s.light {
            self.light = DVec3::from_array(v);
        }
        if let Some(v) = s.pixels {
            self.pixels = PixelRequest::from_sentinel(v);
        }
        if let Some(v) = s.zoom {
            self.zoom = v;
        }
        if let Some(v) = s.frames {
            self.frames = Some(v);
        }
        if s.infinite == Some(true) {
            self.frames = None;
        }
        if let Some(p) = &s.palette {
            self.palette = GlyphPalette::parse(p)?;
        }
        if let Some(v) = s.colors {
            self.colors = v;
        }
        if let Some(v) = s.delay {
            self.frame_delay = v;
        }
        Ok(self)
    }

    /// Reject degenerate requests before anything is built.
    pub fn validate(&self) -> Result<(), DonutError> {
        if self.n_theta == 0 || self.n_phi == 0 {
            return Err(DonutError::config(format!(
                "sample counts must be positive (theta={}, phi={})",
                self.n_theta, self.n_phi
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(DonutError::config(format!("radius must be positive, got {}", self.radius)));
        }
        if !(self.radius_ratio.is_finite() && self.radius_ratio > 0.0) {
            return Err(DonutError::config(format!(
                "radius ratio must be positive, got {}",
                self.radius_ratio
            )));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(DonutError::config(format!("zoom must be positive, got {}", self.zoom)));
        }
        if !self.light.is_finite() {
            return Err(DonutError::config("light position must be finite"));
        }
        let angles = [self.start_angle_a, self.start_angle_b, self.speed, self.speed_ratio];
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(DonutError::config("angles and speeds must be finite"));
        }
        if self.frames == Some(0) {
            return Err(DonutError::config("frame count must be positive"));
        }
        if Duration::try_from_secs_f32(self.frame_delay).is_err() {
            return Err(DonutError::config(
                "frame delay must be a non-negative number of seconds",
            ));
        }
        if self.palette.is_empty() {
            return Err(DonutError::config("glyph palette must not be empty"));
        }
        Ok(())
    }

    pub fn outer_radius(&self) -> f64 {
        self.radius * self.radius_ratio
    }

    /// Radii along X, tube swept about Z, donut swept about Y.
    pub fn torus(&self) -> TorusSpec {
        TorusSpec {
            inner_radius: self.radius,
            outer_radius: self.outer_radius(),
            radius_dir: X,
            theta_axis: Z,
            n_theta: self.n_theta,
            phi_axis: Y,
            n_phi: self.n_phi,
        }
    }

    pub fn initial_pose(&self) -> CompositeRotation {
        CompositeRotation::biaxial(
            self.axis_a.vector(),
            self.start_angle_a,
            self.axis_b.vector(),
            self.start_angle_b,
        )
    }

    /// Rotation applied once per frame.
    pub fn increment(&self) -> CompositeRotation {
        let step = self.speed / SPEED_DIVISOR;
        CompositeRotation::biaxial(
            self.axis_a.vector(),
            step,
            self.axis_b.vector(),
            self.speed_ratio * step,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = DonutConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.outer_radius(), 2.0);
        assert_eq!(c.torus().size(), 6.0);
        assert_eq!(c.torus().n_points(), 3000);
    }

    #[test]
    fn zero_samples_rejected() {
        let c = DonutConfig {
            n_theta: 0,
            ..DonutConfig::default()
        };
        assert!(matches!(c.validate(), Err(DonutError::Config(_))));
        let c = DonutConfig {
            n_phi: 0,
            ..DonutConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn bad_scalars_rejected() {
        for c in [
            DonutConfig { radius: 0.0, ..DonutConfig::default() },
            DonutConfig { radius_ratio: -1.0, ..DonutConfig::default() },
            DonutConfig { zoom: f64::NAN, ..DonutConfig::default() },
            DonutConfig { light: DVec3::new(0.0, f64::INFINITY, 0.0), ..DonutConfig::default() },
            DonutConfig { frames: Some(0), ..DonutConfig::default() },
            DonutConfig { frame_delay: -1.0, ..DonutConfig::default() },
            DonutConfig { frame_delay: 1e30, ..DonutConfig::default() },
            DonutConfig { frame_delay: f32::NAN, ..DonutConfig::default() },
        ] {
            assert!(c.validate().is_err());
        }
    }

    #[test]
    fn pixel_sentinel() {
        assert_eq!(PixelRequest::from_sentinel(-1), PixelRequest::Auto);
        assert_eq!(PixelRequest::from_sentinel(0), PixelRequest::Auto);
        assert_eq!(PixelRequest::from_sentinel(40), PixelRequest::Fixed(40));
    }

    #[test]
    fn increment_uses_speed_ratio() {
        let c = DonutConfig {
            speed: 1.0,
            speed_ratio: 0.5,
            ..DonutConfig::default()
        };
        let [a, b] = *c.increment().steps();
        assert!((a.angle() - 0.2).abs() < 1e-12);
        assert!((b.angle() - 0.1).abs() < 1e-12);
        assert_eq!(a.axis(), X);
        assert_eq!(b.axis(), Z);
    }

    #[test]
    fn settings_overlay() {
        let s = DonutSettings {
            theta: Some(12),
            light: Some([1.0, 1.0, 1.0]),
            pixels: Some(-1),
            infinite: Some(true),
            palette: Some("blocks".into()),
            ..DonutSettings::default()
        };
        let c = DonutConfig::default().with_settings(&s).unwrap();
        assert_eq!(c.n_theta, 12);
        assert_eq!(c.n_phi, 100);
        assert_eq!(c.light, DVec3::ONE);
        assert_eq!(c.pixels, PixelRequest::Auto);
        assert_eq!(c.frames, None);
        assert_eq!(c.palette.len(), 5);
    }
}
