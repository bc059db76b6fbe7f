//! Orthographic projection of lit points onto a character grid

use crate::geom::Point3;
use super::illumination::Illumination;

/// Grid dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub height: usize,
    pub width: usize,
}

impl FrameSize {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    pub fn cells(&self) -> usize {
        self.height * self.width
    }
}

/// Grayscale image with intensities in `[0, 1]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    size: FrameSize,
    cells: Vec<f64>,
}

impl PixelGrid {
    /// All-background grid.
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            cells: vec![0.0; size.cells()],
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.size.width + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.width.max(1))
    }

    /// Keep the brighter of the current value and `intensity`.
    pub fn blend_max(&mut self, row: usize, col: usize, intensity: f64) {
        let cell = &mut self.cells[row * self.size.width + col];
        *cell = cell.max(intensity);
    }

    /// Cells that received any light.
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|&&v| v > 0.0).count()
    }

    pub fn peak(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }
}

/// Scene-to-grid mapping for one frame size.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    frame: FrameSize,
    col_scale: f64,
    row_scale: f64,
}

impl Projector {
    /// `scene_size` is the donut's bounding diameter; `zoom` scales it on screen.
    pub fn new(frame: FrameSize, scene_size: f64, zoom: f64) -> Self {
        Self {
            frame,
            col_scale: zoom * frame.width as f64 / scene_size,
            row_scale: zoom * frame.height as f64 / scene_size,
        }
    }

    /// `(row, col)` of a point, dropping Z. Rows grow downward while scene Y
    /// grows upward. Points off the grid give `None`.
    pub fn cell(&self, p: Point3) -> Option<(usize, usize)> {
        let col = (self.frame.width as f64 / 2.0 + self.col_scale * p.x).floor();
        let row = (self.frame.height as f64 / 2.0 - self.row_scale * p.y).floor();

        let on_grid = col >= 0.0
            && col < self.frame.width as f64
            && row >= 0.0
            && row < self.frame.height as f64;
        on_grid.then(|| (row as usize, col as usize))
    }

    /// Rasterize lit points. Overlaps keep the maximum intensity, which
    /// stands in for a depth buffer.
    pub fn project(&self, points: &[Point3], light: &Illumination) -> PixelGrid {
        let mut grid = PixelGrid::new(self.frame);
        for &idx in &light.lit {
            if let Some((row, col)) = self.cell(points[idx]) {
                grid.blend_max(row, col, light.intensities[idx]);
            }
        }
        grid
    }
}
