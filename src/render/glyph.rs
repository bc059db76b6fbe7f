//! Intensity to ASCII quantization

use super::raster::{FrameSize, PixelGrid};
use crate::error::DonutError;

/// Built-in palettes, darkest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalettePreset {
    Classic,
    Extended,
    Blocks,
}

impl PalettePreset {
    pub fn glyphs(self) -> &'static str {
        match self {
            PalettePreset::Classic => " .,-~:;=!*#$@",
            PalettePreset::Extended => " .,-~:;=+!?*&$%#@",
            PalettePreset::Blocks => " ░▒▓█",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "classic" | "default" => Some(PalettePreset::Classic),
            "extended" | "ext" => Some(PalettePreset::Extended),
            "blocks" | "block" => Some(PalettePreset::Blocks),
            _ => None,
        }
    }
}

/// Ordered glyphs: index 0 is background, the last is the brightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPalette {
    glyphs: Vec<char>,
}

impl GlyphPalette {
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Result<Self, DonutError> {
        let glyphs: Vec<char> = glyphs.into_iter().collect();
        if glyphs.is_empty() {
            return Err(DonutError::config("glyph palette must not be empty"));
        }
        Ok(Self { glyphs })
    }

    /// A preset name, or else the literal characters of `spec`.
    pub fn parse(spec: &str) -> Result<Self, DonutError> {
        match PalettePreset::from_name(spec) {
            Some(preset) => Ok(preset.into()),
            None => Self::new(spec.chars()),
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, level: usize) -> char {
        self.glyphs[level.min(self.glyphs.len() - 1)]
    }

    /// `floor(N * intensity)`, clamped to `[0, N-1]`. Intensity 1.0 lands on
    /// the last glyph; NaN and negatives land on the background.
    pub fn level(&self, intensity: f64) -> usize {
        let n = self.glyphs.len();
        let raw = (n as f64 * intensity).floor();
        if raw.is_nan() || raw < 0.0 {
            0
        } else {
            (raw as usize).min(n - 1)
        }
    }
}

impl Default for GlyphPalette {
    fn default() -> Self {
        PalettePreset::Classic.into()
    }
}

impl From<PalettePreset> for GlyphPalette {
    fn from(preset: PalettePreset) -> Self {
        Self {
            glyphs: preset.glyphs().chars().collect(),
        }
    }
}

/// A quantized grid: palette levels per cell plus the palette to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    size: FrameSize,
    levels: Vec<usize>,
    palette: GlyphPalette,
}

impl Frame {
    pub fn from_grid(grid: &PixelGrid, palette: &GlyphPalette) -> Self {
        let levels = grid
            .rows()
            .flat_map(|row| row.iter().map(|&v| palette.level(v)))
            .collect();
        Self {
            size: grid.size(),
            levels,
            palette: palette.clone(),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn palette(&self) -> &GlyphPalette {
        &self.palette
    }

    pub fn level(&self, row: usize, col: usize) -> usize {
        self.levels[row * self.size.width + col]
    }

    pub fn glyph(&self, row: usize, col: usize) -> char {
        self.palette.glyph(self.level(row, col))
    }

    /// Each row rendered as a string.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.height)
            .map(|row| (0..self.size.width).map(|col| self.glyph(row, col)).collect())
            .collect()
    }
}
