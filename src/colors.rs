use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Optional coloring applied on top of the glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Mono,  // plain terminal foreground
    Green, // matrix
    Fire,
    Ice,
    Gold,
    Neon,
}

impl ColorScheme {
    /// Shift+digit switches scheme while rendering.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char(')') => Some(ColorScheme::Mono),   // Shift+0
            KeyCode::Char('!') => Some(ColorScheme::Green),  // Shift+1
            KeyCode::Char('@') => Some(ColorScheme::Fire),   // Shift+2
            KeyCode::Char('#') => Some(ColorScheme::Ice),    // Shift+3
            KeyCode::Char('$') => Some(ColorScheme::Gold),   // Shift+4
            KeyCode::Char('%') => Some(ColorScheme::Neon),   // Shift+5
            _ => None,
        }
    }

    /// Color and boldness for a palette level, `None` for plain output.
    pub fn shade(self, level: usize, levels: usize) -> Option<(Color, bool)> {
        if self == ColorScheme::Mono || level == 0 {
            return None;
        }
        let band = intensity_band(level, levels);
        Some(scheme_color(self, band))
    }
}

/// Split palette levels `1..levels` into four bands (0-3).
pub fn intensity_band(level: usize, levels: usize) -> u8 {
    if levels <= 1 {
        return 3;
    }
    ((level * 4) / levels).min(3) as u8
}

fn scheme_color(scheme: ColorScheme, band: u8) -> (Color, bool) {
    match scheme {
        ColorScheme::Fire => match band {
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, false),
            _ => (Color::Yellow, true),
        },
        ColorScheme::Ice => match band {
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, false),
            _ => (Color::AnsiValue(14), true),  // Bright cyan
        },
        ColorScheme::Gold => match band {
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, true),
            _ => (Color::AnsiValue(11), true),  // Bright yellow
        },
        ColorScheme::Neon => match band {
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Magenta, false),
            _ => (Color::AnsiValue(13), true),  // Bright magenta
        },
        ColorScheme::Green | ColorScheme::Mono => match band {
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),  // Bright green
        },
    }
}
