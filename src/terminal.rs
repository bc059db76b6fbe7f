use crate::colors::ColorScheme;
use crate::config::PixelRequest;
use crate::display::{fit_frame, frame_counter, CancelFlag, Display};
use crate::error::DonutError;
use crate::render::glyph::Frame;
use crate::render::raster::FrameSize;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;
use tracing::debug;

/// Live terminal output on the alternate screen
pub struct Terminal {
    out: Stdout,
    colors: ColorScheme,
    origin: (u16, u16),
    active: bool,
    cancel: CancelFlag,
}

impl Terminal {
    pub fn new(colors: ColorScheme) -> Self {
        Self {
            out: stdout(),
            colors,
            origin: (0, 0),
            active: false,
            cancel: CancelFlag::new(),
        }
    }

    /// Also stop when `cancel` is raised, e.g. by a SIGINT from another process.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Check for keypress (non-blocking)
    fn check_key(&self) -> io::Result<Option<KeyEvent>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                if key_event.kind != KeyEventKind::Release {
                    return Ok(Some(key_event));
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &Frame, counter: &str) -> io::Result<()> {
        let (x0, y0) = self.origin;
        let levels = frame.palette().len();
        let size = frame.size();

        for row in 0..size.height {
            queue!(self.out, MoveTo(x0, y0 + row as u16))?;
            for col in 0..size.width {
                let level = frame.level(row, col);
                let ch = frame.palette().glyph(level);
                match self.colors.shade(level, levels) {
                    Some((color, bold)) => {
                        if bold {
                            queue!(self.out, SetAttribute(Attribute::Bold))?;
                        }
                        queue!(self.out, SetForegroundColor(color), Print(ch), ResetColor)?;
                        if bold {
                            queue!(self.out, SetAttribute(Attribute::Reset))?;
                        }
                    }
                    None => queue!(self.out, Print(ch))?,
                }
            }
        }

        queue!(self.out, MoveTo(0, 0), Print(counter))?;
        self.out.flush()
    }
}

/// Keys that stop the animation. Raw mode turns Ctrl-C into a key event.
pub fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Both steps have run; report the earlier failure if any.
fn first_error(first: io::Result<()>, second: io::Result<()>) -> io::Result<()> {
    first.and(second)
}

/// Offset that centers `inner` cells within `outer`.
pub fn centered(outer: u16, inner: usize) -> u16 {
    outer.saturating_sub(inner.min(u16::MAX as usize) as u16) / 2
}

impl Display for Terminal {
    fn init(&mut self, request: PixelRequest) -> Result<FrameSize, DonutError> {
        let (cols, rows) = size()?;

        enable_raw_mode()?;
        self.active = true;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        let frame = fit_frame(cols, rows, request)?;
        self.origin = (centered(cols, frame.width), centered(rows, frame.height));
        debug!(cols, rows, height = frame.height, width = frame.width, "terminal ready");
        Ok(frame)
    }

    fn write(&mut self, frame: &Frame, index: u64, total: Option<u64>) -> io::Result<()> {
        self.draw(frame, &frame_counter(index, total))
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        debug!("restoring terminal");
        let screen = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let raw = disable_raw_mode();
        first_error(screen, raw)
    }

    fn interrupted(&mut self) -> io::Result<bool> {
        if self.cancel.is_cancelled() {
            return Ok(true);
        }
        while let Some(key) = self.check_key()? {
            if is_quit_key(key.code, key.modifiers) {
                return Ok(true);
            }
            if let Some(scheme) = ColorScheme::from_key(key.code) {
                debug!(?scheme, "color scheme changed");
                self.colors = scheme;
            }
        }
        Ok(false)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        assert!(is_quit_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_quit_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_quit_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_quit_key(KeyCode::Char(' '), KeyModifiers::NONE));
    }

    #[test]
    fn centering() {
        assert_eq!(centered(80, 48), 16);
        assert_eq!(centered(24, 24), 0);
        assert_eq!(centered(10, 48), 0);
    }

    #[test]
    fn first_error_wins() {
        let a = || Err(io::Error::new(io::ErrorKind::Other, "screen"));
        let b = || Err(io::Error::new(io::ErrorKind::Other, "raw"));
        assert_eq!(first_error(a(), b()).unwrap_err().to_string(), "screen");
        assert_eq!(first_error(Ok(()), b()).unwrap_err().to_string(), "raw");
        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn raised_flag_interrupts_without_reading_keys() {
        let flag = CancelFlag::new();
        let mut term = Terminal::new(ColorScheme::Mono).with_cancel(flag.clone());
        flag.cancel();
        assert!(term.interrupted().unwrap());
    }

    #[test]
    fn restore_before_init_is_noop() {
        let mut term = Terminal::new(ColorScheme::Mono);
        assert!(term.restore().is_ok());
        assert!(term.restore().is_ok());
    }
}
