//! The output side of the frame loop.
//!
//! Anything that can show frames implements [`Display`]: the crossterm
//! [`Terminal`](crate::terminal::Terminal) for live output and
//! [`PrintDisplay`] for plain text streams.

use crate::config::PixelRequest;
use crate::error::DonutError;
use crate::render::glyph::Frame;
use crate::render::raster::FrameSize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait Display {
    /// Prepare the output and return the frame size it can hold.
    fn init(&mut self, request: PixelRequest) -> Result<FrameSize, DonutError>;

    /// Draw one frame and its `current/total` counter.
    fn write(&mut self, frame: &Frame, index: u64, total: Option<u64>) -> io::Result<()>;

    /// Return the output to its pre-`init` state. Safe to call repeatedly.
    fn restore(&mut self) -> io::Result<()>;

    /// Whether the user asked to stop. Polled between frames.
    fn interrupted(&mut self) -> io::Result<bool> {
        Ok(false)
    }
}

/// Fit a request into `cols x rows` character cells. Frames are twice as
/// wide as tall so the donut keeps its aspect ratio.
pub fn fit_frame(cols: u16, rows: u16, request: PixelRequest) -> Result<FrameSize, DonutError> {
    let available = rows.min(cols / 2);
    let side = match request {
        PixelRequest::Auto => available,
        PixelRequest::Fixed(n) => n,
    };
    if side == 0 || side > available {
        return Err(DonutError::DisplaySizeExceeded {
            requested: side,
            available,
        });
    }
    Ok(FrameSize::new(side as usize, 2 * side as usize))
}

/// Counter text shown with each frame, 1-based.
pub fn frame_counter(index: u64, total: Option<u64>) -> String {
    match total {
        Some(total) => format!("{}/{}", index + 1, total),
        None => format!("{}", index + 1),
    }
}

/// Shared stop request, raised from outside the frame loop (e.g. SIGINT).
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Writes frames as plain lines: the counter, then the glyph rows.
pub struct PrintDisplay<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cancel: CancelFlag,
}

impl<W: Write> PrintDisplay<W> {
    /// `cols x rows` is the space frames must fit in.
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            cancel: CancelFlag::new(),
        }
    }

    /// Stop rendering once `cancel` is raised.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Display for PrintDisplay<W> {
    fn init(&mut self, request: PixelRequest) -> Result<FrameSize, DonutError> {
        fit_frame(self.cols, self.rows, request)
    }

    fn write(&mut self, frame: &Frame, index: u64, total: Option<u64>) -> io::Result<()> {
        writeln!(self.out, "{}", frame_counter(index, total))?;
        for line in frame.lines() {
            writeln!(self.out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn interrupted(&mut self) -> io::Result<bool> {
        Ok(self.cancel.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::glyph::GlyphPalette;
    use crate::render::raster::PixelGrid;

    #[test]
    fn autoscale_takes_largest_square() {
        assert_eq!(fit_frame(80, 24, PixelRequest::Auto).unwrap(), FrameSize::new(24, 48));
        assert_eq!(fit_frame(30, 24, PixelRequest::Auto).unwrap(), FrameSize::new(15, 30));
    }

    #[test]
    fn fixed_request_within_bounds() {
        assert_eq!(fit_frame(80, 24, PixelRequest::Fixed(10)).unwrap(), FrameSize::new(10, 20));
        assert_eq!(fit_frame(80, 24, PixelRequest::Fixed(24)).unwrap(), FrameSize::new(24, 48));
    }

    #[test]
    fn oversized_request_fails() {
        let err = fit_frame(80, 24, PixelRequest::Fixed(25)).unwrap_err();
        assert!(matches!(
            err,
            DonutError::DisplaySizeExceeded { requested: 25, available: 24 }
        ));
        assert!(fit_frame(1, 24, PixelRequest::Auto).is_err());
    }

    #[test]
    fn counter_format() {
        assert_eq!(frame_counter(0, Some(500)), "1/500");
        assert_eq!(frame_counter(41, None), "42");
    }

    #[test]
    fn print_display_writes_counter_then_rows() {
        let mut display = PrintDisplay::new(Vec::new(), 80, 24);
        let size = display.init(PixelRequest::Fixed(2)).unwrap();
        let mut grid = PixelGrid::new(size);
        grid.blend_max(1, 0, 1.0);
        let frame = Frame::from_grid(&grid, &GlyphPalette::default());
        display.write(&frame, 2, Some(3)).unwrap();
        display.restore().unwrap();
        display.restore().unwrap();
        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text, "3/3\n\n@\n");
    }

    #[test]
    fn print_display_follows_cancel_flag() {
        let flag = CancelFlag::new();
        let mut display = PrintDisplay::new(Vec::new(), 80, 24).with_cancel(flag.clone());
        assert!(!display.interrupted().unwrap());
        flag.cancel();
        assert!(display.interrupted().unwrap());
        assert!(flag.is_cancelled());
    }
}
