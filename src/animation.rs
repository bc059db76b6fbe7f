//! Frame loop: build the scene, then rotate, render and display frame after
//! frame until the budget runs out or the user stops it.
//!
//! The display is restored exactly once on every exit path, including
//! early errors and panics, by a guard that owns the borrow of the display.

use crate::config::DonutConfig;
use crate::display::Display;
use crate::error::DonutError;
use crate::render::Scene;
use std::io;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tracing::{debug, info};

/// Where the frame loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initializing,
    Rendering,
    Terminating,
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub frames_rendered: u64,
    pub cancelled: bool,
}

/// Restores the display when dropped unless [`RestoreGuard::finish`] did.
struct RestoreGuard<'a, D: Display + ?Sized> {
    display: &'a mut D,
    armed: bool,
}

impl<'a, D: Display + ?Sized> RestoreGuard<'a, D> {
    fn new(display: &'a mut D) -> Self {
        Self {
            display,
            armed: true,
        }
    }

    fn finish(mut self) -> io::Result<()> {
        self.armed = false;
        self.display.restore()
    }
}

impl<D: Display + ?Sized> Deref for RestoreGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.display
    }
}

impl<D: Display + ?Sized> DerefMut for RestoreGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.display
    }
}

impl<D: Display + ?Sized> Drop for RestoreGuard<'_, D> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.display.restore();
        }
    }
}

pub struct Animation {
    config: DonutConfig,
    phase: Phase,
}

impl Animation {
    /// Configuration errors surface here, before any display work.
    pub fn new(config: DonutConfig) -> Result<Self, DonutError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }

    /// Drive `display` through the whole run.
    pub fn run<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<RunOutcome, DonutError> {
        let mut guard = RestoreGuard::new(display);

        self.enter(Phase::Initializing);
        let result = self.init_and_render(&mut *guard);

        self.enter(Phase::Terminating);
        let restored = guard.finish();
        let outcome = result?;
        restored?;

        info!(
            frames = outcome.frames_rendered,
            cancelled = outcome.cancelled,
            "animation finished"
        );
        Ok(outcome)
    }

    fn init_and_render<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
    ) -> Result<RunOutcome, DonutError> {
        let mut scene = Scene::new(&self.config)?;
        let frame_size = display.init(self.config.pixels)?;
        info!(
            points = scene.surface().len(),
            height = frame_size.height,
            width = frame_size.width,
            "initialized"
        );

        self.enter(Phase::Rendering);
        let total = self.config.frames;
        let delay = self.config.frame_delay;
        let mut index: u64 = 0;

        while total.map_or(true, |t| index < t) {
            if display.interrupted()? {
                info!(frame = index, "rendering interrupted");
                return Ok(RunOutcome {
                    frames_rendered: index,
                    cancelled: true,
                });
            }

            scene.advance();
            let rendered = scene.render(frame_size)?;
            if self.config.debug {
                debug!(
                    frame = index,
                    lit = rendered.lit,
                    covered = rendered.grid.covered(),
                    peak = rendered.grid.peak(),
                    "frame stats"
                );
            }
            display.write(&rendered.frame, index, total)?;

            index += 1;
            if delay > 0.0 {
                std::thread::sleep(Duration::from_secs_f32(delay));
            }
        }

        Ok(RunOutcome {
            frames_rendered: index,
            cancelled: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixelRequest;
    use crate::display::fit_frame;
    use crate::render::glyph::Frame;
    use crate::render::raster::FrameSize;

    /// Counts calls and stops after `stop_after` frames if set.
    #[derive(Default)]
    struct Recorder {
        inits: usize,
        writes: Vec<u64>,
        restores: usize,
        stop_after: Option<u64>,
        fail_write: bool,
    }

    impl Display for Recorder {
        fn init(&mut self, request: PixelRequest) -> Result<FrameSize, DonutError> {
            self.inits += 1;
            fit_frame(40, 10, request)
        }

        fn write(&mut self, _frame: &Frame, index: u64, _total: Option<u64>) -> io::Result<()> {
            if self.fail_write {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            self.writes.push(index);
            Ok(())
        }

        fn restore(&mut self) -> io::Result<()> {
            self.restores += 1;
            Ok(())
        }

        fn interrupted(&mut self) -> io::Result<bool> {
            Ok(self.stop_after == Some(self.writes.len() as u64))
        }
    }

    fn config(frames: Option<u64>) -> DonutConfig {
        DonutConfig {
            n_theta: 8,
            n_phi: 16,
            pixels: PixelRequest::Fixed(8),
            frames,
            frame_delay: 0.0,
            ..DonutConfig::default()
        }
    }

    #[test]
    fn renders_every_frame_then_restores() {
        let mut display = Recorder::default();
        let mut anim = Animation::new(config(Some(5))).unwrap();
        assert_eq!(anim.phase(), Phase::Idle);
        let outcome = anim.run(&mut display).unwrap();
        assert_eq!(outcome, RunOutcome { frames_rendered: 5, cancelled: false });
        assert_eq!(display.writes, vec![0, 1, 2, 3, 4]);
        assert_eq!(display.inits, 1);
        assert_eq!(display.restores, 1);
        assert_eq!(anim.phase(), Phase::Terminating);
    }

    #[test]
    fn cancellation_stops_early() {
        let mut display = Recorder {
            stop_after: Some(3),
            ..Recorder::default()
        };
        let outcome = Animation::new(config(Some(100))).unwrap().run(&mut display).unwrap();
        assert!(outcome.cancelled);
        assert_eq!(outcome.frames_rendered, 3);
        assert_eq!(display.writes.len(), 3);
        assert_eq!(display.restores, 1);
    }

    #[test]
    fn infinite_run_ends_on_cancel() {
        let mut display = Recorder {
            stop_after: Some(7),
            ..Recorder::default()
        };
        let outcome = Animation::new(config(None)).unwrap().run(&mut display).unwrap();
        assert_eq!(outcome.frames_rendered, 7);
        assert!(outcome.cancelled);
    }

    #[test]
    fn oversized_frame_restores_and_fails() {
        let mut display = Recorder::default();
        let cfg = DonutConfig {
            pixels: PixelRequest::Fixed(50),
            ..config(Some(5))
        };
        let err = Animation::new(cfg).unwrap().run(&mut display).unwrap_err();
        assert!(matches!(err, DonutError::DisplaySizeExceeded { .. }));
        assert!(display.writes.is_empty());
        assert_eq!(display.restores, 1);
    }

    #[test]
    fn write_failure_restores_and_propagates() {
        let mut display = Recorder {
            fail_write: true,
            ..Recorder::default()
        };
        let err = Animation::new(config(Some(5))).unwrap().run(&mut display).unwrap_err();
        assert!(matches!(err, DonutError::Io(_)));
        assert_eq!(display.restores, 1);
    }

    #[test]
    fn bad_config_never_touches_display() {
        let cfg = DonutConfig {
            n_theta: 0,
            ..config(Some(5))
        };
        assert!(matches!(Animation::new(cfg), Err(DonutError::Config(_))));
    }
}
