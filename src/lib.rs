//! A lit, rotating donut drawn as ASCII art in the terminal.
//!
//! The pipeline per frame: rotate the sampled torus ([`geom`]), shade it
//! against a point light, project it orthographically onto a character grid
//! and quantize the grid into glyphs ([`render`]). [`animation`] drives that
//! pipeline against any [`display::Display`].

pub mod animation;
pub mod colors;
pub mod config;
pub mod display;
pub mod error;
pub mod geom;
pub mod render;
pub mod settings;
pub mod terminal;

pub use animation::{Animation, Phase, RunOutcome};
pub use config::{Axis, DonutConfig, PixelRequest};
pub use error::DonutError;
