use clap::Parser;
use flying_donut::colors::ColorScheme;
use flying_donut::display::{CancelFlag, PrintDisplay};
use flying_donut::settings::{DonutSettings, Settings};
use flying_donut::terminal::Terminal;
use flying_donut::{Animation, Axis, DonutConfig, DonutError, RunOutcome};
use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flying-donut")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal-based ASCII art: a lit, rotating 3D donut", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Tube radius
    #[arg(long)]
    radius: Option<f64>,

    /// Donut radius as a multiple of the tube radius
    #[arg(long)]
    ratio: Option<f64>,

    /// Samples around the tube
    #[arg(long)]
    theta: Option<usize>,

    /// Samples around the donut
    #[arg(long)]
    phi: Option<usize>,

    /// First rotation axis
    #[arg(long, value_enum)]
    axis_a: Option<Axis>,

    /// Second rotation axis
    #[arg(long, value_enum)]
    axis_b: Option<Axis>,

    /// Initial angle about the first axis (radians)
    #[arg(long)]
    start_a: Option<f64>,

    /// Initial angle about the second axis (radians)
    #[arg(long)]
    start_b: Option<f64>,

    /// Rotation speed
    #[arg(short, long)]
    speed: Option<f64>,

    /// Second axis speed relative to the first
    #[arg(long)]
    speed_ratio: Option<f64>,

    /// Light position as x,y,z
    #[arg(short, long, value_parser = parse_light, allow_hyphen_values = true)]
    light: Option<[f64; 3]>,

    /// Frame height in characters (0 or less autoscales)
    #[arg(short, long)]
    pixels: Option<i32>,

    /// Zoom factor
    #[arg(short, long)]
    zoom: Option<f64>,

    /// Number of frames to render
    #[arg(short, long)]
    frames: Option<u64>,

    /// Render until interrupted
    #[arg(short, long)]
    infinite: bool,

    /// Glyph palette: classic, extended, blocks, or literal characters darkest first
    #[arg(short = 'c', long)]
    palette: Option<String>,

    /// Color scheme
    #[arg(long, value_enum)]
    color: Option<ColorScheme>,

    /// Delay between frames in seconds
    #[arg(short, long)]
    delay: Option<f32>,

    /// Print frames to stdout (no interactive display)
    #[arg(long)]
    print: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log per-frame statistics
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Command-line values in the same shape as the settings file.
    fn overrides(&self) -> DonutSettings {
        DonutSettings {
            radius: self.radius,
            ratio: self.ratio,
            theta: self.theta,
            phi: self.phi,
            axis_a: self.axis_a,
            axis_b: self.axis_b,
            start_a: self.start_a,
            start_b: self.start_b,
            speed: self.speed,
            speed_ratio: self.speed_ratio,
            light: self.light,
            pixels: self.pixels,
            zoom: self.zoom,
            frames: self.frames,
            infinite: self.infinite.then_some(true),
            palette: self.palette.clone(),
            colors: self.color,
            delay: self.delay,
        }
    }
}

fn parse_light(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", s));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not a number", part))?;
    }
    Ok(out)
}

fn init_logging(log_file: Option<&Path>, debug: bool) -> io::Result<()> {
    let default = if debug { "flying_donut=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Raise `cancel` on SIGINT so the frame loop stops and the display is restored.
fn install_interrupt_handler(cancel: &CancelFlag) {
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.cancel()) {
        tracing::warn!(error = %e, "cannot install SIGINT handler");
    }
}

fn run(config: DonutConfig, print: bool, cancel: CancelFlag) -> Result<RunOutcome, DonutError> {
    let mut animation = Animation::new(config.clone())?;
    if print {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut display = PrintDisplay::new(stdout().lock(), cols, rows).with_cancel(cancel);
        animation.run(&mut display)
    } else {
        let mut display = Terminal::new(config.colors).with_cancel(cancel);
        animation.run(&mut display)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref(), cli.debug) {
        eprintln!("Cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let config = DonutConfig::default()
        .with_settings(&settings.donut)
        .and_then(|c| c.with_settings(&cli.overrides()))
        .map(|c| DonutConfig {
            debug: cli.debug,
            ..c
        });

    let cancel = CancelFlag::new();
    install_interrupt_handler(&cancel);

    let result = config.and_then(|c| run(c, cli.print, cancel));
    match result {
        Ok(outcome) => {
            if outcome.cancelled {
                println!("Rendering has been interrupted.");
            }
            ExitCode::SUCCESS
        }
        Err(DonutError::DisplaySizeExceeded { .. }) => {
            println!("ERROR!");
            println!("Image size exceeds console size.");
            println!("Please decrease pixels number or widen console.");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
