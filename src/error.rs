use std::io;
use thiserror::Error;

/// Everything that can stop a donut run early.
#[derive(Debug, Error)]
pub enum DonutError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("image size exceeds console size ({requested} rows requested, {available} available)")]
    DisplaySizeExceeded { requested: u16, available: u16 },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("render failure: {0}")]
    Render(String),
}

impl DonutError {
    pub fn config(msg: impl Into<String>) -> Self {
        DonutError::Config(msg.into())
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DonutError::Config(_) => 2,
            _ => 1,
        }
    }
}
