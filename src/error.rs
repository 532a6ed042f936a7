//! Error kinds for daemon construction and lifecycle control.
//!
//! Failures are only visible at `bind`/`start`/`stop` time. Inside the
//! broadcast loop there is no error channel back to the caller: an empty
//! fetch is skipped, an observer failure is the observer's problem.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    /// The weak source handle is dead: the provider the daemon was meant
    /// to poll no longer exists.
    #[error("broadcast daemon is not bound to a live frame source")]
    SourceUnbound,

    /// Frame rates must be finite and strictly positive.
    #[error("invalid frame rate {0} (must be a positive number of frames per second)")]
    InvalidRate(f64),

    /// `start` was called while a broadcast loop is already live.
    #[error("broadcast already running")]
    AlreadyRunning,

    /// `stop` was called with no broadcast loop to stop.
    #[error("broadcast not running")]
    NotRunning,

    /// The worker thread panicked before it could be joined.
    #[error("broadcast worker thread panicked")]
    WorkerPanicked,
}

/// Errors from frame buffer (re)configuration.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame dimensions {width}x{height} must be non-zero")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("I420 frames need even dimensions, got {width}x{height}")]
    OddI420Dimensions { width: u32, height: u32 },

    #[error("pixel slice is {actual} bytes, format needs exactly {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
