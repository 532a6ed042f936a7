//! framecast
//!
//! A broadcast daemon that adapts pull-style video frame sources into
//! push-style observables. The daemon polls a bound source on a fixed
//! tick from a single background thread and republishes each fetched
//! frame through the source's own notification channel.
//!
//! # Module Structure
//!
//! - `daemon`: the broadcast daemon (lifecycle, worker loop)
//! - `source`: the `FrameSource`/`FrameObserver` seams
//! - `frame`: reusable frame buffer and pixel formats
//! - `sources`: sample providers (synthetic test pattern, observer set)
//! - `snapshot`: sample consumer writing frames to JPEG files
//! - `config`: layered configuration for the castd runner

pub mod config;
pub mod daemon;
pub mod error;
pub mod frame;
pub mod snapshot;
pub mod source;
pub mod sources;

pub use config::CastdConfig;
pub use daemon::BroadcastDaemon;
pub use error::{DaemonError, FrameError};
pub use frame::{PixelFormat, VideoFrame};
pub use snapshot::SnapshotSaver;
pub use source::{FrameObserver, FrameSource};
pub use sources::{ObserverId, ObserverSet, SyntheticConfig, SyntheticSource, SyntheticStats};
