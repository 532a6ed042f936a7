//! Synthetic test-pattern source.
//!
//! Always has a frame ready. The pattern drifts every frame and jumps to
//! a new "scene" every fifty frames, so downstream consumers see content
//! that actually changes over time.

use anyhow::Result;

use super::{ObserverId, ObserverSet};
use crate::frame::{PixelFormat, VideoFrame};
use crate::source::{FrameObserver, FrameSource};

const SCENE_LENGTH_FRAMES: u64 = 50;

/// Configuration for a synthetic source.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            format: PixelFormat::I420,
        }
    }
}

/// Counters exposed for demos and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntheticStats {
    pub frames_generated: u64,
    pub frames_notified: u64,
}

/// A pull-style source that generates a deterministic test pattern and
/// owns its observer list.
pub struct SyntheticSource {
    config: SyntheticConfig,
    observers: ObserverSet,
    frame_count: u64,
    scene_state: u8,
    stats: SyntheticStats,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Result<Self> {
        // Validate dimensions up front so fetch_frame cannot fail later.
        config.format.frame_len(config.width, config.height)?;
        Ok(Self {
            config,
            observers: ObserverSet::new(),
            frame_count: 0,
            scene_state: 0,
            stats: SyntheticStats::default(),
        })
    }

    pub fn attach(&mut self, observer: Box<dyn FrameObserver + Send>) -> ObserverId {
        self.observers.attach(observer)
    }

    pub fn detach(&mut self, id: ObserverId) -> bool {
        self.observers.detach(id)
    }

    pub fn stats(&self) -> SyntheticStats {
        self.stats
    }
}

impl FrameSource for SyntheticSource {
    fn fetch_frame(&mut self, frame: &mut VideoFrame) -> bool {
        self.frame_count += 1;
        if self.frame_count % SCENE_LENGTH_FRAMES == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let count = self.frame_count;
        let scene = self.scene_state;
        let filled = frame.overwrite_with(
            self.config.format,
            self.config.width,
            self.config.height,
            |buf| {
                for (i, byte) in buf.iter_mut().enumerate() {
                    *byte = ((i as u64 + count + scene as u64) % 256) as u8;
                }
            },
        );
        // Dimensions were validated in new(); a failure here means the
        // config was mutated out from under us, which cannot happen.
        debug_assert!(filled.is_ok());
        if filled.is_err() {
            return false;
        }
        self.stats.frames_generated += 1;
        true
    }

    fn notify(&mut self, frame: &VideoFrame) {
        self.stats.frames_notified += 1;
        self.observers.notify_all(frame);
    }
}
