//! Snapshot-saving observer.
//!
//! `SnapshotSaver` writes the first N frames it receives to disk as JPEG
//! images and ignores everything after that. It is a sample consumer for
//! demos and smoke tests, not part of the daemon core.
//!
//! Observers have no error channel back to the broadcast loop, so I/O
//! failures are logged and absorbed here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::ExtendedColorType;

use crate::frame::{PixelFormat, VideoFrame};
use crate::source::FrameObserver;

pub struct SnapshotSaver {
    dir: PathBuf,
    max_snapshots: usize,
    saved: usize,
}

impl SnapshotSaver {
    /// Save up to `max_snapshots` frames into `dir` as
    /// `snapshot-<n>.jpg`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>, max_snapshots: usize) -> Self {
        Self {
            dir: dir.into(),
            max_snapshots,
            saved: 0,
        }
    }

    /// Number of snapshots written so far.
    pub fn saved(&self) -> usize {
        self.saved
    }

    fn save(&self, frame: &VideoFrame) -> Result<()> {
        let path = self.dir.join(format!("snapshot-{}.jpg", self.saved));
        match frame.format() {
            PixelFormat::I420 => {
                // Encode the luma plane only; chroma is dropped.
                let luma_len = frame.width() as usize * frame.height() as usize;
                image::save_buffer(
                    &path,
                    &frame.data()[..luma_len],
                    frame.width(),
                    frame.height(),
                    ExtendedColorType::L8,
                )
            }
            PixelFormat::Bgra => {
                let rgb = bgra_to_rgb(frame.data());
                image::save_buffer(
                    &path,
                    &rgb,
                    frame.width(),
                    frame.height(),
                    ExtendedColorType::Rgb8,
                )
            }
        }
        .with_context(|| format!("writing {}", path.display()))
    }
}

impl FrameObserver for SnapshotSaver {
    fn on_frame(&mut self, frame: &VideoFrame) {
        if self.saved >= self.max_snapshots || !frame.is_valid() {
            return;
        }
        match self.save(frame) {
            Ok(()) => {
                log::info!(
                    "saved snapshot {} ({}x{})",
                    self.saved,
                    frame.width(),
                    frame.height()
                );
                self.saved += 1;
            }
            Err(err) => log::warn!("snapshot dropped: {err:#}"),
        }
    }
}

fn bgra_to_rgb(bgra: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bgra.len() / 4 * 3);
    for px in bgra.chunks_exact(4) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    rgb
}
