//! Configuration for the castd runner.
//!
//! Layering: built-in defaults, then an optional TOML file named by
//! `FRAMECAST_CONFIG`, then `FRAMECAST_*` environment overrides, then a
//! final validation pass. CLI flags are applied on top by the binary.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::frame::PixelFormat;

const DEFAULT_FRAME_RATE: f64 = 10.0;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_RUN_SECONDS: u64 = 5;
const DEFAULT_OUT_DIR: &str = "castd_out";
const DEFAULT_SNAPSHOTS: usize = 3;

#[derive(Debug, Deserialize, Default)]
struct CastdConfigFile {
    frame_rate: Option<f64>,
    run_seconds: Option<u64>,
    source: Option<SourceConfigFile>,
    snapshots: Option<SnapshotConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    format: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SnapshotConfigFile {
    out_dir: Option<PathBuf>,
    count: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CastdConfig {
    pub frame_rate: f64,
    pub run_seconds: u64,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub out_dir: PathBuf,
    pub snapshot_count: usize,
}

impl CastdConfig {
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("FRAMECAST_CONFIG").ok().as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => CastdConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg)?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: CastdConfigFile) -> Result<Self> {
        let source = file.source.unwrap_or_default();
        let snapshots = file.snapshots.unwrap_or_default();
        Ok(Self {
            frame_rate: file.frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
            run_seconds: file.run_seconds.unwrap_or(DEFAULT_RUN_SECONDS),
            width: source.width.unwrap_or(DEFAULT_WIDTH),
            height: source.height.unwrap_or(DEFAULT_HEIGHT),
            format: match source.format.as_deref() {
                None => PixelFormat::I420,
                Some(name) => parse_format(name)?,
            },
            out_dir: snapshots
                .out_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            snapshot_count: snapshots.count.unwrap_or(DEFAULT_SNAPSHOTS),
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(fps) = std::env::var("FRAMECAST_FPS") {
            self.frame_rate = fps
                .parse()
                .with_context(|| format!("FRAMECAST_FPS '{fps}' is not a number"))?;
        }
        if let Ok(secs) = std::env::var("FRAMECAST_SECONDS") {
            self.run_seconds = secs
                .parse()
                .with_context(|| format!("FRAMECAST_SECONDS '{secs}' is not a number"))?;
        }
        if let Ok(out) = std::env::var("FRAMECAST_OUT") {
            self.out_dir = PathBuf::from(out);
        }
        if let Ok(format) = std::env::var("FRAMECAST_FORMAT") {
            self.format = parse_format(&format)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(anyhow!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            ));
        }
        // Also catches zero or odd I420 dimensions.
        self.format.frame_len(self.width, self.height)?;
        Ok(())
    }
}

fn parse_format(name: &str) -> Result<PixelFormat> {
    match name.to_ascii_lowercase().as_str() {
        "i420" => Ok(PixelFormat::I420),
        "bgra" => Ok(PixelFormat::Bgra),
        other => Err(anyhow!("unknown pixel format '{other}' (use i420 or bgra)")),
    }
}

fn read_config_file(path: &Path) -> Result<CastdConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}
