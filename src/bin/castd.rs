//! castd - run a broadcast daemon over a synthetic source.
//!
//! Starts the daemon at the configured frame rate, saves the first few
//! frames as JPEG snapshots, and stops after a fixed duration or on
//! Ctrl-C, whichever comes first.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use framecast::{
    BroadcastDaemon, CastdConfig, SnapshotSaver, SyntheticConfig, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Frames per second (overrides config file and FRAMECAST_FPS).
    #[arg(long)]
    fps: Option<f64>,
    /// How long to broadcast, in seconds.
    #[arg(long)]
    seconds: Option<u64>,
    /// Output directory for snapshots.
    #[arg(long)]
    out: Option<String>,
    /// How many snapshots to save.
    #[arg(long)]
    snapshots: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = CastdConfig::load()?;
    if let Some(fps) = args.fps {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(anyhow!("--fps must be positive, got {fps}"));
        }
        cfg.frame_rate = fps;
    }
    if let Some(seconds) = args.seconds {
        cfg.run_seconds = seconds;
    }
    if let Some(out) = args.out {
        cfg.out_dir = out.into();
    }
    if let Some(snapshots) = args.snapshots {
        cfg.snapshot_count = snapshots;
    }

    fs::create_dir_all(&cfg.out_dir)?;

    let source = Arc::new(Mutex::new(SyntheticSource::new(SyntheticConfig {
        width: cfg.width,
        height: cfg.height,
        format: cfg.format,
    })?));
    {
        let mut source = source
            .lock()
            .map_err(|_| anyhow!("source lock poisoned before start"))?;
        source.attach(Box::new(SnapshotSaver::new(
            cfg.out_dir.clone(),
            cfg.snapshot_count,
        )));
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_handler = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_handler.store(true, Ordering::SeqCst);
    })?;

    let mut daemon = BroadcastDaemon::bind(Arc::downgrade(&source))?;
    daemon.start(cfg.frame_rate)?;
    log::info!(
        "broadcasting {}x{} at {} fps for {}s (snapshots in {})",
        cfg.width,
        cfg.height,
        cfg.frame_rate,
        cfg.run_seconds,
        cfg.out_dir.display()
    );

    let deadline = Instant::now() + Duration::from_secs(cfg.run_seconds);
    while Instant::now() < deadline && !interrupted.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(50));
    }

    daemon.stop()?;

    let stats = source
        .lock()
        .map_err(|_| anyhow!("source lock poisoned after stop"))?
        .stats();
    log::info!(
        "done: {} frames generated, {} notified",
        stats.frames_generated,
        stats.frames_notified
    );
    println!(
        "generated {} frames, notified {}",
        stats.frames_generated, stats.frames_notified
    );
    Ok(())
}
