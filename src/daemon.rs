//! The broadcast daemon.
//!
//! `BroadcastDaemon` adapts a pull-style `FrameSource` into a push-style
//! observable: once started it polls the source on a fixed tick and, when
//! a frame is available, republishes it through the source's own
//! notification channel. One daemon owns at most one worker thread; the
//! caller's thread and that worker are the only two threads involved.
//!
//! Shutdown is cooperative. The worker re-checks an atomic running flag
//! once per tick, and `stop` blocks until the worker has exited, so a
//! fetch+notify pair can never outlive the daemon that scheduled it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::DaemonError;
use crate::frame::{PixelFormat, VideoFrame};
use crate::source::FrameSource;

/// Polls a bound frame source at a caller-specified cadence and fans the
/// frames out through the source's observers.
///
/// The daemon holds only a weak handle to its source: the caller keeps the
/// source alive, the daemon borrows it for the duration of each broadcast.
/// Binding is set once at construction and immutable afterwards.
pub struct BroadcastDaemon<S> {
    source: Weak<Mutex<S>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<S: FrameSource + Send + 'static> BroadcastDaemon<S> {
    /// Bind a daemon to a frame source. Fails if the weak handle is
    /// already dead; never starts the broadcast loop.
    pub fn bind(source: Weak<Mutex<S>>) -> Result<Self, DaemonError> {
        if source.upgrade().is_none() {
            return Err(DaemonError::SourceUnbound);
        }
        Ok(Self {
            source,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    /// Start broadcasting at `frame_rate` frames per second.
    ///
    /// The inter-frame sleep is computed once here and never adjusted for
    /// time spent fetching or notifying, so the effective rate runs
    /// slightly below target under load. See [`tick_interval`].
    pub fn start(&mut self, frame_rate: f64) -> Result<(), DaemonError> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(DaemonError::InvalidRate(frame_rate));
        }
        if self.worker.is_some() {
            return Err(DaemonError::AlreadyRunning);
        }
        let source = self.source.upgrade().ok_or(DaemonError::SourceUnbound)?;

        let interval = tick_interval(frame_rate);
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        self.worker = Some(std::thread::spawn(move || {
            broadcast_loop(source, running, interval);
        }));
        log::debug!(
            "broadcast started at {} fps (tick {:?})",
            frame_rate,
            interval
        );
        Ok(())
    }

    /// Stop the current broadcast and wait for the worker to exit.
    ///
    /// Clearing the running flag happens under the source mutex, so a
    /// stop can only interleave between fetch+notify pairs, never split
    /// one. The mutex is released before joining; holding it across the
    /// join would deadlock a worker that is about to lock.
    pub fn stop(&mut self) -> Result<(), DaemonError> {
        let worker = self.worker.take().ok_or(DaemonError::NotRunning)?;
        if let Some(source) = self.source.upgrade() {
            let _guard = source.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.running.store(false, Ordering::SeqCst);
        } else {
            self.running.store(false, Ordering::SeqCst);
        }
        worker.join().map_err(|_| DaemonError::WorkerPanicked)?;
        log::debug!("broadcast stopped");
        Ok(())
    }

    /// Whether a broadcast loop is currently live.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl<S> Drop for BroadcastDaemon<S> {
    fn drop(&mut self) {
        // The daemon must never be destroyed while its loop is executing.
        if let Some(worker) = self.worker.take() {
            self.running.store(false, Ordering::SeqCst);
            let _ = worker.join();
        }
    }
}

/// Fixed inter-frame sleep for a target rate: `1000 / frame_rate`
/// milliseconds, truncated toward zero at microsecond granularity.
///
/// Kept as its own step so a drift-compensating scheduler could replace
/// the computation without touching the loop.
fn tick_interval(frame_rate: f64) -> Duration {
    let sleep_ms = 1000.0 / frame_rate;
    Duration::from_micros((sleep_ms * 1000.0) as u64)
}

fn broadcast_loop<S: FrameSource>(
    source: Arc<Mutex<S>>,
    running: Arc<AtomicBool>,
    interval: Duration,
) {
    // One reusable buffer for the whole broadcast; sources overwrite it
    // in place. Format fixed at loop start.
    let mut frame = VideoFrame::empty(PixelFormat::I420);
    while running.load(Ordering::SeqCst) {
        {
            let mut source = source
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if source.fetch_frame(&mut frame) {
                source.notify(&frame);
            }
            // An empty fetch is skipped silently; wait for the next tick.
        }
        std::thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSource;

    impl FrameSource for NullSource {
        fn fetch_frame(&mut self, _frame: &mut VideoFrame) -> bool {
            false
        }

        fn notify(&mut self, _frame: &VideoFrame) {}
    }

    fn bound_daemon() -> (Arc<Mutex<NullSource>>, BroadcastDaemon<NullSource>) {
        let source = Arc::new(Mutex::new(NullSource));
        let daemon = BroadcastDaemon::bind(Arc::downgrade(&source)).expect("bind");
        (source, daemon)
    }

    #[test]
    fn bind_rejects_dead_source() {
        let source = Arc::new(Mutex::new(NullSource));
        let weak = Arc::downgrade(&source);
        drop(source);
        assert!(matches!(
            BroadcastDaemon::bind(weak),
            Err(DaemonError::SourceUnbound)
        ));
    }

    #[test]
    fn bind_accepts_live_source() {
        let (_source, daemon) = bound_daemon();
        assert!(!daemon.is_running());
    }

    #[test]
    fn start_rejects_zero_and_negative_rates() {
        let (_source, mut daemon) = bound_daemon();
        assert!(matches!(
            daemon.start(0.0),
            Err(DaemonError::InvalidRate(_))
        ));
        assert!(matches!(
            daemon.start(-5.0),
            Err(DaemonError::InvalidRate(_))
        ));
        assert!(matches!(
            daemon.start(f64::NAN),
            Err(DaemonError::InvalidRate(_))
        ));
        assert!(!daemon.is_running());
    }

    #[test]
    fn double_start_fails_fast() {
        let (_source, mut daemon) = bound_daemon();
        daemon.start(50.0).expect("first start");
        assert!(matches!(
            daemon.start(50.0),
            Err(DaemonError::AlreadyRunning)
        ));
        daemon.stop().expect("stop");
    }

    #[test]
    fn stop_without_start_is_not_running() {
        let (_source, mut daemon) = bound_daemon();
        assert!(matches!(daemon.stop(), Err(DaemonError::NotRunning)));
    }

    #[test]
    fn start_after_stop_succeeds() {
        let (_source, mut daemon) = bound_daemon();
        daemon.start(100.0).expect("start");
        daemon.stop().expect("stop");
        daemon.start(100.0).expect("restart");
        daemon.stop().expect("stop again");
    }

    #[test]
    fn start_fails_when_source_dropped_after_bind() {
        let (source, mut daemon) = bound_daemon();
        drop(source);
        assert!(matches!(
            daemon.start(10.0),
            Err(DaemonError::SourceUnbound)
        ));
    }

    #[test]
    fn tick_interval_truncates_toward_zero() {
        // 30 fps -> 33.333... ms -> 33333 whole microseconds.
        assert_eq!(tick_interval(30.0), Duration::from_micros(33_333));
        assert_eq!(tick_interval(10.0), Duration::from_micros(100_000));
        // 7 fps -> 142.857... ms -> 142857 us, fractional part dropped.
        assert_eq!(tick_interval(7.0), Duration::from_micros(142_857));
    }

    #[test]
    fn drop_while_running_joins_worker() {
        let (_source, mut daemon) = bound_daemon();
        daemon.start(200.0).expect("start");
        drop(daemon);
        // Nothing to assert directly; reaching here without a hang is the
        // property under test.
    }
}
