//! Sample frame providers.
//!
//! The daemon core never implements capture or observer storage; these
//! live in source implementations. This module ships the providers the
//! crate itself needs:
//! - `SyntheticSource`: an always-ready test-pattern generator, so the
//!   daemon can be demonstrated and tested without hardware.
//! - `ObserverSet`: the attach/detach/fan-out bookkeeping any push-style
//!   source can embed.

mod synthetic;

pub use synthetic::{SyntheticConfig, SyntheticSource, SyntheticStats};

use crate::frame::VideoFrame;
use crate::source::FrameObserver;

/// Handle returned by `ObserverSet::attach`, used to detach later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObserverId(u64);

/// Ordered set of attached observers with stable detach handles.
///
/// Fan-out runs observers in attach order on the notifying thread; a slow
/// observer delays the whole tick, which is the source's contract, not the
/// daemon's.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<(ObserverId, Box<dyn FrameObserver + Send>)>,
    next_id: u64,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: Box<dyn FrameObserver + Send>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Detach a previously attached observer. Returns whether it was
    /// still attached.
    pub fn detach(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(attached, _)| *attached != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver one frame to every attached observer, in attach order.
    pub fn notify_all(&mut self, frame: &VideoFrame) {
        for (_, observer) in &mut self.observers {
            observer.on_frame(frame);
        }
    }
}
