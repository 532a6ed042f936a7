//! Seams between the daemon and its collaborators.
//!
//! The daemon consumes exactly two capabilities from the source it is
//! bound to: "fill this buffer with the newest frame" and "push this
//! buffer to your observers". Observer bookkeeping (attach/detach,
//! fan-out order) lives entirely inside source implementations; the
//! daemon never sees individual listeners.

use crate::frame::VideoFrame;

/// A pull-style frame provider that also owns its notification channel.
pub trait FrameSource {
    /// Try to fill `frame` with the newest available frame, overwriting
    /// it in place. Returns whether a frame was obtained. An empty fetch
    /// is not an error; the caller just waits for the next tick.
    fn fetch_frame(&mut self, frame: &mut VideoFrame) -> bool;

    /// Push a populated frame to every currently attached observer.
    fn notify(&mut self, frame: &VideoFrame);
}

/// The listener side of the push channel.
pub trait FrameObserver {
    fn on_frame(&mut self, frame: &VideoFrame);
}
