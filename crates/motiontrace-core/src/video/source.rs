use crate::error::Result;

use super::frame::Frame;

/// An ordered, finite, lazily-decoded sequence of frames.
pub trait FrameSource {
    /// Frames per second reported by the stream.
    fn fps(&self) -> f64;

    /// Total number of frames, if the container reports it.
    fn frame_count(&self) -> Option<u64>;

    /// Decode the next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}
