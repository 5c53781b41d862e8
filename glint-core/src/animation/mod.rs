//! Animation sequences and playback
//!
//! An [`Animation`] is a finite, restartable, pull-based sequence of timed
//! frames. The [`AnimationPlayer`] borrows one and advances it from
//! externally supplied elapsed time.

pub mod player;
pub mod sequence;

pub use player::{AnimationPlayer, PlayerState, PollOutcome};
pub use sequence::FrameSequence;

use core::time::Duration;

/// One timed image in an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame<'a> {
    /// Row-major monochrome intensities, `width * height` long
    pub data: &'a [u8],
    /// How long the frame stays on screen
    pub duration: Duration,
}

impl<'a> AnimationFrame<'a> {
    /// Create a frame
    pub const fn new(data: &'a [u8], duration: Duration) -> Self {
        Self { data, duration }
    }

    /// Create a frame with a duration in milliseconds
    pub const fn from_millis(data: &'a [u8], millis: u64) -> Self {
        Self::new(data, Duration::from_millis(millis))
    }
}

/// A finite, restartable sequence of frames
///
/// Frames are pulled one at a time; `None` marks the end of the sequence
/// until [`Animation::rewind`] is called.
pub trait Animation {
    /// Frame width in pixels (fixed for the whole sequence)
    fn width(&self) -> usize;

    /// Frame height in pixels (fixed for the whole sequence)
    fn height(&self) -> usize;

    /// Pull the next frame, or `None` when the sequence is exhausted
    fn next_frame(&mut self) -> Option<AnimationFrame<'_>>;

    /// Restart from the first frame
    fn rewind(&mut self);
}
