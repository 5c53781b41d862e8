//! Slice-backed animation

use super::{Animation, AnimationFrame};

/// An [`Animation`] over a borrowed slice of frames
///
/// Keeps an index cursor; the frames themselves are never copied.
#[derive(Debug, Clone)]
pub struct FrameSequence<'a> {
    width: usize,
    height: usize,
    frames: &'a [AnimationFrame<'a>],
    cursor: usize,
}

impl<'a> FrameSequence<'a> {
    /// Create a sequence of `width` x `height` frames
    pub const fn new(width: usize, height: usize, frames: &'a [AnimationFrame<'a>]) -> Self {
        Self {
            width,
            height,
            frames,
            cursor: 0,
        }
    }

    /// Number of frames in the sequence
    pub const fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames
    pub const fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame the next pull will return
    pub const fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Animation for FrameSequence<'a> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn next_frame(&mut self) -> Option<AnimationFrame<'_>> {
        let frame = self.frames.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(frame)
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}
