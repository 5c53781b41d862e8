//! Animation playback state machine
//!
//! ```text
//!            start()               sequence ends (no loop)
//!   Idle ─────────────► Playing ───────────────────────────► Finished
//!    ▲                   │  ▲ │                                 │
//!    │      stop()       │  │ │ duration elapsed                │
//!    └───────────────────┘  └─┘ (advance, or rewind if looping) │
//!    ▲                                                          │
//!    └──────────────────────────── stop() ──────────────────────┘
//! ```
//!
//! Time is supplied by the caller through [`AnimationPlayer::poll`]. A frame
//! change happens once the accumulated time reaches the current frame's
//! duration; the accumulator then restarts from zero, so any overshoot is
//! dropped rather than carried into the next frame.

use core::time::Duration;

use super::Animation;
use crate::framebuffer::FrameBuffer;

/// Coarse player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerState {
    /// No animation loaded
    #[default]
    Idle,
    /// A frame is on screen and time is accumulating
    Playing,
    /// A non-looping sequence ran out of frames
    Finished,
}

/// What a single [`AnimationPlayer::poll`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Nothing is playing, the call had no effect
    Inactive,
    /// Current frame is still within its duration
    Holding,
    /// The next frame was drawn
    Advanced,
    /// The sequence wrapped and its first frame was drawn
    Rewound,
    /// The sequence ended; the last frame stays in the buffer
    Finished,
}

impl PollOutcome {
    /// Whether the frame buffer changed and should be pushed
    pub const fn needs_push(self) -> bool {
        matches!(self, PollOutcome::Advanced | PollOutcome::Rewound)
    }
}

/// Plays an [`Animation`] into a [`FrameBuffer`]
///
/// The player borrows the animation for the duration of playback and never
/// owns frame data; frames are drawn at the buffer origin as they are pulled.
pub struct AnimationPlayer<'a> {
    animation: Option<&'a mut dyn Animation>,
    looping: bool,
    /// Duration of the frame on screen, `None` once the sequence ended
    current: Option<Duration>,
    elapsed: Duration,
}

impl<'a> AnimationPlayer<'a> {
    /// Create an idle player
    pub const fn new() -> Self {
        Self {
            animation: None,
            looping: false,
            current: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Begin playing `animation` from its first frame
    ///
    /// The first frame is drawn over the current contents of `canvas`
    /// immediately; pixels it does not cover are left alone. Returns `false`
    /// if the sequence is empty, in which case nothing is loaded and the
    /// player stays [`PlayerState::Idle`].
    pub fn start(
        &mut self,
        animation: &'a mut dyn Animation,
        looping: bool,
        canvas: &mut FrameBuffer,
    ) -> bool {
        animation.rewind();
        self.elapsed = Duration::ZERO;
        self.looping = looping;
        self.current = draw_frame(animation, canvas, false);
        self.animation = self.current.map(|_| animation);
        self.current.is_some()
    }

    /// Stop playback and release the animation
    ///
    /// The frame buffer keeps whatever was last drawn.
    pub fn stop(&mut self) {
        self.animation = None;
        self.current = None;
        self.elapsed = Duration::ZERO;
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        match (&self.animation, self.current) {
            (None, _) => PlayerState::Idle,
            (Some(_), Some(_)) => PlayerState::Playing,
            (Some(_), None) => PlayerState::Finished,
        }
    }

    /// Whether a frame is on screen and accumulating time
    pub fn is_playing(&self) -> bool {
        self.state() == PlayerState::Playing
    }

    /// Time accumulated against the current frame
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance playback by `elapsed`
    ///
    /// At most one frame change happens per call, however large `elapsed`
    /// is.
    pub fn poll(&mut self, elapsed: Duration, canvas: &mut FrameBuffer) -> PollOutcome {
        let Some(duration) = self.current else {
            return PollOutcome::Inactive;
        };
        let Some(animation) = self.animation.as_deref_mut() else {
            return PollOutcome::Inactive;
        };

        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed < duration {
            return PollOutcome::Holding;
        }
        self.elapsed = Duration::ZERO;

        if let Some(next) = draw_frame(animation, canvas, true) {
            self.current = Some(next);
            return PollOutcome::Advanced;
        }

        if !self.looping {
            self.current = None;
            return PollOutcome::Finished;
        }

        animation.rewind();
        self.current = draw_frame(animation, canvas, true);
        match self.current {
            Some(_) => PollOutcome::Rewound,
            None => PollOutcome::Finished,
        }
    }
}

impl Default for AnimationPlayer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the next frame and draw it at the origin, clearing first if asked
///
/// Returns the frame's duration, or `None` (canvas untouched) at the end of
/// the sequence.
fn draw_frame(
    animation: &mut dyn Animation,
    canvas: &mut FrameBuffer,
    clear: bool,
) -> Option<Duration> {
    let width = animation.width();
    let height = animation.height();
    let frame = animation.next_frame()?;
    if clear {
        canvas.clear();
    }
    canvas.draw_bitmap(0, 0, width, height, frame.data);
    Some(frame.duration)
}
