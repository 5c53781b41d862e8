//! Built-in demo animation
//!
//! A bright column sweeping left to right with a fading trail, generated at
//! compile time for the stock 16x9 panel.

use glint_core::{AnimationFrame, FrameSequence};
use static_cell::StaticCell;

const WIDTH: usize = 16;
const HEIGHT: usize = 9;
const LEDS: usize = WIDTH * HEIGHT;

/// Intensity of the head column and the columns behind it
const TRAIL: [u8; 4] = [255, 96, 32, 8];

/// The head runs off the right edge until the trail is gone too
const FRAME_COUNT: usize = WIDTH + TRAIL.len();

const FRAME_MS: u64 = 60;

static SWEEP: [[u8; LEDS]; FRAME_COUNT] = build_sweep();

static FRAMES: StaticCell<[AnimationFrame<'static>; FRAME_COUNT]> = StaticCell::new();
static SEQUENCE: StaticCell<FrameSequence<'static>> = StaticCell::new();

const fn sweep_frame(head: usize) -> [u8; LEDS] {
    let mut data = [0u8; LEDS];
    let mut t = 0;
    while t < TRAIL.len() {
        if head >= t && head - t < WIDTH {
            let x = head - t;
            let mut y = 0;
            while y < HEIGHT {
                data[y * WIDTH + x] = TRAIL[t];
                y += 1;
            }
        }
        t += 1;
    }
    data
}

const fn build_sweep() -> [[u8; LEDS]; FRAME_COUNT] {
    let mut frames = [[0u8; LEDS]; FRAME_COUNT];
    let mut i = 0;
    while i < FRAME_COUNT {
        frames[i] = sweep_frame(i);
        i += 1;
    }
    frames
}

/// The sweep as a playable sequence
///
/// Can only be taken once.
pub fn sweep() -> &'static mut FrameSequence<'static> {
    let frames = FRAMES.init(core::array::from_fn(|i| {
        AnimationFrame::from_millis(&SWEEP[i], FRAME_MS)
    }));
    SEQUENCE.init(FrameSequence::new(WIDTH, HEIGHT, frames))
}
