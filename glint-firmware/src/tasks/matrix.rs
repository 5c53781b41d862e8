//! Matrix task
//!
//! Sole owner of the LED matrix. Shows the banner, then plays the animation
//! from tick timestamps. Frames are double-buffered across two chip banks:
//! each new frame is pushed to the hidden bank and then displayed, so a
//! half-written frame is never visible.

use core::time::Duration;

use defmt::*;
use embassy_rp::peripherals::I2C0;
use embassy_time::Timer;

use glint_core::config::{AnimationConfig, BannerConfig};
use glint_core::text::text_width;
use glint_core::{FrameSequence, PollOutcome};
use glint_drivers::is31fl3731::reg::FRAME_COUNT;
use glint_drivers::LedMatrix;
use glint_hal_rp2040::{BlockingDelay, Rp2040I2c};

use super::tick::TICK_SIGNAL;

/// The board's matrix type
pub type Matrix = LedMatrix<'static, Rp2040I2c<'static, I2C0>, BlockingDelay>;

/// Matrix task - banner, then animation playback
#[embassy_executor::task]
pub async fn matrix_task(
    mut matrix: Matrix,
    animation: Option<&'static mut FrameSequence<'static>>,
    animation_config: AnimationConfig,
    banner: BannerConfig,
) {
    info!("Matrix task started");

    let mut banks = Banks::new(matrix.frame());

    if !banner.text.is_empty() {
        matrix.clear();
        let x = banner_x(&matrix, &banner.text);
        matrix.draw_string(x, 1, &banner.text, banner.intensity);
        banks.present(&mut matrix);
        debug!("Banner \"{}\" for {}ms", banner.text.as_str(), banner.hold_ms);
        Timer::after_millis(u64::from(banner.hold_ms)).await;
    }

    let Some(animation) = animation else {
        info!("Animation disabled, holding banner");
        return;
    };

    if !matrix.start_animation(animation, animation_config.looping) {
        warn!("Animation has no frames");
        return;
    }
    banks.present(&mut matrix);
    info!("Animation started (looping={})", animation_config.looping);

    TICK_SIGNAL.reset();
    let mut last_ms = TICK_SIGNAL.wait().await;

    loop {
        let now_ms = TICK_SIGNAL.wait().await;
        let elapsed = Duration::from_millis(u64::from(now_ms.wrapping_sub(last_ms)));
        last_ms = now_ms;

        match matrix.poll(elapsed) {
            outcome if outcome.needs_push() => {
                trace!("Frame change: {}", outcome);
                banks.present(&mut matrix);
            }
            PollOutcome::Finished => {
                info!("Animation finished");
                return;
            }
            _ => {}
        }
    }
}

/// Left edge that centers `text`, or 0 when it does not fit
fn banner_x(matrix: &Matrix, text: &str) -> i32 {
    let canvas = matrix.canvas();
    let (width, _) = canvas.panel().logical_size(canvas.rotation());
    let free = usize::from(width).saturating_sub(text_width(text));
    (free / 2) as i32
}

/// Front/back bank pair
struct Banks {
    shown: u8,
}

impl Banks {
    fn new(shown: u8) -> Self {
        Self { shown }
    }

    fn hidden(&self) -> u8 {
        (self.shown + 1) % FRAME_COUNT
    }

    /// Push to the hidden bank, then show it
    fn present(&mut self, matrix: &mut Matrix) {
        let hidden = self.hidden();
        matrix.set_frame(hidden);
        matrix.push();
        matrix.display_frame(hidden);
        self.shown = hidden;
    }
}
