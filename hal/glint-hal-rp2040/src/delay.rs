//! Blocking delay on the embassy time driver

use embassy_time::{block_for, Duration};
use glint_hal::DelayMs;

/// Busy-waits using the embassy time driver
///
/// Only meant for short bring-up pauses; it holds the executor while
/// waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingDelay;

impl DelayMs for BlockingDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}
