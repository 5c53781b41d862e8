//! Blocking delay abstraction

/// Blocking millisecond delay
///
/// Used during device bring-up, where the controller needs a short pause
/// between shutdown and wake.
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<T: DelayMs + ?Sized> DelayMs for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}
