//! LED matrix facade
//!
//! Owns the controller, the frame buffer and the animation player, and
//! exposes the drawing and playback calls an application uses. Drawing only
//! touches memory; [`LedMatrix::push`] is what sends the buffer to the chip.
//!
//! Bus errors after [`LedMatrix::begin`] are absorbed: a failed write
//! degrades what is shown but is never returned to the caller.

use core::time::Duration;

use glint_core::{
    Animation, AnimationPlayer, FrameBuffer, Panel, PlayerState, PollOutcome, Rgb, Rotation,
};
use glint_hal::{DelayMs, I2cBus};

use crate::is31fl3731::{reg, Is31fl3731, DEFAULT_ADDRESS};

/// Pause between shutdown and wake during bring-up
const SHUTDOWN_DELAY_MS: u32 = 10;

/// Bring-up failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E> {
    /// Nothing acknowledged the address
    NotFound(E),
    /// The device answered the probe but a bring-up write failed
    Bus(E),
}

/// IS31FL3731 matrix with an in-memory frame buffer
pub struct LedMatrix<'a, B: I2cBus, D: DelayMs> {
    chip: Is31fl3731<B>,
    delay: D,
    canvas: FrameBuffer,
    player: AnimationPlayer<'a>,
    /// Bank that `push` and `set_led_pwm` target
    frame: u8,
}

impl<'a, B: I2cBus, D: DelayMs> LedMatrix<'a, B, D> {
    /// Create a matrix for `panel`; nothing is sent until [`Self::begin`]
    pub fn new(bus: B, delay: D, panel: Panel) -> Self {
        Self {
            chip: Is31fl3731::new(bus, DEFAULT_ADDRESS),
            delay,
            canvas: FrameBuffer::new(panel),
            player: AnimationPlayer::new(),
            frame: 0,
        }
    }

    /// Probe and initialize the controller at `address`
    ///
    /// If the probe fails nothing else is sent. On success the chip is
    /// reset, put in picture mode showing frame 0, loaded with a blank
    /// buffer, has every LED enabled in all eight banks and audio sync off.
    /// The write bank returns to 0 whatever [`Self::set_frame`] chose before.
    pub fn begin(&mut self, address: u8) -> Result<(), InitError<B::Error>> {
        self.frame = 0;
        self.chip.set_address(address);
        self.chip.probe().map_err(InitError::NotFound)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("is31fl3731: found at {=u8:#x}", address);

        self.bring_up().map_err(InitError::Bus)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "is31fl3731: {}x{} ready",
            self.canvas.panel().width(),
            self.canvas.panel().height()
        );
        Ok(())
    }

    fn bring_up(&mut self) -> Result<(), B::Error> {
        self.chip.set_shutdown(true)?;
        self.delay.delay_ms(SHUTDOWN_DELAY_MS);
        self.chip.set_shutdown(false)?;

        self.chip.set_picture_mode()?;
        self.chip.set_display_frame(0)?;

        self.canvas.clear();
        self.try_push()?;

        self.chip.enable_all_leds()?;
        self.chip.set_audio_sync(false)
    }

    // ---- Frame buffer ----

    /// Set every stored intensity to 0
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Set one pixel in rotated coordinates
    pub fn set_pixel(&mut self, x: i32, y: i32, intensity: u16) {
        self.canvas.set_pixel(x, y, intensity);
    }

    /// Draw one 5x7 character with its top-left at (x, y)
    pub fn draw_char(&mut self, x: i32, y: i32, c: char, intensity: u8) {
        self.canvas.draw_char(x, y, c, intensity);
    }

    /// Draw a single line of text
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, intensity: u8) {
        self.canvas.draw_string(x, y, text, intensity);
    }

    /// Blit a monochrome bitmap
    pub fn draw_bitmap(&mut self, x: i32, y: i32, width: usize, height: usize, data: &[u8]) {
        self.canvas.draw_bitmap(x, y, width, height, data);
    }

    /// Blit a color bitmap (red channel only)
    pub fn draw_bitmap_rgb(&mut self, x: i32, y: i32, width: usize, height: usize, data: &[Rgb]) {
        self.canvas.draw_bitmap_rgb(x, y, width, height, data);
    }

    /// Global brightness scale (255 is full)
    pub fn brightness(&self) -> u8 {
        self.canvas.brightness()
    }

    /// Set global brightness, applied at the next push
    pub fn set_brightness(&mut self, brightness: u8) {
        self.canvas.set_brightness(brightness);
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.canvas.rotation()
    }

    /// Set rotation level (0-3); other values are ignored
    pub fn set_rotation(&mut self, level: u8) {
        self.canvas.set_rotation(level);
    }

    /// The frame buffer
    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    // ---- Device ----

    /// Send the frame buffer to the current bank, brightness applied
    pub fn push(&mut self) {
        let result = self.try_push();
        absorb(result, "push");
    }

    fn try_push(&mut self) -> Result<(), B::Error> {
        let canvas = &self.canvas;
        self.chip
            .write_pwm(self.frame, |block| canvas.scaled_block(block))
    }

    /// Bank that following pushes write to
    ///
    /// The chip has eight banks; a value above 7 selects bank 0 rather than
    /// being stored and clamped at push time. Does not change which bank
    /// the chip displays.
    pub fn set_frame(&mut self, frame: u8) {
        self.frame = if frame < reg::FRAME_COUNT { frame } else { 0 };
    }

    /// Bank that pushes write to
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Bank the chip displays (0-7, others select 0)
    pub fn display_frame(&mut self, frame: u8) {
        let result = self.chip.set_display_frame(frame);
        absorb(result, "display_frame");
    }

    /// Enable or disable audio-modulated brightness
    pub fn audio_sync(&mut self, enabled: bool) {
        let result = self.chip.set_audio_sync(enabled);
        absorb(result, "audio_sync");
    }

    /// Write one LED's PWM register in `bank` directly
    ///
    /// Bypasses the frame buffer and rotation but applies global
    /// brightness. LED numbers of 144 and up are ignored.
    pub fn set_led_pwm(&mut self, led: u8, pwm: u8, bank: u8) {
        if usize::from(led) >= glint_core::geometry::MAX_LEDS {
            return;
        }
        let value = self.canvas.scale(pwm);
        let result = self.chip.write_register(bank, reg::PWM_BASE + led, value);
        absorb(result, "set_led_pwm");
    }

    /// Write a raw register
    pub fn write_register(&mut self, bank: u8, register: u8, value: u8) {
        let result = self.chip.write_register(bank, register, value);
        absorb(result, "write_register");
    }

    /// Read a raw register; `None` if the bus failed
    pub fn read_register(&mut self, bank: u8, register: u8) -> Option<u8> {
        let result = self.chip.read_register(bank, register);
        absorb(result, "read_register")
    }

    // ---- Animation ----

    /// Start playing `animation`, drawing its first frame into the buffer
    ///
    /// Returns `false` for an empty sequence.
    pub fn start_animation(&mut self, animation: &'a mut dyn Animation, looping: bool) -> bool {
        self.player.start(animation, looping, &mut self.canvas)
    }

    /// Stop playback; the buffer keeps the last frame
    pub fn stop_animation(&mut self) {
        self.player.stop();
    }

    /// Advance playback by `elapsed`
    ///
    /// Redraws the buffer on a frame change but does not push; check
    /// [`PollOutcome::needs_push`].
    pub fn poll(&mut self, elapsed: Duration) -> PollOutcome {
        self.player.poll(elapsed, &mut self.canvas)
    }

    /// State of the animation player
    pub fn animation_state(&self) -> PlayerState {
        self.player.state()
    }

    /// Give the bus and delay back
    pub fn release(self) -> (B, D) {
        (self.chip.release(), self.delay)
    }
}

/// Drop a post-initialization bus error, logging it when defmt is enabled
#[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
fn absorb<T, E>(result: Result<T, E>, op: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("is31fl3731: {=str} failed", op);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is31fl3731::tests::{MockBus, Op};
    use glint_core::{AnimationFrame, FrameSequence};

    struct MockDelay {
        calls: Vec<u32>,
    }

    impl MockDelay {
        fn new() -> Self {
            Self { calls: Vec::new() }
        }
    }

    impl DelayMs for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.calls.push(ms);
        }
    }

    fn matrix(bus: MockBus) -> LedMatrix<'static, MockBus, MockDelay> {
        LedMatrix::new(bus, MockDelay::new(), Panel::CHARLIEPLEX_16X9)
    }

    /// A matrix after a successful begin, with the bus log emptied
    fn started() -> LedMatrix<'static, MockBus, MockDelay> {
        let mut m = matrix(MockBus::new());
        m.begin(DEFAULT_ADDRESS).unwrap();
        m.chip.bus_mut().ops.clear();
        m
    }

    /// PWM payloads (without the start register) of the last push
    fn pushed_pwm(bus: &MockBus) -> Vec<u8> {
        bus.writes()
            .iter()
            .filter(|w| w.len() == 25)
            .flat_map(|w| w[1..].to_vec())
            .collect()
    }

    #[test]
    fn test_begin_sequence() {
        let mut m = matrix(MockBus::new());
        assert_eq!(m.begin(0x74), Ok(()));
        let (bus, delay) = m.release();

        assert_eq!(bus.ops[0], Op::Read(0x74, 1));
        assert!(bus
            .ops
            .iter()
            .all(|op| matches!(op, Op::Read(0x74, _) | Op::Write(0x74, _))));
        assert_eq!(delay.calls, vec![10]);

        let writes = bus.writes();
        let expected_head: Vec<Vec<u8>> = vec![
            vec![0xFD, 0x0B],
            vec![0x0A, 0x00],
            vec![0xFD, 0x0B],
            vec![0x0A, 0x01],
            vec![0xFD, 0x0B],
            vec![0x00, 0x00],
            vec![0xFD, 0x0B],
            vec![0x01, 0x00],
            vec![0xFD, 0x00],
        ];
        assert_eq!(writes[..9], expected_head[..]);

        // Blank push: 6 blocks of 24 zero bytes
        for (i, w) in writes[9..15].iter().enumerate() {
            assert_eq!(w[0], 0x24 + (i as u8) * 24);
            assert_eq!(w.len(), 25);
            assert!(w[1..].iter().all(|&b| b == 0));
        }

        // LED control on in every bank
        for bank in 0..8usize {
            assert_eq!(writes[15 + bank * 2], vec![0xFD, bank as u8]);
            let ctl = &writes[16 + bank * 2];
            assert_eq!(ctl.len(), 19);
            assert_eq!(ctl[0], 0x00);
            assert!(ctl[1..].iter().all(|&b| b == 0xFF));
        }

        assert_eq!(writes[31..], [vec![0xFD, 0x0B], vec![0x06, 0x00]]);
        assert_eq!(writes.len(), 33);
    }

    #[test]
    fn test_begin_blanks_bank_zero_after_set_frame() {
        let mut m = matrix(MockBus::new());
        m.set_frame(3);
        assert_eq!(m.begin(0x74), Ok(()));
        assert_eq!(m.frame(), 0);
        let (bus, _) = m.release();

        let writes = bus.writes();
        assert_eq!(writes[7], vec![0x01, 0x00]);
        // Blank buffer goes to the displayed bank
        assert_eq!(writes[8], vec![0xFD, 0x00]);
        assert!(writes[9..15].iter().all(|w| w[1..].iter().all(|&b| b == 0)));
    }

    #[test]
    fn test_begin_without_device_sends_nothing_else() {
        let mut m = matrix(MockBus::absent());
        assert_eq!(m.begin(0x74), Err(InitError::NotFound(())));
        let (bus, delay) = m.release();
        assert!(bus.ops.is_empty());
        assert!(delay.calls.is_empty());
    }

    #[test]
    fn test_begin_reports_bring_up_failure() {
        let mut bus = MockBus::new();
        bus.fail_after = Some(4);
        let mut m = matrix(bus);
        assert_eq!(m.begin(0x74), Err(InitError::Bus(())));
    }

    #[test]
    fn test_push_after_clear_sends_144_zeros() {
        let mut m = started();
        m.draw_string(0, 0, "Hi", 255);
        m.clear();
        m.push();
        let (bus, _) = m.release();
        let pwm = pushed_pwm(&bus);
        assert_eq!(pwm.len(), 144);
        assert!(pwm.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_push_targets_selected_frame_with_brightness() {
        let mut m = started();
        m.set_pixel(0, 0, 100);
        m.set_brightness(128);
        m.set_frame(5);
        m.push();
        let (bus, _) = m.release();
        let writes = bus.writes();
        assert_eq!(writes[0], vec![0xFD, 5]);
        assert_eq!(writes[1][0], 0x24);
        assert_eq!(writes[1][1], 50);
        assert_eq!(writes.len(), 7);
    }

    #[test]
    fn test_set_frame_out_of_range() {
        let mut m = matrix(MockBus::new());
        m.set_frame(3);
        assert_eq!(m.frame(), 3);
        m.set_frame(9);
        assert_eq!(m.frame(), 0);
    }

    #[test]
    fn test_display_frame_clamps() {
        let mut m = started();
        m.display_frame(12);
        let (bus, _) = m.release();
        assert_eq!(bus.writes(), vec![vec![0xFD, 0x0B], vec![0x01, 0x00]]);
    }

    #[test]
    fn test_set_led_pwm() {
        let mut m = started();
        m.set_brightness(200);
        m.set_led_pwm(10, 100, 2);
        m.set_led_pwm(144, 255, 2);
        let (bus, _) = m.release();
        assert_eq!(bus.writes(), vec![vec![0xFD, 2], vec![0x24 + 10, 78]]);
    }

    #[test]
    fn test_read_register_absorbs_errors() {
        let mut m = started();
        assert_eq!(m.read_register(0x0B, 0x0A), Some(0));
        m.chip.bus_mut().present = false;
        assert_eq!(m.read_register(0x0B, 0x0A), None);
        m.push();
        m.write_register(0, 0x24, 1);
    }

    #[test]
    fn test_animation_through_facade() {
        const A: [u8; 1] = [40];
        const B: [u8; 1] = [80];
        let frames = [
            AnimationFrame::from_millis(&A, 100),
            AnimationFrame::from_millis(&B, 100),
        ];
        let mut seq = FrameSequence::new(1, 1, &frames);

        let mut m = LedMatrix::new(MockBus::new(), MockDelay::new(), Panel::CHARLIEPLEX_16X9);
        assert!(m.start_animation(&mut seq, false));
        assert_eq!(m.canvas().pixel(0, 0), Some(40));
        assert_eq!(m.animation_state(), PlayerState::Playing);

        assert_eq!(m.poll(Duration::from_millis(60)), PollOutcome::Holding);
        assert_eq!(m.poll(Duration::from_millis(60)), PollOutcome::Advanced);
        assert_eq!(m.canvas().pixel(0, 0), Some(80));
        assert_eq!(m.poll(Duration::from_millis(100)), PollOutcome::Finished);
        assert_eq!(m.canvas().pixel(0, 0), Some(80));

        m.stop_animation();
        assert_eq!(m.animation_state(), PlayerState::Idle);
        // Polling never touches the bus
        let (bus, _) = m.release();
        assert!(bus.ops.is_empty());
    }

    #[test]
    fn test_rotation_accessors() {
        let mut m = matrix(MockBus::new());
        m.set_rotation(1);
        m.set_rotation(7);
        assert_eq!(m.rotation(), Rotation::Deg90);
        m.draw_char(0, 0, '|', 255);
        // Column 2 of the glyph lands on physical row 2 under 90°
        assert_eq!(m.canvas().pixel(15, 2), Some(255));
    }
}
