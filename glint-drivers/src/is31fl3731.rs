//! IS31FL3731 charlieplexed LED controller (I2C)
//!
//! The IS31FL3731 drives up to 144 LEDs with 8-bit PWM each. Its register
//! space is split into banks, selected through the command register:
//!
//! - Banks 0-7: frame memories. Each holds 18 LED on/off control registers,
//!   18 blink registers and 144 PWM registers starting at 0x24.
//! - Bank 0x0B: function registers (mode, displayed frame, audio sync,
//!   shutdown).
//!
//! # Bus Protocol
//!
//! - Select a bank: write `[0xFD, bank]`
//! - Write registers: write `[register, value, value, ...]` (auto-increment)
//! - Read a register: write `[register]`, then read one byte
//!
//! A write to any register only reaches the bank selected last, so every
//! operation here selects its bank first.

use glint_core::framebuffer::{BLOCK_COUNT, BLOCK_LEN};
use glint_hal::I2cBus;

/// Register map
pub mod reg {
    /// Command register (bank select)
    pub const COMMAND: u8 = 0xFD;
    /// Function register bank
    pub const FUNCTION_BANK: u8 = 0x0B;
    /// Number of frame banks
    pub const FRAME_COUNT: u8 = 8;

    /// Function bank: display mode
    pub const CONFIG: u8 = 0x00;
    /// Function bank: frame shown in picture mode
    pub const PICTURE_FRAME: u8 = 0x01;
    /// Function bank: audio synchronization enable
    pub const AUDIO_SYNC: u8 = 0x06;
    /// Function bank: software shutdown
    pub const SHUTDOWN: u8 = 0x0A;

    /// Frame bank: first LED on/off control register
    pub const LED_CONTROL: u8 = 0x00;
    /// Frame bank: number of LED control registers (8 LEDs each)
    pub const LED_CONTROL_LEN: usize = 0x12;
    /// Frame bank: first PWM register
    pub const PWM_BASE: u8 = 0x24;

    /// CONFIG value for picture mode
    pub const MODE_PICTURE: u8 = 0x00;
    /// SHUTDOWN value that powers the outputs down
    pub const SHUTDOWN_ENABLE: u8 = 0x00;
    /// SHUTDOWN value for normal operation
    pub const SHUTDOWN_DISABLE: u8 = 0x01;
}

pub use glint_core::config::DEFAULT_ADDRESS;

/// Largest register run sent in one transaction
pub const MAX_BLOCK: usize = BLOCK_LEN;

/// IS31FL3731 register driver
///
/// Thin and stateless apart from the bus and address: it does not cache
/// the selected bank.
pub struct Is31fl3731<B> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> Is31fl3731<B> {
    /// Create a driver at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Change the device address
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Check that the controller acknowledges its address
    pub fn probe(&mut self) -> Result<(), B::Error> {
        self.bus.probe(self.address)
    }

    /// Make `bank` the target of following register accesses
    pub fn select_bank(&mut self, bank: u8) -> Result<(), B::Error> {
        self.bus.write(self.address, &[reg::COMMAND, bank])
    }

    /// Write one register in `bank`
    pub fn write_register(&mut self, bank: u8, register: u8, value: u8) -> Result<(), B::Error> {
        self.select_bank(bank)?;
        self.bus.write(self.address, &[register, value])
    }

    /// Read one register in `bank`
    pub fn read_register(&mut self, bank: u8, register: u8) -> Result<u8, B::Error> {
        self.select_bank(bank)?;
        let mut value = [0u8; 1];
        self.bus.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }

    /// Write a run of registers in `bank` starting at `start`
    ///
    /// At most [`MAX_BLOCK`] bytes are sent; the rest of `data` is ignored.
    pub fn write_block(&mut self, bank: u8, start: u8, data: &[u8]) -> Result<(), B::Error> {
        self.select_bank(bank)?;
        self.send_block(start, data)
    }

    /// Write all 144 PWM registers of `bank`
    ///
    /// `block(i)` supplies the 24 bytes for registers
    /// `PWM_BASE + i * 24 ..`; the bank is selected once for all six.
    pub fn write_pwm<F>(&mut self, bank: u8, mut block: F) -> Result<(), B::Error>
    where
        F: FnMut(usize) -> [u8; MAX_BLOCK],
    {
        self.select_bank(bank)?;
        for i in 0..BLOCK_COUNT {
            let start = reg::PWM_BASE + (i * MAX_BLOCK) as u8;
            self.send_block(start, &block(i))?;
        }
        Ok(())
    }

    /// Choose the frame bank the chip displays
    ///
    /// Out-of-range frames select frame 0.
    pub fn set_display_frame(&mut self, frame: u8) -> Result<(), B::Error> {
        let frame = if frame < reg::FRAME_COUNT { frame } else { 0 };
        self.write_register(reg::FUNCTION_BANK, reg::PICTURE_FRAME, frame)
    }

    /// Enable or disable audio-modulated brightness
    pub fn set_audio_sync(&mut self, enabled: bool) -> Result<(), B::Error> {
        self.write_register(reg::FUNCTION_BANK, reg::AUDIO_SYNC, u8::from(enabled))
    }

    /// Enter (`true`) or leave (`false`) software shutdown
    pub fn set_shutdown(&mut self, shutdown: bool) -> Result<(), B::Error> {
        let value = if shutdown {
            reg::SHUTDOWN_ENABLE
        } else {
            reg::SHUTDOWN_DISABLE
        };
        self.write_register(reg::FUNCTION_BANK, reg::SHUTDOWN, value)
    }

    /// Show a single static frame (no auto-play)
    pub fn set_picture_mode(&mut self) -> Result<(), B::Error> {
        self.write_register(reg::FUNCTION_BANK, reg::CONFIG, reg::MODE_PICTURE)
    }

    /// Turn every LED on in every frame bank
    ///
    /// PWM still decides brightness; this only enables the outputs.
    pub fn enable_all_leds(&mut self) -> Result<(), B::Error> {
        let all_on = [0xFF; reg::LED_CONTROL_LEN];
        for bank in 0..reg::FRAME_COUNT {
            self.write_block(bank, reg::LED_CONTROL, &all_on)?;
        }
        Ok(())
    }

    fn send_block(&mut self, start: u8, data: &[u8]) -> Result<(), B::Error> {
        let len = data.len().min(MAX_BLOCK);
        let mut buf = [0u8; MAX_BLOCK + 1];
        buf[0] = start;
        buf[1..=len].copy_from_slice(&data[..len]);
        self.bus.write(self.address, &buf[..=len])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One recorded bus transaction
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Op {
        Write(u8, Vec<u8>),
        Read(u8, usize),
        WriteRead(u8, Vec<u8>, usize),
    }

    /// Mock I2C bus recording every transaction
    pub struct MockBus {
        pub ops: Vec<Op>,
        /// Whether a device answers
        pub present: bool,
        /// Fail every transaction after this many have succeeded
        pub fail_after: Option<usize>,
        /// Byte returned by reads
        pub read_value: u8,
    }

    impl MockBus {
        pub fn new() -> Self {
            Self {
                ops: Vec::new(),
                present: true,
                fail_after: None,
                read_value: 0,
            }
        }

        pub fn absent() -> Self {
            Self {
                present: false,
                ..Self::new()
            }
        }

        fn check(&self) -> Result<(), ()> {
            if !self.present {
                return Err(());
            }
            match self.fail_after {
                Some(n) if self.ops.len() >= n => Err(()),
                _ => Ok(()),
            }
        }

        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Write(_, data) => Some(data.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl I2cBus for MockBus {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            self.check()?;
            self.ops.push(Op::Write(address, data.to_vec()));
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ()> {
            self.check()?;
            self.ops.push(Op::Read(address, buf.len()));
            buf.fill(self.read_value);
            Ok(())
        }

        fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), ()> {
            self.check()?;
            self.ops
                .push(Op::WriteRead(address, write_data.to_vec(), read_buf.len()));
            read_buf.fill(self.read_value);
            Ok(())
        }
    }

    #[test]
    fn test_write_register_selects_bank_first() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.write_register(3, 0x30, 0x80).unwrap();
        let bus = chip.release();
        assert_eq!(
            bus.ops,
            vec![
                Op::Write(0x74, vec![0xFD, 3]),
                Op::Write(0x74, vec![0x30, 0x80]),
            ]
        );
    }

    #[test]
    fn test_default_address_matches_config() {
        assert_eq!(DEFAULT_ADDRESS, 0x74);
        assert_eq!(
            glint_core::config::MatrixConfig::default().address,
            DEFAULT_ADDRESS
        );
    }

    #[test]
    fn test_read_register() {
        let mut bus = MockBus::new();
        bus.read_value = 0x5A;
        let mut chip = Is31fl3731::new(bus, 0x75);
        assert_eq!(chip.read_register(reg::FUNCTION_BANK, reg::SHUTDOWN), Ok(0x5A));
        let bus = chip.release();
        assert_eq!(
            bus.ops,
            vec![
                Op::Write(0x75, vec![0xFD, 0x0B]),
                Op::WriteRead(0x75, vec![0x0A], 1),
            ]
        );
    }

    #[test]
    fn test_display_frame_clamps_to_zero() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.set_display_frame(7).unwrap();
        chip.set_display_frame(8).unwrap();
        chip.set_display_frame(200).unwrap();
        let writes = chip.release().writes();
        assert_eq!(writes[1], vec![0x01, 7]);
        assert_eq!(writes[3], vec![0x01, 0]);
        assert_eq!(writes[5], vec![0x01, 0]);
    }

    #[test]
    fn test_function_registers() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.set_shutdown(true).unwrap();
        chip.set_shutdown(false).unwrap();
        chip.set_audio_sync(true).unwrap();
        chip.set_picture_mode().unwrap();
        let writes = chip.release().writes();
        assert!(writes.iter().step_by(2).all(|w| w == &vec![0xFD, 0x0B]));
        assert_eq!(writes[1], vec![0x0A, 0x00]);
        assert_eq!(writes[3], vec![0x0A, 0x01]);
        assert_eq!(writes[5], vec![0x06, 0x01]);
        assert_eq!(writes[7], vec![0x00, 0x00]);
    }

    #[test]
    fn test_write_block_truncates_to_max() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.write_block(1, 0x24, &[7u8; 30]).unwrap();
        let writes = chip.release().writes();
        assert_eq!(writes[0], vec![0xFD, 1]);
        assert_eq!(writes[1].len(), 25);
        assert_eq!(writes[1][0], 0x24);
    }

    #[test]
    fn test_write_pwm_layout() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.write_pwm(2, |i| [i as u8; MAX_BLOCK]).unwrap();
        let writes = chip.release().writes();

        assert_eq!(writes.len(), 7);
        assert_eq!(writes[0], vec![0xFD, 2]);
        for (i, w) in writes[1..].iter().enumerate() {
            assert_eq!(w.len(), 25);
            assert_eq!(w[0], 0x24 + (i as u8) * 24);
            assert!(w[1..].iter().all(|&b| b == i as u8));
        }
    }

    #[test]
    fn test_enable_all_leds_covers_every_bank() {
        let mut chip = Is31fl3731::new(MockBus::new(), DEFAULT_ADDRESS);
        chip.enable_all_leds().unwrap();
        let writes = chip.release().writes();
        assert_eq!(writes.len(), 16);
        for bank in 0..8u8 {
            assert_eq!(writes[bank as usize * 2], vec![0xFD, bank]);
            let data = &writes[bank as usize * 2 + 1];
            assert_eq!(data[0], 0x00);
            assert_eq!(data.len(), 19);
            assert!(data[1..].iter().all(|&b| b == 0xFF));
        }
    }

    #[test]
    fn test_probe_reports_missing_device() {
        let mut chip = Is31fl3731::new(MockBus::absent(), DEFAULT_ADDRESS);
        assert_eq!(chip.probe(), Err(()));
        assert!(chip.release().ops.is_empty());
    }

    #[test]
    fn test_errors_stop_multi_step_writes() {
        let mut bus = MockBus::new();
        bus.fail_after = Some(3);
        let mut chip = Is31fl3731::new(bus, DEFAULT_ADDRESS);
        assert_eq!(chip.write_pwm(0, |_| [0; MAX_BLOCK]), Err(()));
        assert_eq!(chip.release().ops.len(), 3);
    }
}
