//! I2C bus driver for RP2040
//!
//! Wraps embassy-rp's blocking I2C master. The IS31FL3731 protocol is a
//! handful of short writes per frame, so blocking transfers keep the driver
//! synchronous without tying up the executor for long.

use embassy_rp::i2c::{Blocking, Config, Error as I2cError, I2c, Instance};
use embedded_hal::i2c::{Error as _, ErrorKind};
use glint_hal::{I2cBus, I2cConfig};

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received (no device, or register rejected)
    Nack,
    /// Overrun
    Overrun,
    /// Other error (buffer length, reserved address)
    Other,
}

impl From<I2cError> for I2cBusError {
    fn from(e: I2cError) -> Self {
        match e.kind() {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

/// Build an embassy-rp I2C config from the board-agnostic one
pub fn rp_config(config: I2cConfig) -> Config {
    let mut rp = Config::default();
    rp.frequency = config.frequency;
    rp
}

/// Blocking I2C master
pub struct Rp2040I2c<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> Rp2040I2c<'d, T> {
    /// Wrap a configured blocking I2C peripheral
    pub fn new(i2c: I2c<'d, T, Blocking>) -> Self {
        Self { i2c }
    }
}

impl<'d, T: Instance> I2cBus for Rp2040I2c<'d, T> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c.blocking_write(address, data).map_err(Into::into)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.blocking_read(address, buf).map_err(Into::into)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .blocking_write_read(address, write_data, read_buf)
            .map_err(Into::into)
    }
}
