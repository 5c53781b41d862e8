//! RP2040-specific HAL for the LED matrix firmware
//!
//! This crate provides RP2040 implementations of the `glint-hal` traits:
//! - Blocking I2C master over embassy-rp
//! - Busy-wait millisecond delay on the embassy time driver
//! - I2C pin-pair lookup for config-driven setup

#![no_std]

pub mod delay;
pub mod i2c;
pub mod pins;

pub use delay::BlockingDelay;
pub use i2c::{I2cBusError, Rp2040I2c};
