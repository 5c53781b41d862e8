//! Glint Hardware Abstraction Layer
//!
//! This crate defines the hardware services the LED matrix driver calls
//! into. Chip-specific HALs implement them so the driver and its animation
//! engine stay board-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  glint-drivers (IS31FL3731, LedMatrix)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  glint-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  glint-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`delay::DelayMs`] - Blocking millisecond delays

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use i2c::{I2cBus, I2cConfig};
