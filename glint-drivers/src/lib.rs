//! Hardware driver implementations
//!
//! - IS31FL3731 charlieplex PWM controller (register and bank protocol)
//! - [`LedMatrix`], the application-facing facade that ties the controller
//!   to a frame buffer, the text rasterizer and the animation player

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod is31fl3731;
pub mod matrix;

pub use is31fl3731::Is31fl3731;
pub use matrix::{InitError, LedMatrix};
