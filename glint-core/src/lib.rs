//! Board-agnostic core logic for the LED matrix firmware
//!
//! This crate contains everything that does not touch the bus:
//!
//! - Panel geometry and the clockwise rotation transform
//! - Frame buffer with brightness-scaled block output
//! - 5x7 font table and text rasterizer
//! - Animation sequences and the poll-driven playback state machine
//! - Configuration type definitions and the TOML subset parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod config;
pub mod framebuffer;
pub mod geometry;
pub mod text;

pub use animation::{
    Animation, AnimationFrame, AnimationPlayer, FrameSequence, PlayerState, PollOutcome,
};
pub use framebuffer::{FrameBuffer, Rgb};
pub use geometry::{GeometryError, Panel, Rotation};
