//! Configuration types
//!
//! Board-agnostic configuration, parsed from a small TOML subset without a
//! heap so firmware can read a file embedded at build time.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
