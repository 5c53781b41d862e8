//! Minimal TOML parser for matrix configuration
//!
//! Handles only the subset the configuration needs. It does NOT support the
//! full TOML grammar.
//!
//! Supported:
//! - `[matrix]`, `[animation]` and `[banner]` section headers
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers
//! - Comments (# ...), including after a value
//!
//! Unknown keys are skipped so older firmware accepts newer files.

use heapless::String;

use super::types::{GlintConfig, MAX_BANNER_LEN};
use crate::geometry::Panel;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String longer than its fixed capacity
    ValueTooLong,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Matrix,
    Animation,
    Banner,
}

/// Parse TOML configuration into a [`GlintConfig`]
///
/// Keys missing from the input keep their defaults.
pub fn parse_config(input: &str) -> Result<GlintConfig, ParseError> {
    let mut config = GlintConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    // Geometry is checked once both sides are known
    Panel::new(config.matrix.width, config.matrix.height).map_err(|_| ParseError::InvalidValue)?;

    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let header = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match header.trim() {
        "matrix" => Ok(Section::Matrix),
        "animation" => Ok(Section::Animation),
        "banner" => Ok(Section::Banner),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut GlintConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Matrix => {
            let m = &mut config.matrix;
            match key {
                "width" => m.width = parse_int(value)?,
                "height" => m.height = parse_int(value)?,
                "address" => m.address = parse_address(value)?,
                "sda_pin" => m.sda_pin = parse_int(value)?,
                "scl_pin" => m.scl_pin = parse_int(value)?,
                "i2c_frequency" => m.i2c_frequency = parse_int(value)?,
                "rotation" => m.rotation = parse_bounded(value, 3)?,
                "brightness" => m.brightness = parse_int(value)?,
                "display_frame" => m.display_frame = parse_bounded(value, 7)?,
                _ => {}
            }
        }
        Section::Animation => {
            let a = &mut config.animation;
            match key {
                "enabled" => a.enabled = parse_bool(value)?,
                "looping" => a.looping = parse_bool(value)?,
                "poll_interval_ms" => a.poll_interval_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Banner => {
            let b = &mut config.banner;
            match key {
                "text" => b.text = parse_label(value)?,
                "intensity" => b.intensity = parse_int(value)?,
                "hold_ms" => b.hold_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Root => {}
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Strip an inline comment unless the # sits inside a string
    let comment = value
        .match_indices('#')
        .map(|(pos, _)| pos)
        .find(|&pos| value[..pos].matches('"').count() % 2 == 0);
    let value = match comment {
        Some(pos) => value[..pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_label(value: &str) -> Result<String<MAX_BANNER_LEN>, ParseError> {
    String::try_from(parse_string(value)).map_err(|_| ParseError::ValueTooLong)
}

/// Parse a decimal or `0x` hexadecimal integer
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let raw = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => parse_digits(hex, 16),
        None => parse_digits(value, 10),
    }
    .ok_or(ParseError::InvalidValue)?;
    T::try_from(raw).map_err(|_| ParseError::InvalidValue)
}

/// Unsigned digits in `radix`, allowing `_` separators
fn parse_digits(digits: &str, radix: u32) -> Option<u32> {
    let mut acc: u32 = 0;
    let mut seen = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix)?;
        acc = acc.checked_mul(radix)?.checked_add(d)?;
        seen = true;
    }
    seen.then_some(acc)
}

fn parse_bounded(value: &str, max: u8) -> Result<u8, ParseError> {
    let v: u8 = parse_int(value)?;
    if v > max {
        return Err(ParseError::InvalidValue);
    }
    Ok(v)
}

/// 7-bit I2C address
fn parse_address(value: &str) -> Result<u8, ParseError> {
    parse_bounded(value, 0x7F)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
