//! Build script for glint-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates matrix.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// I2C0 pin pairs the firmware can route
const I2C0_PAIRS: [(i64, i64); 6] = [(0, 1), (4, 5), (8, 9), (12, 13), (16, 17), (20, 21)];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate matrix.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=matrix.toml");

    let config_path = Path::new("matrix.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: matrix.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a matrix.toml configuration file.           ║\n\
            ║  Please create one in the glint-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read matrix.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in matrix.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_matrix(&config, &mut errors);
    validate_animation(&config, &mut errors);
    validate_banner(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in matrix.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=matrix.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the three known sections are allowed at the top level
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !["matrix", "animation", "banner"].contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a [section]", name));
        }
    }
}

/// Read an optional integer, recording an error when it has the wrong type
fn int(section: &toml::Value, table: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    match section.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", table, key));
            None
        }
    }
}

fn check_range(
    value: Option<i64>,
    range: std::ops::RangeInclusive<i64>,
    table: &str,
    key: &str,
    errors: &mut Vec<String>,
) {
    if let Some(v) = value {
        if !range.contains(&v) {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                table,
                key,
                range.start(),
                range.end()
            ));
        }
    }
}

fn validate_matrix(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(matrix) = config.get("matrix") else {
        return;
    };

    let width = int(matrix, "matrix", "width", errors);
    let height = int(matrix, "matrix", "height", errors);
    check_range(width, 1..=144, "matrix", "width", errors);
    check_range(height, 1..=144, "matrix", "height", errors);
    let (w, h) = (width.unwrap_or(16), height.unwrap_or(9));
    if w * h > 144 {
        errors.push(format!("[matrix] {}x{} exceeds the 144 LEDs one chip drives", w, h));
    }

    let address = int(matrix, "matrix", "address", errors);
    check_range(address, 0..=0x7F, "matrix", "address", errors);

    let sda = int(matrix, "matrix", "sda_pin", errors).unwrap_or(4);
    let scl = int(matrix, "matrix", "scl_pin", errors).unwrap_or(5);
    if !I2C0_PAIRS.contains(&(sda, scl)) {
        errors.push(format!(
            "[matrix] sda_pin = {}, scl_pin = {} is not an I2C0 pin pair",
            sda, scl
        ));
    }

    let frequency = int(matrix, "matrix", "i2c_frequency", errors);
    check_range(frequency, 10_000..=1_000_000, "matrix", "i2c_frequency", errors);

    let rotation = int(matrix, "matrix", "rotation", errors);
    check_range(rotation, 0..=3, "matrix", "rotation", errors);

    let brightness = int(matrix, "matrix", "brightness", errors);
    check_range(brightness, 0..=255, "matrix", "brightness", errors);

    let frame = int(matrix, "matrix", "display_frame", errors);
    check_range(frame, 0..=7, "matrix", "display_frame", errors);
}

fn validate_animation(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(animation) = config.get("animation") else {
        return;
    };

    for key in ["enabled", "looping"] {
        if let Some(value) = animation.get(key) {
            if !value.is_bool() {
                errors.push(format!("[animation] {} must be true or false", key));
            }
        }
    }

    let interval = int(animation, "animation", "poll_interval_ms", errors);
    check_range(interval, 1..=10_000, "animation", "poll_interval_ms", errors);
}

fn validate_banner(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(banner) = config.get("banner") else {
        return;
    };

    match banner.get("text") {
        Some(toml::Value::String(text)) if text.len() > 32 => {
            errors.push("[banner] text must be at most 32 bytes".to_string());
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push("[banner] text must be a string".to_string()),
    }

    let intensity = int(banner, "banner", "intensity", errors);
    check_range(intensity, 0..=255, "banner", "intensity", errors);

    let hold = int(banner, "banner", "hold_ms", errors);
    check_range(hold, 0..=u32::MAX as i64, "banner", "hold_ms", errors);
}
