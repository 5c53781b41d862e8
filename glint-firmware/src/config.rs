//! Configuration loading
//!
//! Parses the TOML file embedded at build time. Any problem falls back to
//! built-in defaults so a bad edit never leaves the panel dark.

use defmt::*;

use glint_core::config::{parse_config, GlintConfig, MatrixConfig};
use glint_hal_rp2040::pins::is_i2c0_pair;

/// Parse `source`, falling back to defaults on error
pub fn load(source: &str) -> GlintConfig {
    let mut config = match parse_config(source) {
        Ok(config) => {
            info!("Loaded configuration from matrix.toml");
            config
        }
        Err(e) => {
            error!("matrix.toml parse failed: {}, using defaults", e);
            GlintConfig::default()
        }
    };

    let matrix = &mut config.matrix;
    if !is_i2c0_pair(matrix.sda_pin, matrix.scl_pin) {
        let defaults = MatrixConfig::default();
        warn!(
            "GPIO{}/GPIO{} is not an I2C0 pair, using GPIO{}/GPIO{}",
            matrix.sda_pin, matrix.scl_pin, defaults.sda_pin, defaults.scl_pin
        );
        matrix.sda_pin = defaults.sda_pin;
        matrix.scl_pin = defaults.scl_pin;
    }

    config
}
