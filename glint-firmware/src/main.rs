//! Glint - IS31FL3731 LED Matrix Firmware
//!
//! Main firmware binary for RP2040 boards driving a charlieplexed LED panel
//! through an IS31FL3731. Everything board-specific comes from the embedded
//! matrix.toml: panel size, bus pins and address, rotation, brightness,
//! banner and animation settings.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::I2c;
use {defmt_rtt as _, panic_probe as _};

use glint_drivers::LedMatrix;
use glint_hal::I2cConfig;
use glint_hal_rp2040::i2c::rp_config;
use glint_hal_rp2040::{BlockingDelay, Rp2040I2c};

mod config;
mod demo;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit matrix.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../matrix.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glint firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);
    let matrix_config = config.matrix;

    let panel = match matrix_config.panel() {
        Ok(panel) => panel,
        Err(e) => {
            warn!("Invalid panel size: {}, using 16x9", e);
            Default::default()
        }
    };

    // I2C0 on the configured pin pair (validated by config::load)
    let i2c_config = rp_config(I2cConfig {
        frequency: matrix_config.i2c_frequency,
    });
    let i2c = match (matrix_config.sda_pin, matrix_config.scl_pin) {
        (0, 1) => I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, i2c_config),
        (8, 9) => I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c_config),
        (12, 13) => I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, i2c_config),
        (16, 17) => I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c_config),
        (20, 21) => I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c_config),
        _ => I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config),
    };
    info!(
        "I2C0 on SDA=GPIO{} SCL=GPIO{} at {}Hz",
        matrix_config.sda_pin, matrix_config.scl_pin, matrix_config.i2c_frequency
    );

    let mut matrix = LedMatrix::new(Rp2040I2c::new(i2c), BlockingDelay, panel);

    if let Err(e) = matrix.begin(matrix_config.address) {
        error!(
            "IS31FL3731 not ready at {=u8:#x}: {}",
            matrix_config.address, e
        );
        loop {
            embassy_time::Timer::after_secs(60).await;
        }
    }

    matrix.set_rotation(matrix_config.rotation);
    matrix.set_brightness(matrix_config.brightness);
    matrix.set_frame(matrix_config.display_frame);
    matrix.display_frame(matrix_config.display_frame);
    info!(
        "Matrix {}x{} ready (rotation={}, brightness={})",
        panel.width(),
        panel.height(),
        matrix.rotation(),
        matrix.brightness()
    );

    let animation = if config.animation.enabled {
        Some(demo::sweep())
    } else {
        None
    };

    spawner
        .spawn(tasks::tick_task(config.animation.poll_interval_ms))
        .unwrap();
    spawner
        .spawn(tasks::matrix_task(
            matrix,
            animation,
            config.animation,
            config.banner,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
