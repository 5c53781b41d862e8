//! I2C pin-pair lookup
//!
//! Each RP2040 I2C block can only use fixed GPIO pairs. Configuration names
//! pins by number, so the firmware checks the pair before claiming them.

/// (SDA, SCL) pairs routed to I2C0 on the Pico header
pub const I2C0_PAIRS: [(u8, u8); 6] = [(0, 1), (4, 5), (8, 9), (12, 13), (16, 17), (20, 21)];

/// Whether `sda`/`scl` form an I2C0 pin pair
pub fn is_i2c0_pair(sda: u8, scl: u8) -> bool {
    I2C0_PAIRS.contains(&(sda, scl))
}
