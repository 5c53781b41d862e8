//! Configuration type definitions

use heapless::String;

use crate::geometry::{GeometryError, Panel};

/// Maximum banner text length
pub const MAX_BANNER_LEN: usize = 32;

/// Default 7-bit I2C address of the controller (AD pin to GND)
pub const DEFAULT_ADDRESS: u8 = 0x74;

/// Panel and bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig {
    /// Physical width in pixels
    pub width: u8,
    /// Physical height in pixels
    pub height: u8,
    /// 7-bit I2C address
    pub address: u8,
    /// SDA GPIO number
    pub sda_pin: u8,
    /// SCL GPIO number
    pub scl_pin: u8,
    /// Bus clock in Hz
    pub i2c_frequency: u32,
    /// Rotation level (0-3)
    pub rotation: u8,
    /// Global brightness
    pub brightness: u8,
    /// Bank shown at power-up (0-7)
    pub display_frame: u8,
}

impl MatrixConfig {
    /// Panel geometry described by `width` and `height`
    pub fn panel(&self) -> Result<Panel, GeometryError> {
        Panel::new(self.width, self.height)
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 9,
            address: DEFAULT_ADDRESS,
            sda_pin: 4,
            scl_pin: 5,
            i2c_frequency: 400_000,
            rotation: 0,
            brightness: u8::MAX,
            display_frame: 0,
        }
    }
}

/// Built-in animation playback settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationConfig {
    /// Play the animation after the banner
    pub enabled: bool,
    /// Wrap to the first frame at the end
    pub looping: bool,
    /// Interval between player polls in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            looping: true,
            poll_interval_ms: 20,
        }
    }
}

/// Start-up text banner
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BannerConfig {
    /// Text drawn at the origin; empty disables the banner
    pub text: String<MAX_BANNER_LEN>,
    /// Glyph intensity
    pub intensity: u8,
    /// How long the banner stays before the animation starts
    pub hold_ms: u32,
}

impl Default for BannerConfig {
    fn default() -> Self {
        let mut text = String::new();
        // Fits MAX_BANNER_LEN
        let _ = text.push_str("Hi");
        Self {
            text,
            intensity: 64,
            hold_ms: 1500,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlintConfig {
    pub matrix: MatrixConfig,
    pub animation: AnimationConfig,
    pub banner: BannerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_stock_panel() {
        let config = GlintConfig::default();
        assert_eq!(config.matrix.panel(), Ok(Panel::CHARLIEPLEX_16X9));
        assert_eq!(config.matrix.address, 0x74);
        assert_eq!(config.matrix.address, DEFAULT_ADDRESS);
        assert_eq!(config.matrix.rotation, 0);
        assert_eq!(config.animation.poll_interval_ms, 20);
        assert_eq!(config.banner.text.as_str(), "Hi");
    }

    #[test]
    fn test_bad_dimensions_reject_panel() {
        let matrix = MatrixConfig {
            width: 20,
            ..MatrixConfig::default()
        };
        assert!(matrix.panel().is_err());
    }
}
