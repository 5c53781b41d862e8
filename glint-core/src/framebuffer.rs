//! Frame buffer and renderer
//!
//! An in-memory grid of 8-bit intensities. All drawing goes through
//! [`FrameBuffer::set_pixel`], which applies rotation and clipping. Global
//! brightness is applied only when the buffer is read out for transmission.

use heapless::Vec;

use crate::geometry::{GeometryError, Panel, Rotation, MAX_LEDS};

/// Bytes per PWM block transfer
pub const BLOCK_LEN: usize = 24;

/// Number of block transfers covering every LED register
pub const BLOCK_COUNT: usize = MAX_LEDS / BLOCK_LEN;

/// A 24-bit color pixel
///
/// The panel is monochrome, so only the red channel is used when blitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new pixel
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Pixel intensity grid for one panel
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    panel: Panel,
    rotation: Rotation,
    brightness: u8,
    /// Row-major, exactly `panel.led_count()` entries
    pixels: Vec<u8, MAX_LEDS>,
}

impl FrameBuffer {
    /// Create a cleared frame buffer for `panel`
    pub fn new(panel: Panel) -> Self {
        let mut pixels = Vec::new();
        // led_count() never exceeds MAX_LEDS, Panel::new checks it
        let _ = pixels.resize(panel.led_count(), 0);
        Self {
            panel,
            rotation: Rotation::Deg0,
            brightness: u8::MAX,
            pixels,
        }
    }

    /// Create a frame buffer from raw dimensions
    pub fn with_size(width: u8, height: u8) -> Result<Self, GeometryError> {
        Panel::new(width, height).map(Self::new)
    }

    /// Panel geometry
    pub const fn panel(&self) -> Panel {
        self.panel
    }

    /// Current rotation
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Set rotation by level (0-3); other values are ignored
    pub fn set_rotation(&mut self, level: u8) {
        if let Ok(rotation) = Rotation::try_from(level) {
            self.rotation = rotation;
        }
    }

    /// Global brightness (255 = unscaled)
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set global brightness
    ///
    /// Stored intensities are untouched; scaling happens on readout.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Set every stored intensity to 0
    pub fn clear(&mut self) {
        self.fill(0);
    }

    /// Set every stored intensity to `intensity`
    pub fn fill(&mut self, intensity: u8) {
        self.pixels.iter_mut().for_each(|p| *p = intensity);
    }

    /// Set one pixel in caller (rotated) coordinates
    ///
    /// Intensities above 255 are clamped. Points that land outside the
    /// panel after rotation are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, intensity: u16) {
        let Some((px, py)) = self.panel.transform(self.rotation, x, y) else {
            return;
        };
        let value = intensity.min(u16::from(u8::MAX)) as u8;
        let index = self.panel.index(px, py);
        if let Some(slot) = self.pixels.get_mut(index) {
            *slot = value;
        }
    }

    /// Stored intensity at a physical (unrotated) coordinate
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= usize::from(self.panel.width()) || y >= usize::from(self.panel.height()) {
            return None;
        }
        self.pixels.get(self.panel.index(x, y)).copied()
    }

    /// Raw stored intensities, row-major in physical coordinates
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Blit a row-major monochrome bitmap with its top-left at (x, y)
    ///
    /// Cells missing from a short `data` slice are not drawn.
    pub fn draw_bitmap(&mut self, x: i32, y: i32, width: usize, height: usize, data: &[u8]) {
        if width == 0 {
            return;
        }
        for (row, line) in data.chunks(width).take(height).enumerate() {
            for (col, &value) in line.iter().enumerate() {
                let (px, py) = (x.saturating_add(col as i32), y.saturating_add(row as i32));
                self.set_pixel(px, py, u16::from(value));
            }
        }
    }

    /// Blit a row-major color bitmap, using the red channel as intensity
    pub fn draw_bitmap_rgb(&mut self, x: i32, y: i32, width: usize, height: usize, data: &[Rgb]) {
        if width == 0 {
            return;
        }
        for (row, line) in data.chunks(width).take(height).enumerate() {
            for (col, pixel) in line.iter().enumerate() {
                let (px, py) = (x.saturating_add(col as i32), y.saturating_add(row as i32));
                self.set_pixel(px, py, u16::from(pixel.r));
            }
        }
    }

    /// Apply global brightness to one stored intensity
    ///
    /// Truncating integer division, so 100 at brightness 200 gives 78.
    pub const fn scale(&self, value: u8) -> u8 {
        (value as u16 * self.brightness as u16 / 255) as u8
    }

    /// Brightness-scaled bytes for PWM block `block` (0..BLOCK_COUNT)
    ///
    /// LED positions past the end of the panel read as 0.
    pub fn scaled_block(&self, block: usize) -> [u8; BLOCK_LEN] {
        let mut out = [0u8; BLOCK_LEN];
        let start = block * BLOCK_LEN;
        if let Some(src) = self.pixels.get(start..) {
            for (dst, &value) in out.iter_mut().zip(src) {
                *dst = self.scale(value);
            }
        }
        out
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(Panel::default())
    }
}
