//! Panel geometry and rotation
//!
//! Storage geometry is fixed when the panel is described; rotation only
//! changes how caller coordinates are mapped onto it.

/// Number of LEDs one IS31FL3731 can drive (6 blocks x 24 PWM registers)
pub const MAX_LEDS: usize = 144;

/// Panel description errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Width or height is zero
    ZeroSize,
    /// width x height exceeds the controller's LED count
    TooManyLeds,
}

/// Clockwise display rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// 0° (identity)
    #[default]
    Deg0,
    /// 90° clockwise
    Deg90,
    /// 180°
    Deg180,
    /// 270° clockwise
    Deg270,
}

impl Rotation {
    /// Rotation level (0-3)
    pub const fn as_u8(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Whether this rotation swaps the x and y axes
    pub const fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            other => Err(other),
        }
    }
}

/// Physical panel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Panel {
    width: u8,
    height: u8,
}

impl Panel {
    /// The 16x9 charlieplexed panel the IS31FL3731 is usually sold with
    pub const CHARLIEPLEX_16X9: Panel = Panel {
        width: 16,
        height: 9,
    };

    /// Describe a panel
    ///
    /// Fails if either side is zero or the panel has more LEDs than the
    /// controller can address.
    pub fn new(width: u8, height: u8) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroSize);
        }
        if usize::from(width) * usize::from(height) > MAX_LEDS {
            return Err(GeometryError::TooManyLeds);
        }
        Ok(Self { width, height })
    }

    /// Physical width in pixels
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Physical height in pixels
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Total number of pixels (always <= [`MAX_LEDS`])
    pub const fn led_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Drawable (width, height) as seen by callers under `rotation`
    pub const fn logical_size(&self, rotation: Rotation) -> (u8, u8) {
        if rotation.is_transposed() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Map caller coordinates to physical coordinates
    ///
    /// Returns `None` when the transformed point falls outside the panel.
    pub fn transform(&self, rotation: Rotation, x: i32, y: i32) -> Option<(usize, usize)> {
        let width = i32::from(self.width);
        let height = i32::from(self.height);

        let (px, py) = match rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (width - y - 1, x),
            Rotation::Deg180 => (width - x - 1, height - y - 1),
            Rotation::Deg270 => (y, height - x - 1),
        };

        if px < 0 || px >= width || py < 0 || py >= height {
            return None;
        }
        Some((px as usize, py as usize))
    }

    /// Row-major storage index of a physical coordinate
    pub const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width as usize
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::CHARLIEPLEX_16X9
    }
}
