#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The largest alpha value on the 7-bit scale (fully transparent).
pub const ALPHA_MAX: u8 = 127;

//===========================================================================//

/// A single pixel color.
///
/// The alpha channel uses a 7-bit scale running from 0 (fully opaque) to 127
/// (fully transparent), rather than the usual 8-bit scale where 255 is
/// opaque.  Use [`Color::from_rgba`] and [`Color::to_rgba`] to convert.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha on the 7-bit scale: 0 is opaque, 127 is transparent.
    pub alpha: u8,
}

impl Color {
    /// Creates a color; `alpha` is on the 7-bit scale and is clamped to 127.
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        let alpha = if alpha > ALPHA_MAX { ALPHA_MAX } else { alpha };
        Color { red, green, blue, alpha }
    }

    /// Creates a fully opaque color.
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue, alpha: 0 }
    }

    /// A fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, ALPHA_MAX);

    /// Converts from conventional 8-bit RGBA, where 255 is opaque.
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color { red, green, blue, alpha: ALPHA_MAX - (alpha >> 1) }
    }

    /// Converts to conventional 8-bit RGBA, where 255 is opaque.
    pub const fn to_rgba(&self) -> [u8; 4] {
        let alpha7 = if self.alpha > ALPHA_MAX { ALPHA_MAX } else { self.alpha };
        let alpha = 255 - ((alpha7 << 1) + (alpha7 >> 6));
        [self.red, self.green, self.blue, alpha]
    }

    /// Returns the alpha rescaled for a 32-bpp bitmap, computed as
    /// `round((1 - alpha / 127) * 255)`.
    pub fn bitmap_alpha(&self) -> u8 {
        let opacity = (ALPHA_MAX - self.alpha.min(ALPHA_MAX)) as u32;
        // Never lands exactly on .5, so rounding up at 63/127 matches
        // round-half-away-from-zero.
        ((opacity * 255 + 63) / ALPHA_MAX as u32) as u8
    }
}

//===========================================================================//

/// An immutable grid of pixels, stored row by row from the top.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Raster {
    /// Creates a raster from colors in row-major order from top to bottom.
    /// Panics if either dimension is zero or if `pixels` is the wrong length.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Raster {
        if width == 0 || height == 0 {
            panic!("Invalid raster size {}x{}", width, height);
        }
        let expected_len = (width as u64) * (height as u64);
        if (pixels.len() as u64) != expected_len {
            panic!(
                "Invalid pixel count (was {}, but must be {} for {}x{} raster)",
                pixels.len(),
                expected_len,
                width,
                height
            );
        }
        let pixels = pixels
            .into_iter()
            .map(|c| Color::new(c.red, c.green, c.blue, c.alpha))
            .collect();
        Raster { width, height, pixels }
    }

    /// Creates a raster from 8-bit RGBA data (`4 * width * height` bytes,
    /// top row first).  Panics under the same conditions as
    /// [`Raster::from_pixels`].
    pub fn from_rgba_data(width: u32, height: u32, rgba_data: &[u8]) -> Raster {
        let expected_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} raster)",
                rgba_data.len(),
                expected_len,
                width,
                height
            );
        }
        let pixels = rgba_data
            .chunks_exact(4)
            .map(|px| Color::from_rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Raster::from_pixels(width, height, pixels)
    }

    /// Creates a raster where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Raster {
        let len = (width as usize) * (height as usize);
        Raster::from_pixels(width, height, vec![color; len])
    }

    /// Returns the width of the raster, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the raster, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the color at column `x`, row `y` (from the top).  Panics if
    /// the coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Returns one row of pixels, `y` counted from the top.
    pub(crate) fn row(&self, y: u32) -> &[Color] {
        let width = self.width as usize;
        let start = (y as usize) * width;
        &self.pixels[start..start + width]
    }

    /// Returns 8-bit RGBA data for the raster, top row first.
    pub fn to_rgba_data(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for color in self.pixels.iter() {
            rgba.extend_from_slice(&color.to_rgba());
        }
        rgba
    }
}

//===========================================================================//


//===========================================================================//
