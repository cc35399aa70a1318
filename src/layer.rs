use crate::backend::RasterBackend;
use crate::error::{Error, Result};
use crate::raster::Raster;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.
const BMP_HEADER_LEN: u32 = 40;

// Every layer is encoded as true color with an alpha channel.
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// The dimensions one layer of an ICO file should be rendered at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IconSize {
    /// The sizes used when none are given: 16x16, 24x24 and 32x32.
    pub const DEFAULTS: &'static [IconSize] = &[
        IconSize::square(16),
        IconSize::square(24),
        IconSize::square(32),
    ];

    /// Creates a `width` by `height` size.
    pub const fn new(width: u32, height: u32) -> IconSize {
        IconSize { width, height }
    }

    /// Creates a `side` by `side` size.
    pub const fn square(side: u32) -> IconSize {
        IconSize { width: side, height: side }
    }
}

impl From<(u32, u32)> for IconSize {
    fn from((width, height): (u32, u32)) -> IconSize {
        IconSize::new(width, height)
    }
}

impl From<u32> for IconSize {
    fn from(side: u32) -> IconSize {
        IconSize::square(side)
    }
}

//===========================================================================//

/// One image within an ICO file, already encoded as a 32-bpp BMP with an
/// AND mask.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedLayer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl EncodedLayer {
    /// Returns the number of payload bytes a `width` by `height` layer takes:
    /// the bitmap header, four bytes per pixel of color, and a 1-bpp mask
    /// whose rows are padded to whole 32-bit words.
    pub fn payload_size(width: u32, height: u32) -> u64 {
        let (width, height) = (width as u64, height as u64);
        BMP_HEADER_LEN as u64
            + width * height * 4
            + mask_row_len(width) * height
    }

    /// Encodes a raster at its own size.
    pub fn encode(raster: &Raster) -> Result<EncodedLayer> {
        let width = raster.width();
        let height = raster.height();
        let data_size = EncodedLayer::payload_size(width, height);
        if data_size > u32::MAX as u64 {
            return Err(Error::LayerTooLarge { width, height });
        }
        let mut data = Vec::<u8>::with_capacity(data_size as usize);

        // Write the BITMAPINFOHEADER struct.  The height counts the rows of
        // both the color data and the mask, so it is stored doubled.
        data.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;
        data.write_i32::<LittleEndian>(width as i32)?;
        data.write_i32::<LittleEndian>(2 * height as i32)?;
        data.write_u16::<LittleEndian>(1)?; // planes
        data.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
        data.write_u32::<LittleEndian>(0)?; // compression
        data.write_u32::<LittleEndian>(0)?; // image size
        data.write_i32::<LittleEndian>(0)?; // horz ppm
        data.write_i32::<LittleEndian>(0)?; // vert ppm
        data.write_u32::<LittleEndian>(0)?; // colors used
        data.write_u32::<LittleEndian>(0)?; // colors important
        debug_assert_eq!(data.len(), BMP_HEADER_LEN as usize);

        // Write the color data, starting from the *bottom* row.  Each pixel
        // is a little-endian 0xAARRGGBB word.
        for y in (0..height).rev() {
            for color in raster.row(y) {
                let word = (color.bitmap_alpha() as u32) << 24
                    | (color.red as u32) << 16
                    | (color.green as u32) << 8
                    | color.blue as u32;
                data.write_u32::<LittleEndian>(word)?;
            }
        }

        // Write the mask data, again from the bottom row.  A set bit marks a
        // pixel that is at most half opaque.  Bits are packed MSB-first into
        // 32-bit words that are written *big-endian*, unlike the color words
        // above; consumers expect exactly this layout.
        for y in (0..height).rev() {
            for chunk in raster.row(y).chunks(32) {
                let mut word = 0u32;
                for color in chunk {
                    let transparent = color.bitmap_alpha() <= 127;
                    word = (word << 1) | transparent as u32;
                }
                // Pad a short final word out to 32 bits with zeros.
                word <<= 32 - chunk.len() as u32;
                data.write_u32::<BigEndian>(word)?;
            }
        }

        debug_assert_eq!(data.len() as u64, data_size);
        Ok(EncodedLayer { width, height, data })
    }

    /// Resamples `raster` to `size` with `backend`, then encodes it.
    pub fn encode_at(
        backend: &dyn RasterBackend,
        raster: &Raster,
        size: IconSize,
    ) -> Result<EncodedLayer> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::ResampleFailed {
                width: size.width,
                height: size.height,
            });
        }
        // Refuse oversized layers before the backend allocates the raster.
        if EncodedLayer::payload_size(size.width, size.height) > u32::MAX as u64
        {
            return Err(Error::LayerTooLarge {
                width: size.width,
                height: size.height,
            });
        }
        let resampled = backend.resample(raster, size.width, size.height)?;
        if resampled.width() != size.width || resampled.height() != size.height
        {
            return Err(Error::ResampleFailed {
                width: size.width,
                height: size.height,
            });
        }
        EncodedLayer::encode(&resampled)
    }

    /// Returns the width of the layer, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the layer, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bits-per-pixel of the layer; always 32.
    pub fn bits_per_pixel(&self) -> u16 {
        BITS_PER_PIXEL
    }

    /// Returns the size of the layer's color palette; always 0 (true color).
    pub fn num_colors(&self) -> u8 {
        0
    }

    /// Returns the length of the encoded payload, in bytes.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Returns the encoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// Bytes per row of the AND mask: one bit per pixel, padded to 32 bits.
fn mask_row_len(width: u64) -> u64 {
    (width + 31) / 32 * 4
}

//===========================================================================//


//===========================================================================//
