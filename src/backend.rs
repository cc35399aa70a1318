use crate::error::{Error, Result};
use crate::raster::Raster;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

//===========================================================================//

/// The raster capability an [`IconAssembler`](crate::IconAssembler) relies
/// on: turning a path into a [`Raster`], and resampling rasters to a target
/// size.
pub trait RasterBackend {
    /// Returns false if this backend cannot do any work at all.  An assembler
    /// built on an unavailable backend turns every operation into a no-op.
    fn is_available(&self) -> bool {
        true
    }

    /// Loads and decodes the image at `path`.
    fn resolve(&self, path: &Path) -> Result<Raster>;

    /// Returns a copy of `raster` resampled to exactly `width` by `height`.
    fn resample(&self, raster: &Raster, width: u32, height: u32)
        -> Result<Raster>;
}

//===========================================================================//

/// The default backend: decodes PNG files and resamples with the `image`
/// crate.
#[derive(Clone, Copy, Debug)]
pub struct ImageBackend {
    filter: FilterType,
}

impl ImageBackend {
    /// Creates a backend that resamples with a Lanczos filter.
    pub fn new() -> ImageBackend {
        ImageBackend { filter: FilterType::Lanczos3 }
    }

    /// Sets the filter used when resampling.
    pub fn with_filter(mut self, filter: FilterType) -> ImageBackend {
        self.filter = filter;
        self
    }

    /// Returns the filter used when resampling.
    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Decodes a PNG stream into a raster.
    pub fn decode_png<R: Read>(&self, reader: R) -> Result<Raster> {
        decode_png(reader).map_err(|reason| Error::UnreadableSource {
            path: PathBuf::new(),
            reason,
        })
    }
}

impl Default for ImageBackend {
    fn default() -> ImageBackend {
        ImageBackend::new()
    }
}

impl RasterBackend for ImageBackend {
    fn resolve(&self, path: &Path) -> Result<Raster> {
        let unreadable = |reason: String| Error::UnreadableSource {
            path: path.to_path_buf(),
            reason,
        };
        let file =
            File::open(path).map_err(|err| unreadable(err.to_string()))?;
        decode_png(BufReader::new(file)).map_err(unreadable)
    }

    fn resample(
        &self,
        raster: &Raster,
        width: u32,
        height: u32,
    ) -> Result<Raster> {
        if width == 0 || height == 0 {
            return Err(Error::ResampleFailed { width, height });
        }
        if raster.width() == width && raster.height() == height {
            return Ok(raster.clone());
        }
        let source = RgbaImage::from_raw(
            raster.width(),
            raster.height(),
            raster.to_rgba_data(),
        )
        .ok_or(Error::ResampleFailed { width, height })?;
        let resized = imageops::resize(&source, width, height, self.filter);
        Ok(Raster::from_rgba_data(width, height, resized.as_raw()))
    }
}

//===========================================================================//

fn decode_png<R: Read>(reader: R) -> std::result::Result<Raster, String> {
    let mut decoder = png::Decoder::new(reader);
    // Palettes, low bit depths and 16-bit channels all come out as 8-bit
    // samples.
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::STRIP_16,
    );
    let mut png_reader = decoder
        .read_info()
        .map_err(|error| format!("Malformed PNG data: {}", error))?;
    let mut buffer = vec![0u8; png_reader.output_buffer_size()];
    let frame = png_reader
        .next_frame(&mut buffer)
        .map_err(|error| format!("Malformed PNG data: {}", error))?;
    buffer.truncate(frame.buffer_size());
    if frame.width == 0 || frame.height == 0 {
        return Err(format!(
            "Invalid PNG size {}x{}",
            frame.width, frame.height
        ));
    }
    if frame.bit_depth != png::BitDepth::Eight {
        return Err(format!("Unsupported PNG bit depth: {:?}", frame.bit_depth));
    }
    let rgba_data = match frame.color_type {
        png::ColorType::Rgba => buffer,
        png::ColorType::Rgb => {
            let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
            for rgb in buffer.chunks_exact(3) {
                rgba.extend_from_slice(rgb);
                rgba.push(u8::MAX);
            }
            rgba
        }
        png::ColorType::GrayscaleAlpha => {
            let mut rgba = Vec::with_capacity(buffer.len() * 2);
            for pair in buffer.chunks_exact(2) {
                rgba.extend_from_slice(&[pair[0], pair[0], pair[0], pair[1]]);
            }
            rgba
        }
        png::ColorType::Grayscale => {
            let mut rgba = Vec::with_capacity(buffer.len() * 4);
            for &gray in buffer.iter() {
                rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
            }
            rgba
        }
        png::ColorType::Indexed => {
            return Err("Indexed PNG data was not expanded".to_string());
        }
    };
    Ok(Raster::from_rgba_data(frame.width, frame.height, &rgba_data))
}

//===========================================================================//

/// Where the pixels for [`IconAssembler::add`](crate::IconAssembler::add)
/// come from.
#[derive(Clone, Copy, Debug)]
pub enum ImageSource<'a> {
    /// An image file, decoded by the backend.
    Path(&'a Path),
    /// A raster the caller has already decoded.
    Raster(&'a Raster),
}

impl<'a> ImageSource<'a> {
    /// Resolves this source into a raster, borrowing if it already is one.
    pub(crate) fn resolve(
        self,
        backend: &dyn RasterBackend,
    ) -> Result<Cow<'a, Raster>> {
        match self {
            ImageSource::Path(path) => backend.resolve(path).map(Cow::Owned),
            ImageSource::Raster(raster) => Ok(Cow::Borrowed(raster)),
        }
    }
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> ImageSource<'a> {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> ImageSource<'a> {
        ImageSource::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for ImageSource<'a> {
    fn from(path: &'a str) -> ImageSource<'a> {
        ImageSource::Path(Path::new(path))
    }
}

impl<'a> From<&'a Raster> for ImageSource<'a> {
    fn from(raster: &'a Raster) -> ImageSource<'a> {
        ImageSource::Raster(raster)
    }
}

//===========================================================================//


//===========================================================================//
