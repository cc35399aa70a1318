use crate::backend::{ImageBackend, ImageSource, RasterBackend};
use crate::diagnostics::{Diagnostics, Event, NoopDiagnostics};
use crate::error::{Error, Result};
use crate::icondir;
use crate::layer::{EncodedLayer, IconSize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

//===========================================================================//

/// The MIME type of an ICO file.
pub const CONTENT_TYPE: &str = "image/x-icon";

//===========================================================================//

/// Collects rasters at several sizes and writes them out as one ICO file.
///
/// Sources can be added more than once, so that e.g. a hand-tuned small image
/// supplies the 16x16 layer while a larger image supplies the rest:
///
/// ```no_run
/// use favico::{IconAssembler, IconSize};
///
/// let mut icon = IconAssembler::new();
/// icon.add("icon-small.png", &[IconSize::square(16)]);
/// icon.add("icon-large.png", &[IconSize::square(32), IconSize::square(48)]);
/// assert!(icon.save("public/favicon.ico"));
/// ```
///
/// `add`, `save` and `render` never return errors; failures are reported to
/// the configured [`Diagnostics`] sink and signalled with `false`/`None`.
pub struct IconAssembler {
    backend: Box<dyn RasterBackend>,
    diagnostics: Box<dyn Diagnostics>,
    ready: bool,
    layers: Vec<EncodedLayer>,
}

impl IconAssembler {
    /// Creates an empty assembler using [`ImageBackend`] and discarding
    /// diagnostics.
    pub fn new() -> IconAssembler {
        IconAssembler::builder().build()
    }

    /// Starts configuring an assembler.
    pub fn builder() -> AssemblerBuilder {
        AssemblerBuilder::new()
    }

    /// Returns false if the backend was unavailable at construction, in
    /// which case every operation does nothing.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the layers added so far, in order.
    pub fn layers(&self) -> &[EncodedLayer] {
        &self.layers
    }

    /// Returns the number of layers added so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no layers have been added.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Renders `source` at each of `sizes` and appends the resulting layers.
    /// An empty `sizes` renders the source at its own dimensions.
    ///
    /// Each size is handled independently: one that fails is reported and
    /// skipped without affecting the others.  Returns true if at least one
    /// layer was added.
    pub fn add<'a, S>(&mut self, source: S, sizes: &[IconSize]) -> bool
    where
        S: Into<ImageSource<'a>>,
    {
        if !self.ready {
            return false;
        }
        let raster = match source.into().resolve(self.backend.as_ref()) {
            Ok(raster) => raster,
            Err(error) => {
                self.report(&error);
                return false;
            }
        };
        let native = [IconSize::new(raster.width(), raster.height())];
        let sizes = if sizes.is_empty() { &native[..] } else { sizes };
        let mut added = false;
        for &size in sizes {
            match EncodedLayer::encode_at(self.backend.as_ref(), &raster, size)
            {
                Ok(layer) => {
                    self.layers.push(layer);
                    added = true;
                }
                Err(error) => self.report(&error),
            }
        }
        added
    }

    /// Like [`add`](IconAssembler::add), with [`IconSize::DEFAULTS`].
    pub fn add_default_sizes<'a, S>(&mut self, source: S) -> bool
    where
        S: Into<ImageSource<'a>>,
    {
        self.add(source, IconSize::DEFAULTS)
    }

    /// Writes the ICO file to `writer`.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        if !self.ready {
            return Err(Error::BackendUnavailable);
        }
        icondir::write_icon_file(&self.layers, writer)
    }

    /// Returns the complete ICO file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let capacity = icondir::file_size(&self.layers) as usize;
        let mut data = Vec::with_capacity(capacity);
        self.write(&mut data)?;
        Ok(data)
    }

    /// Writes the ICO file to `path`, creating any missing parent
    /// directories.  Returns true only if the whole file was written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> bool {
        if !self.ready {
            return false;
        }
        match self.try_save(path.as_ref()) {
            Ok(()) => true,
            Err(error) => {
                self.report(&error);
                false
            }
        }
    }

    fn try_save(&self, path: &Path) -> Result<()> {
        let write_failed = |source: io::Error| Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }
        // Build the whole file before touching `path`, so that an empty
        // assembler leaves nothing behind.
        let data = self.to_bytes()?;
        // If `create` itself fails, whatever is already at `path` belongs to
        // someone else and is left alone.
        let mut file = fs::File::create(path).map_err(write_failed)?;
        let result = file
            .write_all(&data)
            .and_then(|()| file.sync_all())
            .map_err(write_failed);
        if result.is_err() {
            drop(file);
            let _ = fs::remove_file(path);
        }
        result
    }

    /// Returns the ICO file as an HTTP-style response, or `None` if there is
    /// nothing to send.
    pub fn render(&self) -> Option<IconResponse> {
        if !self.ready {
            return None;
        }
        match self.to_bytes() {
            Ok(body) => Some(IconResponse { body }),
            Err(error) => {
                self.report(&error);
                None
            }
        }
    }

    fn report(&self, error: &Error) {
        self.diagnostics.report(&Event::from_error(error));
    }
}

impl Default for IconAssembler {
    fn default() -> IconAssembler {
        IconAssembler::new()
    }
}

//===========================================================================//

/// Configures an [`IconAssembler`].
pub struct AssemblerBuilder {
    backend: Box<dyn RasterBackend>,
    diagnostics: Box<dyn Diagnostics>,
}

impl AssemblerBuilder {
    fn new() -> AssemblerBuilder {
        AssemblerBuilder {
            backend: Box::new(ImageBackend::new()),
            diagnostics: Box::new(NoopDiagnostics),
        }
    }

    /// Sets the backend used to load and resample images.
    pub fn backend<B: RasterBackend + 'static>(
        mut self,
        backend: B,
    ) -> AssemblerBuilder {
        self.backend = Box::new(backend);
        self
    }

    /// Sets where failures are reported.
    pub fn diagnostics<D: Diagnostics + 'static>(
        mut self,
        diagnostics: D,
    ) -> AssemblerBuilder {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Builds the assembler.  If the backend is unavailable this reports
    /// [`Error::BackendUnavailable`] once and returns an assembler on which
    /// every operation is a no-op.
    pub fn build(self) -> IconAssembler {
        let ready = self.backend.is_available();
        if !ready {
            self.diagnostics
                .report(&Event::from_error(&Error::BackendUnavailable));
        }
        IconAssembler {
            backend: self.backend,
            diagnostics: self.diagnostics,
            ready,
            layers: Vec::new(),
        }
    }
}

//===========================================================================//

/// A rendered ICO file, ready to send as a binary response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconResponse {
    body: Vec<u8>,
}

impl IconResponse {
    /// Returns the MIME type of the body, `image/x-icon`.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Returns the ICO file.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response and returns the ICO file.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Writes a `Content-Type` header, a blank line, and the body, as a CGI
    /// script would.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "Content-Type: {}\r\n\r\n", CONTENT_TYPE)?;
        writer.write_all(&self.body)?;
        writer.flush()
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{IconAssembler, IconResponse};
    use crate::layer::IconSize;
    use crate::raster::{Color, Raster};

    #[test]
    fn empty_assembler_renders_nothing() {
        let icon = IconAssembler::new();
        assert!(icon.is_ready());
        assert!(icon.is_empty());
        assert_eq!(icon.render(), None);
    }

    #[test]
    fn empty_sizes_use_native_dimensions() {
        let raster = Raster::filled(5, 7, Color::opaque(1, 2, 3));
        let mut icon = IconAssembler::new();
        assert!(icon.add(&raster, &[]));
        assert_eq!(icon.len(), 1);
        assert_eq!(icon.layers()[0].width(), 5);
        assert_eq!(icon.layers()[0].height(), 7);
    }

    #[test]
    fn clear_drops_layers() {
        let raster = Raster::filled(4, 4, Color::opaque(1, 2, 3));
        let mut icon = IconAssembler::new();
        assert!(icon.add(&raster, &[IconSize::square(4), IconSize::square(4)]));
        assert_eq!(icon.len(), 2);
        icon.clear();
        assert!(icon.is_empty());
    }

    #[test]
    fn response_write_to_prefixes_header() {
        let response = IconResponse { body: vec![0, 0, 1, 0] };
        let mut output = Vec::<u8>::new();
        response.write_to(&mut output).unwrap();
        assert_eq!(output, b"Content-Type: image/x-icon\r\n\r\n\x00\x00\x01\x00");
    }
}

//===========================================================================//
