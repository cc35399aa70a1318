use std::io;
use std::path::PathBuf;
use thiserror::Error;

//===========================================================================//

/// Errors produced while building an ICO file.
#[derive(Debug, Error)]
pub enum Error {
    /// The raster backend was not available when the assembler was built.
    #[error("No raster backend is available; ICO files cannot be generated")]
    BackendUnavailable,
    /// A source image was missing or could not be decoded.
    #[error("Unreadable image source {path:?}: {reason}")]
    UnreadableSource {
        /// The path that was being read.
        path: PathBuf,
        /// Why it couldn't be read.
        reason: String,
    },
    /// A raster could not be resampled to the requested size.
    #[error("Cannot resample raster to {width}x{height}")]
    ResampleFailed {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Output was requested before any layer was added.
    #[error("ICO file has no layers")]
    NoLayers,
    /// The directory count field is only 16 bits wide.
    #[error("Too many layers in ICO file (was {0}, but max is 65535)")]
    TooManyLayers(usize),
    /// The whole file would not fit the 32-bit payload offsets.
    #[error("ICO file would be {0} bytes, but max is 4294967295")]
    FileTooLarge(u64),
    /// A layer's payload would not fit in the 32-bit size field.
    #[error("Layer of {width}x{height} is too large to encode")]
    LayerTooLarge {
        /// Layer width.
        width: u32,
        /// Layer height.
        height: u32,
    },
    /// Writing the ICO file to disk failed.
    #[error("Failed to write {path:?}: {source}")]
    WriteFailed {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing the ICO stream to a caller-supplied writer failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns a short, stable name for this kind of error.
    pub fn kind(&self) -> &'static str {
        match *self {
            Error::BackendUnavailable => "backend_unavailable",
            Error::UnreadableSource { .. } => "unreadable_source",
            Error::ResampleFailed { .. } => "resample_failed",
            Error::NoLayers => "no_layers",
            Error::TooManyLayers(_) => "too_many_layers",
            Error::FileTooLarge(_) => "file_too_large",
            Error::LayerTooLarge { .. } => "layer_too_large",
            Error::WriteFailed { .. } => "write_failed",
            Error::Io(_) => "io",
        }
    }
}

/// A specialized `Result` for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::Error;
    use std::io;

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            Error::BackendUnavailable,
            Error::UnreadableSource {
                path: "a.png".into(),
                reason: "missing".to_string(),
            },
            Error::ResampleFailed { width: 0, height: 16 },
            Error::NoLayers,
            Error::TooManyLayers(70000),
            Error::FileTooLarge(1 << 33),
            Error::LayerTooLarge { width: 1, height: 1 },
            Error::WriteFailed {
                path: "a.ico".into(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            },
            Error::Io(io::Error::new(io::ErrorKind::Other, "closed")),
        ];
        let mut kinds: Vec<&str> = errors.iter().map(Error::kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn messages_name_the_size() {
        let error = Error::ResampleFailed { width: 0, height: 16 };
        assert_eq!(error.to_string(), "Cannot resample raster to 0x16");
    }
}

//===========================================================================//
