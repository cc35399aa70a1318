//! A library for assembling multi-resolution favicon ICO files.
//!
//! An [`IconAssembler`] takes one or more source images, renders each at the
//! requested sizes, and encodes every rendering as a 32-bpp BMP layer with a
//! 1-bpp transparency mask.  The layers are then written out as a single ICO
//! file, either to disk or as a binary `image/x-icon` response.
//!
//! ```no_run
//! use favico::{IconAssembler, TracingDiagnostics};
//!
//! let mut icon = IconAssembler::builder()
//!     .diagnostics(TracingDiagnostics)
//!     .build();
//! icon.add_default_sizes("logo.png");
//! icon.save("public/favicon.ico");
//! ```

#![warn(missing_docs)]

mod assembler;
mod backend;
mod diagnostics;
mod error;
mod icondir;
mod layer;
mod raster;

pub use crate::assembler::{
    AssemblerBuilder, IconAssembler, IconResponse, CONTENT_TYPE,
};
pub use crate::backend::{ImageBackend, ImageSource, RasterBackend};
pub use crate::diagnostics::{
    Diagnostics, Event, NoopDiagnostics, TracingDiagnostics,
};
pub use crate::error::{Error, Result};
pub use crate::layer::{EncodedLayer, IconSize};
pub use crate::raster::{Color, Raster, ALPHA_MAX};
pub use image::imageops::FilterType;
