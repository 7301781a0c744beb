//! Rendering-engine capability seam
//!
//! The conversion pipeline never talks to a concrete PDF library directly;
//! it sees a loaded document through these traits. `MupdfEngine` is the
//! production implementation, tests script their own.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

/// Fixed oversampling factor applied when rasterizing a page.
///
/// 2x the nominal page size; not user-configurable.
pub const RENDER_SCALE: f32 = 2.0;

/// Document loading failed: bytes unparsable or format unsupported.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document has no pages")]
    EmptyDocument,
}

/// A single page failed to render or encode.
///
/// Recovered inside the per-page step; never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("PNG encoding: {0}")]
    Encode(#[from] image::ImageError),

    #[error("page index {index} out of bounds (document has {page_count} pages)")]
    PageOutOfBounds { index: usize, page_count: usize },

    #[error("{detail}")]
    Generic { detail: String },
}

impl RenderError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Raw rendered page image.
///
/// Tightly packed RGB pixel data (3 bytes per pixel) plus dimensions, the
/// intermediate format between the rendering engine and PNG encoding.
#[derive(Clone)]
pub struct Bitmap {
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Bitmap {
    /// Encode as a PNG byte stream, consuming the pixel buffer.
    pub fn encode_png(self) -> Result<Vec<u8>, RenderError> {
        let img: RgbImage = RgbImage::from_raw(self.width, self.height, self.pixels)
            .ok_or_else(|| RenderError::generic("bitmap buffer size mismatch"))?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// An opened document: page count plus per-page rendering.
pub trait DocumentHandle {
    /// Number of pages; at least 1 for a successfully loaded document.
    fn page_count(&self) -> usize;

    /// Render one page (0-indexed) at the given scale factor.
    fn render_page(&self, index: usize, scale: f32) -> Result<Bitmap, RenderError>;
}

/// Loads documents from raw bytes.
pub trait RenderEngine {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>, LoadError>;
}
