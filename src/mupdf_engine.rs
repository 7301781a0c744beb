//! MuPDF-backed rendering engine

use mupdf::{Colorspace, Document, Matrix, Pixmap};

use crate::engine::{Bitmap, DocumentHandle, LoadError, RenderEngine, RenderError};

/// Production engine: loads documents with MuPDF and rasterizes pages
/// through a scale matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct MupdfEngine;

impl RenderEngine for MupdfEngine {
    fn load(&self, bytes: &[u8]) -> Result<Box<dyn DocumentHandle>, LoadError> {
        let doc = Document::from_bytes(bytes, "application/pdf")?;
        let page_count = doc.page_count()? as usize;
        if page_count == 0 {
            return Err(LoadError::EmptyDocument);
        }

        Ok(Box::new(MupdfDocument { doc, page_count }))
    }
}

/// A successfully opened MuPDF document.
pub struct MupdfDocument {
    doc: Document,
    page_count: usize,
}

impl DocumentHandle for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<Bitmap, RenderError> {
        if index >= self.page_count {
            return Err(RenderError::PageOutOfBounds {
                index,
                page_count: self.page_count,
            });
        }

        let page = self.doc.load_page(index as i32)?;
        let transform = Matrix::new_scale(scale, scale);
        let rgb = Colorspace::device_rgb();

        // The pixmap lives only for this call; it is dropped before the
        // next page renders.
        let pixmap = page.to_pixmap(&transform, &rgb, false, false)?;
        let pixels = pixmap_to_rgb(&pixmap)?;

        Ok(Bitmap {
            pixels,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }
}

/// Repack pixmap samples into tightly packed RGB rows, dropping any padding
/// or extra channels.
fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderError::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    let expected_min = stride.saturating_mul(height);
    if samples.len() < expected_min || row_bytes > stride {
        return Err(RenderError::generic("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row_start = y * stride;
        let row = &samples[row_start..row_start + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(out)
}
