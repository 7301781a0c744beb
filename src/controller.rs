//! The batch page-conversion pipeline
//!
//! Runs a page selection through the rendering engine one page at a time,
//! in ascending order, skipping pages that fail and reporting progress
//! after every step.

use log::{debug, info, warn};

use crate::engine::{DocumentHandle, LoadError, RenderEngine, RenderError, RENDER_SCALE};
use crate::selection::{SelectionRequest, ValidationError};
use crate::session::{Session, SessionInfo};
use crate::sink::ArtifactSink;
use crate::state::Mode;
use crate::status::StatusReporter;

/// Command-level rejection: the batch never started.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Please load a PDF first.")]
    NoDocument,

    #[error("A conversion is already in progress.")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Per-page failure: render, encode, or publish. Recovered by skipping
/// the page.
#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("artifact output: {0}")]
    Publish(#[from] std::io::Error),
}

/// Outcome of one attempted page.
#[derive(Clone, Debug)]
pub struct PageOutcome {
    /// 1-based page number
    pub page: u32,
    pub status: OutcomeStatus,
}

#[derive(Clone, Debug)]
pub enum OutcomeStatus {
    /// Artifact published under this name.
    Succeeded { name: String },
    Failed { reason: String },
}

impl OutcomeStatus {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Tally for one conversion command. Never persisted past it.
#[derive(Clone, Debug)]
pub struct BatchResult {
    pub requested: usize,
    pub succeeded: usize,
    /// One outcome per attempted page, in ascending page order.
    pub outcomes: Vec<PageOutcome>,
}

/// Owns the session and drives conversion commands against it.
pub struct ConversionController {
    session: Session,
    mode: Mode,
}

impl ConversionController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Session::empty(),
            mode: Mode::default(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Load a document into the session, replacing the previous one.
    ///
    /// Artifacts from earlier batches are discarded as soon as the load
    /// starts; on failure the session is left empty and the engine's
    /// diagnostic is surfaced through the status reporter.
    pub fn load(
        &mut self,
        engine: &dyn RenderEngine,
        bytes: &[u8],
        source_name: &str,
        sink: &mut dyn ArtifactSink,
        status: &mut dyn StatusReporter,
    ) -> Result<SessionInfo, LoadError> {
        self.mode.begin_load();
        status.status("Loading PDF...");
        sink.begin_batch();

        match self.session.load(engine, bytes, source_name) {
            Ok(info) => {
                self.mode.finish_load(true);
                status.status(&format!(
                    "PDF \"{source_name}\" loaded successfully. Select pages to convert."
                ));
                Ok(info)
            }
            Err(e) => {
                self.mode.finish_load(false);
                status.error(&format!("Error loading PDF: {e}"));
                Err(e)
            }
        }
    }

    /// Run one conversion command over the current session.
    ///
    /// Rejected outright when no document is loaded or another command is in
    /// flight; a selection that fails normalization is surfaced without
    /// touching any page. Once the batch starts it always runs to the end of
    /// the selection, and the controller is back in `Ready` afterwards
    /// whatever happened in between.
    pub fn convert(
        &mut self,
        request: SelectionRequest,
        sink: &mut dyn ArtifactSink,
        status: &mut dyn StatusReporter,
    ) -> Result<BatchResult, ConvertError> {
        if !self.mode.try_begin_convert() {
            let err = if self.mode.is_converting() {
                ConvertError::Busy
            } else {
                ConvertError::NoDocument
            };
            status.error(&err.to_string());
            return Err(err);
        }

        let result = self.run_batch(request, sink, status);
        self.mode.finish_convert();
        result
    }

    fn run_batch(
        &self,
        request: SelectionRequest,
        sink: &mut dyn ArtifactSink,
        status: &mut dyn StatusReporter,
    ) -> Result<BatchResult, ConvertError> {
        let page_count = self.session.page_count() as u32;
        let selection = match request.normalize(page_count) {
            Ok(selection) => selection,
            Err(e) => {
                status.error(&e.to_string());
                return Err(e.into());
            }
        };

        let Some(document) = self.session.document() else {
            let err = ConvertError::NoDocument;
            status.error(&err.to_string());
            return Err(err);
        };

        sink.begin_batch();

        let requested = selection.count();
        let end = selection.end;
        let mut outcomes = Vec::with_capacity(requested);
        let mut succeeded = 0usize;

        for page in selection.pages() {
            status.status(&format!(
                "Converting page {page} of {end} ({succeeded}/{requested} completed)..."
            ));

            match convert_page(document, page, self.session.name_stem(), sink) {
                Ok(name) => {
                    debug!("page {page} published as {name}");
                    succeeded += 1;
                    outcomes.push(PageOutcome {
                        page,
                        status: OutcomeStatus::Succeeded { name },
                    });
                }
                Err(e) => {
                    warn!("Skipping page {page} due to conversion failure: {e}");
                    outcomes.push(PageOutcome {
                        page,
                        status: OutcomeStatus::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        status.status(&format!(
            "Converted {succeeded} of {requested} pages successfully."
        ));
        info!("batch finished: {succeeded}/{requested} pages");

        Ok(BatchResult {
            requested,
            succeeded,
            outcomes,
        })
    }
}

impl Default for ConversionController {
    fn default() -> Self {
        Self::new()
    }
}

/// Render, encode, and publish one page. The rendered bitmap is consumed by
/// the encode step, so per-page buffers never outlive the iteration.
fn convert_page(
    document: &dyn DocumentHandle,
    page: u32,
    name_stem: &str,
    sink: &mut dyn ArtifactSink,
) -> Result<String, PageError> {
    let index = (page - 1) as usize;
    let bitmap = document.render_page(index, RENDER_SCALE)?;
    let png = bitmap.encode_png().map_err(PageError::Render)?;

    let name = format!("{name_stem}_page_{page}.png");
    sink.publish(&name, &png)?;
    Ok(name)
}
