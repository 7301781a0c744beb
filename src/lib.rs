//! pdfsnap - convert selected pages of a PDF document into PNG images

pub mod controller;
pub mod engine;
pub mod mupdf_engine;
pub mod selection;
pub mod session;
pub mod settings;
pub mod sink;
pub mod source;
pub mod state;
pub mod status;

pub use controller::{
    BatchResult, ConversionController, ConvertError, OutcomeStatus, PageOutcome,
};
pub use engine::{Bitmap, DocumentHandle, LoadError, RenderEngine, RenderError, RENDER_SCALE};
pub use mupdf_engine::MupdfEngine;
pub use selection::{
    normalize_range, normalize_single, PageSelection, SelectionRequest, ValidationError,
};
pub use session::{name_stem, Session, SessionInfo};
pub use sink::{ArtifactSink, DirSink, MemSink};
pub use state::Mode;
pub use status::{ConsoleReporter, RecordingReporter, StatusReporter};
