//! Session lifecycle: one loaded document at a time

use log::info;
use regex::Regex;

use crate::engine::{DocumentHandle, LoadError, RenderEngine};

/// Derive an artifact name stem from a source file or URL name.
///
/// Strips a trailing `.pdf` suffix (case-insensitive), then replaces every
/// character outside `[A-Za-z0-9_-]` with `_`. Idempotent.
pub fn name_stem(source_name: &str) -> String {
    let pdf_suffix = Regex::new(r"(?i)\.pdf$").unwrap();
    let invalid_chars = Regex::new(r"[^A-Za-z0-9_-]").unwrap();

    let stem = pdf_suffix.replace(source_name, "");
    invalid_chars.replace_all(&stem, "_").into_owned()
}

/// What a successful load reports back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub name_stem: String,
    pub page_count: usize,
}

/// The currently loaded document, its derived name stem, and its page count.
///
/// Exactly one session is live at a time; a load replaces its contents
/// wholesale. A failed load leaves it empty with a page count of 0.
pub struct Session {
    document: Option<Box<dyn DocumentHandle>>,
    name_stem: String,
    page_count: usize,
}

impl Session {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            document: None,
            name_stem: String::new(),
            page_count: 0,
        }
    }

    /// Load a document, replacing whatever this session held before.
    ///
    /// The prior handle is dropped before the engine runs, so a failed load
    /// cannot leave a stale document behind.
    pub fn load(
        &mut self,
        engine: &dyn RenderEngine,
        bytes: &[u8],
        source_name: &str,
    ) -> Result<SessionInfo, LoadError> {
        self.document = None;
        self.name_stem.clear();
        self.page_count = 0;

        let handle = engine.load(bytes)?;
        let page_count = handle.page_count();

        self.name_stem = name_stem(source_name);
        self.page_count = page_count;
        self.document = Some(handle);

        info!(
            "loaded \"{}\": {} pages, name stem \"{}\"",
            source_name, page_count, self.name_stem
        );

        Ok(SessionInfo {
            name_stem: self.name_stem.clone(),
            page_count,
        })
    }

    #[must_use]
    pub fn document(&self) -> Option<&dyn DocumentHandle> {
        self.document.as_deref()
    }

    #[must_use]
    pub fn name_stem(&self) -> &str {
        &self.name_stem
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}
