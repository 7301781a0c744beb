//! End-to-end tests of the conversion pipeline against a scripted engine.

use pdfsnap::{
    Bitmap, ConversionController, ConvertError, DocumentHandle, LoadError, MemSink,
    RecordingReporter, RenderEngine, RenderError, SelectionRequest, ValidationError,
};

/// Engine whose documents render a tiny solid bitmap. Individual pages can
/// be scripted to fail, and the whole load can be scripted to be rejected.
struct StubEngine {
    pages: usize,
    failing_pages: Vec<u32>,
    reject_load: bool,
}

impl StubEngine {
    fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            failing_pages: Vec::new(),
            reject_load: false,
        }
    }

    fn failing_on(pages: usize, failing_pages: &[u32]) -> Self {
        Self {
            pages,
            failing_pages: failing_pages.to_vec(),
            reject_load: false,
        }
    }

    fn rejecting() -> Self {
        Self {
            pages: 0,
            failing_pages: Vec::new(),
            reject_load: true,
        }
    }
}

impl RenderEngine for StubEngine {
    fn load(&self, _bytes: &[u8]) -> Result<Box<dyn DocumentHandle>, LoadError> {
        if self.reject_load {
            return Err(LoadError::EmptyDocument);
        }
        Ok(Box::new(StubDocument {
            pages: self.pages,
            failing_indexes: self
                .failing_pages
                .iter()
                .map(|page| (page - 1) as usize)
                .collect(),
        }))
    }
}

struct StubDocument {
    pages: usize,
    failing_indexes: Vec<usize>,
}

impl DocumentHandle for StubDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<Bitmap, RenderError> {
        // The controller must always ask for the fixed 2x oversampling.
        if (scale - 2.0).abs() > f32::EPSILON {
            return Err(RenderError::generic(format!("unexpected scale {scale}")));
        }
        if index >= self.pages {
            return Err(RenderError::PageOutOfBounds {
                index,
                page_count: self.pages,
            });
        }
        if self.failing_indexes.contains(&index) {
            return Err(RenderError::generic("scripted failure"));
        }

        Ok(Bitmap {
            pixels: vec![0xFF; 4 * 4 * 3],
            width: 4,
            height: 4,
        })
    }
}

fn loaded_controller(
    engine: &StubEngine,
    source_name: &str,
    sink: &mut MemSink,
    status: &mut RecordingReporter,
) -> ConversionController {
    let mut controller = ConversionController::new();
    controller
        .load(engine, b"%PDF-1.7", source_name, sink, status)
        .expect("stub load should succeed");
    controller
}

#[test]
fn load_reports_page_count_and_stem() {
    let engine = StubEngine::with_pages(9);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();

    let mut controller = ConversionController::new();
    let info = controller
        .load(&engine, b"%PDF-1.7", "My File (1).pdf", &mut sink, &mut status)
        .unwrap();

    assert_eq!(info.page_count, 9);
    assert_eq!(info.name_stem, "My_File__1_");
    assert!(status
        .messages
        .iter()
        .any(|m| m.contains("loaded successfully")));
}

#[test]
fn single_page_yields_one_named_artifact() {
    let engine = StubEngine::with_pages(5);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "My File (1).pdf", &mut sink, &mut status);

    let result = controller
        .convert(SelectionRequest::Single(Some(3)), &mut sink, &mut status)
        .unwrap();

    assert_eq!(result.requested, 1);
    assert_eq!(result.succeeded, 1);
    assert_eq!(sink.names(), vec!["My_File__1__page_3.png"]);

    let (_, bytes) = &sink.artifacts()[0];
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn range_outcomes_are_complete_and_ascending() {
    let engine = StubEngine::with_pages(10);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    let result = controller
        .convert(
            SelectionRequest::Range {
                start: Some(2),
                end: Some(5),
            },
            &mut sink,
            &mut status,
        )
        .unwrap();

    assert_eq!(result.requested, 4);
    assert_eq!(result.succeeded, 4);
    let pages: Vec<u32> = result.outcomes.iter().map(|o| o.page).collect();
    assert_eq!(pages, vec![2, 3, 4, 5]);
    assert_eq!(
        sink.names(),
        vec![
            "doc_page_2.png",
            "doc_page_3.png",
            "doc_page_4.png",
            "doc_page_5.png",
        ]
    );
}

#[test]
fn omitted_bounds_convert_the_whole_document() {
    let engine = StubEngine::with_pages(3);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    let result = controller
        .convert(
            SelectionRequest::Range {
                start: None,
                end: None,
            },
            &mut sink,
            &mut status,
        )
        .unwrap();

    assert_eq!(result.requested, 3);
    assert_eq!(result.succeeded, 3);
}

#[test]
fn failing_page_is_skipped_without_aborting_the_batch() {
    let engine = StubEngine::failing_on(5, &[3]);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    let result = controller
        .convert(
            SelectionRequest::Range {
                start: Some(1),
                end: Some(5),
            },
            &mut sink,
            &mut status,
        )
        .unwrap();

    assert_eq!(result.requested, 5);
    assert_eq!(result.succeeded, 4);

    for outcome in &result.outcomes {
        if outcome.page == 3 {
            assert!(!outcome.status.is_success());
        } else {
            assert!(outcome.status.is_success());
        }
    }

    assert_eq!(
        sink.names(),
        vec![
            "doc_page_1.png",
            "doc_page_2.png",
            "doc_page_4.png",
            "doc_page_5.png",
        ]
    );
    assert!(status
        .messages
        .iter()
        .any(|m| m == "Converted 4 of 5 pages successfully."));
}

#[test]
fn progress_messages_track_successful_completions() {
    let engine = StubEngine::with_pages(2);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    status.messages.clear();
    controller
        .convert(
            SelectionRequest::Range {
                start: None,
                end: None,
            },
            &mut sink,
            &mut status,
        )
        .unwrap();

    assert_eq!(
        status.messages,
        vec![
            "Converting page 1 of 2 (0/2 completed)...",
            "Converting page 2 of 2 (1/2 completed)...",
            "Converted 2 of 2 pages successfully.",
        ]
    );
}

#[test]
fn out_of_range_single_reports_the_valid_bounds() {
    let engine = StubEngine::with_pages(5);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    let err = controller
        .convert(SelectionRequest::Single(Some(9)), &mut sink, &mut status)
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::Invalid(ValidationError::OutOfRange { page_count: 5 })
    ));
    assert!(status
        .errors
        .iter()
        .any(|m| m.contains("between 1 and 5")));
    assert!(sink.artifacts().is_empty());
}

#[test]
fn rejected_selection_keeps_previous_artifacts() {
    let engine = StubEngine::with_pages(5);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap();
    assert_eq!(sink.names(), vec!["doc_page_1.png"]);

    let err = controller
        .convert(
            SelectionRequest::Range {
                start: Some(5),
                end: Some(2),
            },
            &mut sink,
            &mut status,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::Invalid(ValidationError::InvertedRange)
    ));
    // No render was attempted, so the last batch is still on display.
    assert_eq!(sink.names(), vec!["doc_page_1.png"]);
}

#[test]
fn new_batch_replaces_previous_artifacts() {
    let engine = StubEngine::with_pages(5);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap();
    controller
        .convert(SelectionRequest::Single(Some(2)), &mut sink, &mut status)
        .unwrap();

    assert_eq!(sink.names(), vec!["doc_page_2.png"]);
}

#[test]
fn loading_a_document_clears_displayed_artifacts() {
    let engine = StubEngine::with_pages(5);
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&engine, "doc.pdf", &mut sink, &mut status);

    controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap();
    assert_eq!(sink.artifacts().len(), 1);

    controller
        .load(&engine, b"%PDF-1.7", "other.pdf", &mut sink, &mut status)
        .unwrap();
    assert!(sink.artifacts().is_empty());
}

#[test]
fn convert_without_a_document_is_rejected() {
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = ConversionController::new();

    let err = controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap_err();

    assert!(matches!(err, ConvertError::NoDocument));
    assert!(status.errors.iter().any(|m| m == "Please load a PDF first."));
}

#[test]
fn failed_load_disables_conversion_until_reloaded() {
    let good = StubEngine::with_pages(3);
    let bad = StubEngine::rejecting();
    let mut sink = MemSink::new();
    let mut status = RecordingReporter::new();
    let mut controller = loaded_controller(&good, "doc.pdf", &mut sink, &mut status);

    assert!(controller
        .load(&bad, b"junk", "broken.pdf", &mut sink, &mut status)
        .is_err());
    assert!(status.errors.iter().any(|m| m.starts_with("Error loading PDF:")));

    let err = controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap_err();
    assert!(matches!(err, ConvertError::NoDocument));

    // LoadFailed is not terminal: a further load attempt recovers.
    controller
        .load(&good, b"%PDF-1.7", "doc.pdf", &mut sink, &mut status)
        .unwrap();
    let result = controller
        .convert(SelectionRequest::Single(Some(1)), &mut sink, &mut status)
        .unwrap();
    assert_eq!(result.succeeded, 1);
}
