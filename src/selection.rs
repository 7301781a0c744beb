//! Page selection and normalization

/// Selection rejected before any render was attempted.
///
/// The display text doubles as the user-facing status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid page number between 1 and {page_count}.")]
    OutOfRange { page_count: u32 },

    #[error("Start page cannot be greater than end page.")]
    InvertedRange,
}

/// A validated conversion target: an inclusive page range.
///
/// A single page is the degenerate range `[n, n]`. Invariant after
/// normalization: `1 <= start <= end <= page_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSelection {
    pub start: u32,
    pub end: u32,
}

impl PageSelection {
    /// Number of pages in the selection.
    #[must_use]
    pub fn count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    /// Pages in ascending order, 1-based.
    #[must_use]
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// An unvalidated selection as the user expressed it. `None` models an
/// absent or non-numeric input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRequest {
    Single(Option<u32>),
    Range {
        start: Option<u32>,
        end: Option<u32>,
    },
}

impl SelectionRequest {
    pub fn normalize(self, page_count: u32) -> Result<PageSelection, ValidationError> {
        match self {
            Self::Single(page) => normalize_single(page, page_count),
            Self::Range { start, end } => normalize_range(start, end, page_count),
        }
    }
}

/// Validate a single page number against the document's page count.
pub fn normalize_single(
    page: Option<u32>,
    page_count: u32,
) -> Result<PageSelection, ValidationError> {
    match page {
        Some(n) if n >= 1 && n <= page_count => Ok(PageSelection { start: n, end: n }),
        _ => Err(ValidationError::OutOfRange { page_count }),
    }
}

/// Normalize a range with the absent-means-edge convention: a missing or
/// below-range start means "from the beginning", a missing or above-range
/// end means "to the end".
pub fn normalize_range(
    start: Option<u32>,
    end: Option<u32>,
    page_count: u32,
) -> Result<PageSelection, ValidationError> {
    let start = match start {
        Some(s) if s >= 1 => s,
        _ => 1,
    };
    let end = match end {
        Some(e) if e <= page_count => e,
        _ => page_count,
    };

    if start > page_count || end < 1 {
        return Err(ValidationError::OutOfRange { page_count });
    }
    if start > end {
        return Err(ValidationError::InvertedRange);
    }

    Ok(PageSelection { start, end })
}
