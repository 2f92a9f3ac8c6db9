//! Pages produced by the page-breaking pass.

use super::ParagraphId;
use serde::Serialize;

/// A rendered page: a view over paragraphs owned by the document.
///
/// Pages never own paragraphs. A paragraph appears on exactly one page, or
/// is split so each half appears on a different page via the paragraph link
/// mechanism.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Index of the owning section, for page geometry.
    pub section: usize,
    /// Paragraphs laid out on this page, in document order.
    pub paragraphs: Vec<ParagraphId>,
}

impl Page {
    pub fn new(section: usize) -> Self {
        Self {
            section,
            paragraphs: Vec::new(),
        }
    }
}
