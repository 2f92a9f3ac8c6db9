//! Document root: sections, pages, and the paragraph arena.

use super::{DocumentInfo, Page, Paragraph, ParagraphId, Section};
use serde::Serialize;

/// A fully parsed HWP v5 document.
///
/// Paragraphs live in one flat arena; sections, pages, and table cells
/// refer to them by [`ParagraphId`]. Sections and pages are in document
/// order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    /// Format version string, e.g. "5.0.3.2".
    pub version: Option<String>,
    /// Global tables from the DocInfo stream.
    pub info: DocumentInfo,
    /// Sections in stream order.
    pub sections: Vec<Section>,
    /// Pages produced by the page-breaking pass.
    pub pages: Vec<Page>,
    /// Preview text from the PrvText stream, if present.
    pub preview_text: Option<String>,

    paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages after page breaking.
    pub fn n_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Adds a paragraph to the arena and returns its id.
    pub fn alloc_paragraph(&mut self, paragraph: Paragraph) -> ParagraphId {
        let id = ParagraphId(self.paragraphs.len() as u32);
        self.paragraphs.push(paragraph);
        id
    }

    pub fn paragraph(&self, id: ParagraphId) -> &Paragraph {
        &self.paragraphs[id.index()]
    }

    pub fn paragraph_mut(&mut self, id: ParagraphId) -> &mut Paragraph {
        &mut self.paragraphs[id.index()]
    }

    /// Total number of paragraphs in the arena, including table-cell
    /// content and split continuations.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Iterates over a section's top-level paragraphs.
    pub fn section_paragraphs<'a>(
        &'a self,
        section: &'a Section,
    ) -> impl Iterator<Item = &'a Paragraph> {
        section.paragraphs.iter().map(|id| self.paragraph(*id))
    }

    /// Plain text of the whole document, one line per paragraph, in
    /// document order including table cell content.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for section in &self.sections {
            for &id in &section.paragraphs {
                self.collect_text(id, &mut lines);
            }
        }
        lines.join("\n")
    }

    fn collect_text(&self, id: ParagraphId, lines: &mut Vec<String>) {
        let paragraph = self.paragraph(id);
        if let Some(text) = &paragraph.text {
            lines.push(text.clone());
        }
        if let Some(table) = &paragraph.table {
            for cell in &table.cells {
                for &cell_para in &cell.paragraphs {
                    self.collect_text(cell_para, lines);
                }
            }
        }
    }

    /// Serializes the model tree to pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
