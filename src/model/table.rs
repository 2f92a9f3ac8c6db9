//! Table structures for the document model.

use super::{HwpUnit, HwpUnit16, ParagraphId};
use serde::Serialize;

/// Common object header shared by floating controls, read right after the
/// control id of a CTRL_HEADER record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommonObject {
    pub ctrl_id: u32,
    pub attr: u32,
    pub v_offset: HwpUnit,
    pub h_offset: HwpUnit,
    pub width: HwpUnit,
    pub height: HwpUnit,
    pub z_order: i32,
    pub l_spacing: HwpUnit16,
    pub r_spacing: HwpUnit16,
    pub t_spacing: HwpUnit16,
    pub b_spacing: HwpUnit16,
    pub instance_id: u32,
    pub page_split: i32,
    /// Object description text.
    pub desc: String,
}

/// A table control: geometry plus an ordered cell sequence.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    pub obj: CommonObject,
    pub flags: u32,
    pub n_rows: u16,
    pub n_cols: u16,
    pub cell_spacing: HwpUnit16,
    pub l_margin: HwpUnit16,
    pub r_margin: HwpUnit16,
    pub t_margin: HwpUnit16,
    pub b_margin: HwpUnit16,
    /// One height per row.
    pub row_heights: Vec<u16>,
    pub border_fill_id: u16,
    /// Valid-zone info, present from format 5.0.1.0.
    pub zones: Vec<u16>,
    /// Cells in record-stream order; grid addresses are preserved verbatim.
    pub cells: Vec<TableCell>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn last_cell_mut(&mut self) -> Option<&mut TableCell> {
        self.cells.last_mut()
    }
}

/// A table cell; its content is a mini document of paragraphs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableCell {
    /// Paragraph count from the introducing LIST_HEADER record.
    pub n_paragraphs: i16,
    /// Attribute word from the LIST_HEADER record.
    pub attr: u32,
    /// Unknown trailing LIST_HEADER field, kept verbatim.
    pub unknown: i16,

    pub col_addr: u16,
    pub row_addr: u16,
    pub col_span: u16,
    pub row_span: u16,

    pub width: HwpUnit,
    pub height: HwpUnit,

    pub l_margin: HwpUnit16,
    pub r_margin: HwpUnit16,
    pub t_margin: HwpUnit16,
    pub b_margin: HwpUnit16,

    pub border_fill_id: u16,

    /// Content paragraphs, stored as arena indices.
    pub paragraphs: Vec<ParagraphId>,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }
}
