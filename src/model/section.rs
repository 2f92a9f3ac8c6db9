//! Section-level layout: section definition, page geometry, columns.

use super::{ColorRef, HwpUnit, HwpUnit16, ParagraphId, UNITS_PER_POINT};
use serde::Serialize;

/// Section definition fields from a `secd` control.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionDef {
    pub attr: u32,
    pub col_spacing: HwpUnit16,
    pub v_align: HwpUnit16,
    pub h_align: HwpUnit16,
    pub default_tab_size: HwpUnit,
    pub num_para_shape_id: u16,
    pub page_num: u16,
    pub image_num: u16,
    pub table_num: u16,
    pub math_num: u16,
    pub lang: u16,
}

/// Page geometry from a PAGE_DEF record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageDef {
    pub h_size: HwpUnit,
    pub v_size: HwpUnit,
    pub l_margin: HwpUnit,
    pub r_margin: HwpUnit,
    pub t_margin: HwpUnit,
    pub b_margin: HwpUnit,
    /// Header band height.
    pub header: HwpUnit,
    /// Footer band height.
    pub footer: HwpUnit,
    /// Binding margin.
    pub binding: HwpUnit,
    pub attr: u32,
}

impl PageDef {
    /// Page size in typographic points.
    pub fn size_pt(&self) -> (f64, f64) {
        (
            self.h_size as f64 / UNITS_PER_POINT,
            self.v_size as f64 / UNITS_PER_POINT,
        )
    }
}

/// Column attribute bit: all columns share one width.
pub const COL_ATTR_SAME_WIDTH: u32 = 1 << 12;

/// Column layout from a `cold` control.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnDef {
    pub attr: u32,
    pub n_cols: u16,
    /// Per-column widths, present only with [`COL_ATTR_SAME_WIDTH`].
    pub col_widths: Vec<u16>,
    pub border_kind: u8,
    pub border_weight: u8,
    pub border_color: ColorRef,
}

/// One BodyText (or ViewText) sub-stream's worth of content.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Section {
    /// Section index in stream order.
    pub index: usize,
    pub def_info: SectionDef,
    pub page_info: PageDef,
    pub col_info: ColumnDef,
    /// Top-level paragraphs in document order, as arena indices.
    pub paragraphs: Vec<ParagraphId>,
}

impl Section {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}
