//! Paragraph structures: header, char-shape references, range tags, line
//! segments, and the page-split link.

use super::{ParagraphId, Table};
use serde::Serialize;

/// Fixed header fields of a PARA_HEADER record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParagraphHeader {
    /// Character count of the paragraph text.
    pub n_chars: u32,
    /// Control-character mask.
    pub control_mask: u32,
    /// Paragraph shape id (index into DocInfo para shapes).
    pub para_shape_id: u16,
    /// Named style id.
    pub para_style_id: u8,
    /// Column split kind.
    pub col_split: u8,
    /// Number of char-shape references.
    pub n_char_shapes: u16,
    /// Number of range tags.
    pub n_range_tags: u16,
    /// Number of line segments.
    pub n_line_segs: u16,
    /// Paragraph instance id.
    pub para_id: u32,
    /// Change-tracking merge flag, present from format 5.0.3.2.
    pub history_merge: u16,
}

/// A position → char-shape-id pair marking a shape change within the text.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CharShapeRef {
    pub pos: u32,
    pub id: u32,
}

/// A (start, end, tag) range annotation over the paragraph text.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RangeTag {
    pub start: u32,
    pub end: u32,
    pub tag: u32,
}

/// Line segment tag bits.
pub mod lineseg_tag {
    /// First line of a page.
    pub const PAGE_START: u32 = 1 << 0;
    /// First line of a column.
    pub const COL_START: u32 = 1 << 1;
    /// Empty line.
    pub const EMPTY: u32 = 1 << 16;
    /// Line start.
    pub const LINE_START: u32 = 1 << 17;
    /// Line end.
    pub const LINE_END: u32 = 1 << 18;
    /// Line ends with a hyphen.
    pub const HYPHEN: u32 = 1 << 19;
    /// Indented line.
    pub const INDENT: u32 = 1 << 20;
    /// Line holds a paragraph-heading marker.
    pub const PARA_HEADING: u32 = 1 << 21;
    /// Property line.
    pub const PROPERTY: u32 = 1 << 31;
}

/// Per-rendered-line layout metrics, stored verbatim from the producing
/// application.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LineSeg {
    /// Text offset of the first character on this line.
    pub text_start: u32,
    /// Vertical position within the page; zero marks the first line of a
    /// new page.
    pub v_pos: i32,
    pub line_height: i32,
    pub text_height: i32,
    pub base_line: i32,
    pub line_spacing: i32,
    pub col_offset: i32,
    pub segment_width: i32,
    /// Flag bitset, see [`lineseg_tag`].
    pub tag: u32,
}

/// A paragraph: text run, optional table, and per-line layout metadata.
///
/// When a paragraph's content spans a page break it is split in two: the
/// original half keeps line segments `[line_start, line_end)` and `link`
/// names the continuation half on the following page. Links form two-node
/// chains only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Paragraph {
    pub header: ParagraphHeader,
    pub char_shapes: Vec<CharShapeRef>,
    pub range_tags: Vec<RangeTag>,
    pub line_segs: Vec<LineSeg>,
    /// Decoded paragraph text, if a PARA_TEXT record was present.
    pub text: Option<String>,
    /// Embedded table, if a `tbl ` control was present.
    pub table: Option<Table>,
    /// Continuation (or origin) paragraph when split across a page break.
    pub link: Option<ParagraphId>,
    /// First line segment belonging to this half.
    pub line_start: usize,
    /// One past the last line segment belonging to this half.
    pub line_end: usize,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line segments belonging to this half of the paragraph.
    pub fn visible_line_segs(&self) -> &[LineSeg] {
        let end = self.line_end.min(self.line_segs.len());
        let start = self.line_start.min(end);
        &self.line_segs[start..end]
    }

    /// Plain text of this paragraph, empty if none was decoded.
    pub fn plain_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
