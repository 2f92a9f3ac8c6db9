//! BodyText section stream decoding for HWP 5.0.
//!
//! A section stream is a flat record sequence whose nesting is carried by
//! the record level field. Decoding runs a level-indexed status stack:
//! each handler may consult the slot at its own level, seeded by the
//! record one level above it, and may seed the slot one level below for
//! its own children. Paragraphs land in the document arena; the section
//! and table cells hold arena ids.

use log::{debug, warn};

use crate::error::Result;
use crate::model::{
    CharShapeRef, CommonObject, Document, LineSeg, Paragraph, ParagraphHeader, ParagraphId,
    RangeTag, Section, Table, TableCell, COL_ATTR_SAME_WIDTH,
};

use super::header::Version;
use super::record::{RecordContext, TagId};

/// Control ids, packed big-endian from their four ASCII bytes so that a
/// little-endian read of the stream compares directly.
mod ctrl_id {
    pub const TABLE: u32 = u32::from_be_bytes(*b"tbl ");
    pub const SECTION_DEF: u32 = u32::from_be_bytes(*b"secd");
    pub const COLUMN_DEF: u32 = u32::from_be_bytes(*b"cold");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SlotState {
    #[default]
    Normal,
    Paragraph,
    CtrlTable,
    Table,
}

#[derive(Debug, Clone, Copy, Default)]
enum SlotOwner {
    #[default]
    None,
    Paragraph(ParagraphId),
    /// A table, addressed through its anchor paragraph.
    Table(ParagraphId),
    /// A cell, addressed through the anchor paragraph and cell index.
    Cell(ParagraphId, usize),
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    state: SlotState,
    owner: SlotOwner,
}

/// Decodes one section stream into a [`Section`], allocating the
/// paragraphs it references in the document arena.
///
/// Decoding is best-effort: a record that fails to decode is logged and
/// skipped, and the next record is framed from the stream position the
/// header declared.
pub fn parse_section(
    doc: &mut Document,
    data: &[u8],
    index: usize,
    version: Version,
) -> Section {
    let mut decoder = SectionDecoder {
        doc,
        section: Section::new(index),
        stack: Vec::new(),
    };
    let mut ctx = RecordContext::new(data, version);

    while ctx.pull() {
        let level = ctx.level as usize;
        let result = match ctx.tag() {
            TagId::ParaHeader => decoder.para_header(&mut ctx, level),
            TagId::ParaText => decoder.para_text(&mut ctx, level),
            TagId::ParaCharShape => decoder.para_char_shapes(&mut ctx, level),
            TagId::ParaLineSeg => decoder.para_line_segs(&mut ctx, level),
            TagId::ParaRangeTag => decoder.para_range_tags(&mut ctx, level),
            TagId::CtrlHeader => decoder.ctrl_header(&mut ctx, level),
            TagId::Table => decoder.table_attr(&mut ctx, level),
            TagId::ListHeader => decoder.list_header(&mut ctx, level),
            TagId::PageDef => decoder.page_def(&mut ctx),
            _ => {
                debug!("skipping section record tag {} at level {}", ctx.tag_id, level);
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("section record tag {} failed: {}", ctx.tag_id, err);
        }
    }

    decoder.section
}

struct SectionDecoder<'d> {
    doc: &'d mut Document,
    section: Section,
    stack: Vec<Slot>,
}

impl SectionDecoder<'_> {
    fn slot(&mut self, level: usize) -> &mut Slot {
        if self.stack.len() <= level {
            self.stack.resize_with(level + 1, Slot::default);
        }
        &mut self.stack[level]
    }

    /// Anchors a new paragraph at the section (level 0) or the current
    /// table cell, then seeds the child slot for its data records.
    fn para_header(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let mut para = Paragraph::new();
        para.header = decode_para_header(ctx)?;
        para.line_end = para.header.n_line_segs as usize;
        para.char_shapes = Vec::with_capacity(para.header.n_char_shapes as usize);
        para.range_tags = Vec::with_capacity(para.header.n_range_tags as usize);
        para.line_segs = Vec::with_capacity(para.header.n_line_segs as usize);

        let pid = self.doc.alloc_paragraph(para);

        if level == 0 {
            self.section.paragraphs.push(pid);
        } else {
            let slot = *self.slot(level);
            match (slot.state, slot.owner) {
                (SlotState::Table, SlotOwner::Cell(table_pid, cell)) => {
                    match self.cell_mut(table_pid, cell) {
                        Some(cell) => cell.paragraphs.push(pid),
                        None => warn!("paragraph at level {} names a missing cell", level),
                    }
                }
                _ => warn!("paragraph at level {} has no anchor", level),
            }
        }

        self.seed_child(
            level,
            Slot {
                state: SlotState::Paragraph,
                owner: SlotOwner::Paragraph(pid),
            },
        );
        Ok(())
    }

    /// Lookahead write: a handler at level L may write only slot L + 1.
    /// Same-level state updates go through slot() directly. Only
    /// paragraphs announce a container for their children this way.
    fn seed_child(&mut self, level: usize, slot: Slot) {
        debug_assert!(matches!(slot.state, SlotState::Paragraph));
        *self.slot(level + 1) = slot;
    }

    /// The paragraph seeded for this level, if its data records are valid
    /// here.
    fn current_paragraph(&mut self, level: usize) -> Option<ParagraphId> {
        let slot = *self.slot(level);
        match (slot.state, slot.owner) {
            (SlotState::Paragraph, SlotOwner::Paragraph(pid)) => Some(pid),
            _ => {
                warn!("paragraph data at level {} outside a paragraph", level);
                None
            }
        }
    }

    fn para_text(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let Some(pid) = self.current_paragraph(level) else {
            return Ok(());
        };
        decode_para_text(self.doc.paragraph_mut(pid), ctx)
    }

    fn para_char_shapes(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let Some(pid) = self.current_paragraph(level) else {
            return Ok(());
        };
        let para = self.doc.paragraph_mut(pid);
        for _ in 0..para.header.n_char_shapes {
            para.char_shapes.push(CharShapeRef {
                pos: ctx.read_u32()?,
                id: ctx.read_u32()?,
            });
        }
        Ok(())
    }

    fn para_line_segs(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let Some(pid) = self.current_paragraph(level) else {
            return Ok(());
        };
        let para = self.doc.paragraph_mut(pid);
        for _ in 0..para.header.n_line_segs {
            para.line_segs.push(LineSeg {
                text_start: ctx.read_u32()?,
                v_pos: ctx.read_i32()?,
                line_height: ctx.read_i32()?,
                text_height: ctx.read_i32()?,
                base_line: ctx.read_i32()?,
                line_spacing: ctx.read_i32()?,
                col_offset: ctx.read_i32()?,
                segment_width: ctx.read_i32()?,
                tag: ctx.read_u32()?,
            });
        }
        Ok(())
    }

    fn para_range_tags(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let Some(pid) = self.current_paragraph(level) else {
            return Ok(());
        };
        let para = self.doc.paragraph_mut(pid);
        for _ in 0..para.header.n_range_tags {
            para.range_tags.push(RangeTag {
                start: ctx.read_u32()?,
                end: ctx.read_u32()?,
                tag: ctx.read_u32()?,
            });
        }
        Ok(())
    }

    fn ctrl_header(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let id = ctx.read_u32()?;
        match id {
            ctrl_id::TABLE => {
                let mut table = Table::new();
                table.obj.ctrl_id = id;
                decode_common_object(&mut table.obj, ctx)?;

                let slot = *self.slot(level);
                let SlotOwner::Paragraph(pid) = slot.owner else {
                    warn!("table control at level {} outside a paragraph", level);
                    return Ok(());
                };
                self.doc.paragraph_mut(pid).table = Some(table);
                *self.slot(level) = Slot {
                    state: SlotState::CtrlTable,
                    owner: SlotOwner::Table(pid),
                };
            }
            ctrl_id::SECTION_DEF => decode_section_def(&mut self.section, ctx)?,
            ctrl_id::COLUMN_DEF => decode_column_def(&mut self.section, ctx)?,
            other => {
                debug!(
                    "unhandled control {:08x} ({})",
                    other,
                    ctrl_id_name(other)
                );
                self.slot(level).state = SlotState::Normal;
            }
        }
        Ok(())
    }

    fn table_attr(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        if level == 0 {
            warn!("table attributes at level 0");
            return Ok(());
        }
        let SlotOwner::Table(pid) = self.slot(level - 1).owner else {
            warn!("table attributes with no owning control");
            return Ok(());
        };

        let anchor = self.doc.paragraph_mut(pid);
        if let Some(table) = anchor.table.as_mut() {
            decode_table_attr(table, ctx)?;
            if ctx.remaining_in_record() != 0 {
                warn!(
                    "table record has {} undecoded bytes",
                    ctx.remaining_in_record()
                );
            }
        }
        self.slot(level).state = SlotState::Table;
        Ok(())
    }

    fn list_header(&mut self, ctx: &mut RecordContext, level: usize) -> Result<()> {
        let n_paragraphs = ctx.read_i16()?;
        let attr = ctx.read_u32()?;
        let unknown = ctx.read_i16()?;

        match self.slot(level).state {
            // A list directly under the table control is the caption.
            SlotState::CtrlTable => {}
            SlotState::Table => {
                if level == 0 {
                    return Ok(());
                }
                let SlotOwner::Table(pid) = self.slot(level - 1).owner else {
                    warn!("cell list with no owning table");
                    return Ok(());
                };

                let mut cell = TableCell::new();
                cell.n_paragraphs = n_paragraphs;
                cell.attr = attr;
                cell.unknown = unknown;
                decode_table_cell_attr(&mut cell, ctx)?;

                let Some(table) = self.doc.paragraph_mut(pid).table.as_mut() else {
                    warn!("cell list names a paragraph without a table");
                    return Ok(());
                };
                table.cells.push(cell);
                let index = table.cells.len() - 1;
                self.slot(level).owner = SlotOwner::Cell(pid, index);
            }
            _ => debug!("list header at level {} ignored", level),
        }
        Ok(())
    }

    fn page_def(&mut self, ctx: &mut RecordContext) -> Result<()> {
        let page = &mut self.section.page_info;
        page.h_size = ctx.read_unit()?;
        page.v_size = ctx.read_unit()?;
        page.l_margin = ctx.read_unit()?;
        page.r_margin = ctx.read_unit()?;
        page.t_margin = ctx.read_unit()?;
        page.b_margin = ctx.read_unit()?;
        page.header = ctx.read_unit()?;
        page.footer = ctx.read_unit()?;
        page.binding = ctx.read_unit()?;
        page.attr = ctx.read_u32()?;
        Ok(())
    }

    fn cell_mut(&mut self, table_pid: ParagraphId, cell: usize) -> Option<&mut TableCell> {
        self.doc
            .paragraph_mut(table_pid)
            .table
            .as_mut()?
            .cells
            .get_mut(cell)
    }
}

fn ctrl_id_name(id: u32) -> String {
    let bytes = id.to_be_bytes();
    bytes.iter().map(|&b| b as char).collect()
}

fn decode_para_header(ctx: &mut RecordContext) -> Result<ParagraphHeader> {
    let mut header = ParagraphHeader {
        n_chars: ctx.read_u32()?,
        control_mask: ctx.read_u32()?,
        para_shape_id: ctx.read_u16()?,
        para_style_id: ctx.read_u8()?,
        col_split: ctx.read_u8()?,
        n_char_shapes: ctx.read_u16()?,
        n_range_tags: ctx.read_u16()?,
        n_line_segs: ctx.read_u16()?,
        para_id: ctx.read_u32()?,
        history_merge: 0,
    };
    if ctx.check_version(5, 0, 3, 2) {
        header.history_merge = ctx.read_u16()?;
    }
    Ok(header)
}

/// Extracts the text run of a PARA_TEXT record.
///
/// The payload is a stream of UTF-16LE code units. Units 1 to 31 are
/// control codes carrying a 14-byte inline payload, which is skipped,
/// except for 9 (tab) and 10 (line break) which are kept as characters.
fn decode_para_text(para: &mut Paragraph, ctx: &mut RecordContext) -> Result<()> {
    let mut units = Vec::with_capacity(ctx.remaining_in_record() as usize / 2);

    while ctx.remaining_in_record() >= 2 {
        let unit = ctx.read_u16()?;
        match unit {
            0x09 | 0x0A => units.push(unit),
            0x01..=0x1F => ctx.skip(14.min(ctx.remaining_in_record()))?,
            _ => units.push(unit),
        }
    }

    let text = String::from_utf16(&units)?;
    para.text.get_or_insert_with(String::new).push_str(&text);
    Ok(())
}

fn decode_common_object(obj: &mut CommonObject, ctx: &mut RecordContext) -> Result<()> {
    // The control id has already been consumed.
    obj.attr = ctx.read_u32()?;
    obj.v_offset = ctx.read_unit()?;
    obj.h_offset = ctx.read_unit()?;
    obj.width = ctx.read_unit()?;
    obj.height = ctx.read_unit()?;
    obj.z_order = ctx.read_i32()?;
    obj.l_spacing = ctx.read_unit16()?;
    obj.r_spacing = ctx.read_unit16()?;
    obj.t_spacing = ctx.read_unit16()?;
    obj.b_spacing = ctx.read_unit16()?;
    obj.instance_id = ctx.read_u32()?;
    obj.page_split = ctx.read_i32()?;

    let n_desc = ctx.read_u16()?;
    let mut units = Vec::with_capacity(n_desc as usize);
    for _ in 0..n_desc {
        units.push(ctx.read_u16()?);
    }
    obj.desc = String::from_utf16(&units)?;
    Ok(())
}

fn decode_table_attr(table: &mut Table, ctx: &mut RecordContext) -> Result<()> {
    table.flags = ctx.read_u32()?;
    table.n_rows = ctx.read_u16()?;
    table.n_cols = ctx.read_u16()?;
    table.cell_spacing = ctx.read_unit16()?;
    table.l_margin = ctx.read_unit16()?;
    table.r_margin = ctx.read_unit16()?;
    table.t_margin = ctx.read_unit16()?;
    table.b_margin = ctx.read_unit16()?;

    table.row_heights = Vec::with_capacity(table.n_rows as usize);
    for _ in 0..table.n_rows {
        table.row_heights.push(ctx.read_u16()?);
    }

    table.border_fill_id = ctx.read_u16()?;

    if ctx.check_version(5, 0, 1, 0) {
        let n_zones = ctx.read_u16()?;
        table.zones = Vec::with_capacity(n_zones as usize);
        for _ in 0..n_zones {
            table.zones.push(ctx.read_u16()?);
        }
    }
    Ok(())
}

fn decode_table_cell_attr(cell: &mut TableCell, ctx: &mut RecordContext) -> Result<()> {
    cell.col_addr = ctx.read_u16()?;
    cell.row_addr = ctx.read_u16()?;
    cell.col_span = ctx.read_u16()?;
    cell.row_span = ctx.read_u16()?;
    cell.width = ctx.read_unit()?;
    cell.height = ctx.read_unit()?;
    cell.l_margin = ctx.read_unit16()?;
    cell.r_margin = ctx.read_unit16()?;
    cell.t_margin = ctx.read_unit16()?;
    cell.b_margin = ctx.read_unit16()?;
    cell.border_fill_id = ctx.read_u16()?;
    Ok(())
}

fn decode_section_def(section: &mut Section, ctx: &mut RecordContext) -> Result<()> {
    let def = &mut section.def_info;
    def.attr = ctx.read_u32()?;
    def.col_spacing = ctx.read_unit16()?;
    def.v_align = ctx.read_unit16()?;
    def.h_align = ctx.read_unit16()?;
    def.default_tab_size = ctx.read_unit()?;
    def.num_para_shape_id = ctx.read_u16()?;
    def.page_num = ctx.read_u16()?;
    def.image_num = ctx.read_u16()?;
    def.table_num = ctx.read_u16()?;
    def.math_num = ctx.read_u16()?;
    def.lang = ctx.read_u16()?;
    Ok(())
}

fn decode_column_def(section: &mut Section, ctx: &mut RecordContext) -> Result<()> {
    let col = &mut section.col_info;
    col.attr = ctx.read_u16()? as u32;
    col.n_cols = ((col.attr >> 2) & 0xFF) as u16;

    col.col_widths = Vec::new();
    if col.attr & COL_ATTR_SAME_WIDTH != 0 {
        col.col_widths.reserve(col.n_cols as usize);
        for _ in 0..col.n_cols {
            col.col_widths.push(ctx.read_u16()?);
        }
    }

    // The attribute's high half follows the width table.
    col.attr |= (ctx.read_u16()? as u32) << 16;

    col.border_kind = ctx.read_u8()?;
    col.border_weight = ctx.read_u8()?;
    col.border_color = ctx.read_color()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwp5::record::test_support::record;

    fn para_header_payload(n_chars: u32, n_char_shapes: u16, n_line_segs: u16) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&n_chars.to_le_bytes());
        p.extend_from_slice(&0u32.to_le_bytes()); // control mask
        p.extend_from_slice(&1u16.to_le_bytes()); // para shape id
        p.push(0); // para style id
        p.push(0); // column split
        p.extend_from_slice(&n_char_shapes.to_le_bytes());
        p.extend_from_slice(&0u16.to_le_bytes()); // range tags
        p.extend_from_slice(&n_line_segs.to_le_bytes());
        p.extend_from_slice(&7u32.to_le_bytes()); // instance id
        p
    }

    fn text_payload(units: &[u16]) -> Vec<u8> {
        units.iter().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn line_seg_payload(v_positions: &[i32]) -> Vec<u8> {
        let mut p = Vec::new();
        for (i, &v_pos) in v_positions.iter().enumerate() {
            p.extend_from_slice(&(i as u32 * 10).to_le_bytes()); // text start
            p.extend_from_slice(&v_pos.to_le_bytes());
            for field in [1000i32, 800, 600, 200, 0, 42000] {
                p.extend_from_slice(&field.to_le_bytes());
            }
            p.extend_from_slice(&0u32.to_le_bytes()); // tag
        }
        p
    }

    fn common_object_payload() -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0u32.to_le_bytes()); // attr
        for unit in [0i32, 0, 40000, 8000] {
            p.extend_from_slice(&unit.to_le_bytes());
        }
        p.extend_from_slice(&0i32.to_le_bytes()); // z order
        for spacing in [0i16; 4] {
            p.extend_from_slice(&spacing.to_le_bytes());
        }
        p.extend_from_slice(&0u32.to_le_bytes()); // instance id
        p.extend_from_slice(&0i32.to_le_bytes()); // page split
        p.extend_from_slice(&0u16.to_le_bytes()); // no description
        p
    }

    fn table_ctrl_payload() -> Vec<u8> {
        let mut p = ctrl_id::TABLE.to_le_bytes().to_vec();
        p.extend_from_slice(&common_object_payload());
        p
    }

    fn table_attr_payload(n_rows: u16, n_cols: u16) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&0u32.to_le_bytes()); // flags
        p.extend_from_slice(&n_rows.to_le_bytes());
        p.extend_from_slice(&n_cols.to_le_bytes());
        for spacing in [0i16; 5] {
            p.extend_from_slice(&spacing.to_le_bytes());
        }
        for _ in 0..n_rows {
            p.extend_from_slice(&1000u16.to_le_bytes());
        }
        p.extend_from_slice(&0u16.to_le_bytes()); // border fill
        p
    }

    fn cell_list_payload(col_addr: u16, row_addr: u16) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&1i16.to_le_bytes()); // paragraph count
        p.extend_from_slice(&0u32.to_le_bytes()); // attr
        p.extend_from_slice(&0i16.to_le_bytes()); // unknown
        p.extend_from_slice(&col_addr.to_le_bytes());
        p.extend_from_slice(&row_addr.to_le_bytes());
        p.extend_from_slice(&1u16.to_le_bytes()); // col span
        p.extend_from_slice(&1u16.to_le_bytes()); // row span
        p.extend_from_slice(&20000i32.to_le_bytes()); // width
        p.extend_from_slice(&4000i32.to_le_bytes()); // height
        for margin in [141i16; 4] {
            p.extend_from_slice(&margin.to_le_bytes());
        }
        p.extend_from_slice(&0u16.to_le_bytes()); // border fill
        p
    }

    fn parse(doc: &mut Document, data: &[u8]) -> Section {
        parse_section(doc, data, 0, Version::new(5, 0, 0, 0))
    }

    #[test]
    fn test_paragraph_with_text_and_line_segs() {
        let mut data = record(66, 0, &para_header_payload(6, 0, 1));
        data.extend_from_slice(&record(67, 1, &text_payload(&[0x48, 0x65, 0x6C, 0x6C, 0x6F])));
        data.extend_from_slice(&record(69, 1, &line_seg_payload(&[0])));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);

        assert_eq!(section.paragraphs.len(), 1);
        let para = doc.paragraph(section.paragraphs[0]);
        assert_eq!(para.plain_text(), "Hello");
        assert_eq!(para.line_segs.len(), 1);
        assert_eq!(para.line_segs[0].v_pos, 0);
        assert_eq!(para.line_end, 1);
    }

    #[test]
    fn test_inline_controls_are_skipped_tab_and_break_kept() {
        // 'A', tab, inline control 0x0B with its 14-byte payload, line
        // break, 'B'.
        let mut units = vec![0x41u16, 0x09, 0x0B];
        units.extend_from_slice(&[0u16; 7]); // 14 bytes of control payload
        units.extend_from_slice(&[0x0A, 0x42]);

        let mut data = record(66, 0, &para_header_payload(5, 0, 0));
        data.extend_from_slice(&record(67, 1, &text_payload(&units)));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);
        let para = doc.paragraph(section.paragraphs[0]);
        assert_eq!(para.plain_text(), "A\t\nB");
    }

    #[test]
    fn test_table_cells_and_cell_paragraphs() {
        let mut data = record(66, 0, &para_header_payload(1, 0, 1));
        data.extend_from_slice(&record(71, 1, &table_ctrl_payload()));
        data.extend_from_slice(&record(77, 2, &table_attr_payload(1, 2)));
        // Two cells, each followed by its paragraph.
        data.extend_from_slice(&record(72, 2, &cell_list_payload(0, 0)));
        data.extend_from_slice(&record(66, 2, &para_header_payload(1, 0, 1)));
        data.extend_from_slice(&record(67, 3, &text_payload(&[0x4C])));
        data.extend_from_slice(&record(72, 2, &cell_list_payload(1, 0)));
        data.extend_from_slice(&record(66, 2, &para_header_payload(1, 0, 1)));
        data.extend_from_slice(&record(67, 3, &text_payload(&[0x52])));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);

        assert_eq!(section.paragraphs.len(), 1);
        let anchor = doc.paragraph(section.paragraphs[0]);
        let table = anchor.table.as_ref().unwrap();
        assert_eq!(table.n_rows, 1);
        assert_eq!(table.n_cols, 2);
        assert_eq!(table.cells.len(), 2);
        assert_eq!(table.cells[0].col_addr, 0);
        assert_eq!(table.cells[1].col_addr, 1);
        assert_eq!(table.cells[0].paragraphs.len(), 1);
        assert_eq!(table.cells[1].paragraphs.len(), 1);

        assert_eq!(doc.paragraph(table.cells[0].paragraphs[0]).plain_text(), "L");
        assert_eq!(doc.paragraph(table.cells[1].paragraphs[0]).plain_text(), "R");
    }

    #[test]
    fn test_section_and_page_geometry() {
        let mut secd = ctrl_id::SECTION_DEF.to_le_bytes().to_vec();
        secd.extend_from_slice(&0x1000u32.to_le_bytes()); // attr
        for v in [1134i16, 0, 0] {
            secd.extend_from_slice(&v.to_le_bytes());
        }
        secd.extend_from_slice(&4000i32.to_le_bytes()); // tab size
        for v in [0u16; 6] {
            secd.extend_from_slice(&v.to_le_bytes());
        }

        let mut page_def = Vec::new();
        // A4 portrait in hwp units.
        for v in [59528i32, 84188, 8504, 8504, 5668, 4252, 4252, 4252, 0] {
            page_def.extend_from_slice(&v.to_le_bytes());
        }
        page_def.extend_from_slice(&0u32.to_le_bytes());

        let mut data = record(66, 0, &para_header_payload(1, 0, 1));
        data.extend_from_slice(&record(71, 1, &secd));
        data.extend_from_slice(&record(73, 1, &page_def));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);

        assert_eq!(section.def_info.attr, 0x1000);
        assert_eq!(section.def_info.col_spacing, 1134);
        assert_eq!(section.def_info.default_tab_size, 4000);
        assert_eq!(section.page_info.h_size, 59528);
        assert_eq!(section.page_info.v_size, 84188);
        let (w_pt, h_pt) = section.page_info.size_pt();
        assert!((w_pt - 595.28).abs() < 1e-9);
        assert!((h_pt - 841.88).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_control_resets_slot() {
        let mut ctrl = u32::from_be_bytes(*b"gso ").to_le_bytes().to_vec();
        ctrl.extend_from_slice(&[0u8; 8]);

        let mut data = record(66, 0, &para_header_payload(1, 0, 1));
        data.extend_from_slice(&record(71, 1, &ctrl));
        // Text after an unknown control must not attach to anything.
        data.extend_from_slice(&record(67, 1, &text_payload(&[0x58])));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);
        let para = doc.paragraph(section.paragraphs[0]);
        assert_eq!(para.text, None);
    }

    #[test]
    fn test_char_shape_refs_use_declared_count() {
        let mut refs = Vec::new();
        for (pos, id) in [(0u32, 3u32), (4, 1)] {
            refs.extend_from_slice(&pos.to_le_bytes());
            refs.extend_from_slice(&id.to_le_bytes());
        }

        let mut data = record(66, 0, &para_header_payload(8, 2, 0));
        data.extend_from_slice(&record(68, 1, &refs));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);
        let para = doc.paragraph(section.paragraphs[0]);
        assert_eq!(para.char_shapes.len(), 2);
        assert_eq!(para.char_shapes[1].pos, 4);
        assert_eq!(para.char_shapes[1].id, 1);
    }

    #[test]
    fn test_column_def_same_width_table() {
        // Low attr half: two columns, same-width bit set.
        let attr_low: u16 = (2 << 2) | (1 << 12);
        let mut cold = ctrl_id::COLUMN_DEF.to_le_bytes().to_vec();
        cold.extend_from_slice(&attr_low.to_le_bytes());
        cold.extend_from_slice(&100u16.to_le_bytes());
        cold.extend_from_slice(&200u16.to_le_bytes());
        cold.extend_from_slice(&0xABCDu16.to_le_bytes()); // attr high half
        cold.push(1); // border kind
        cold.push(2); // border weight
        cold.extend_from_slice(&0u32.to_le_bytes());

        let mut data = record(66, 0, &para_header_payload(1, 0, 1));
        data.extend_from_slice(&record(71, 1, &cold));

        let mut doc = Document::new();
        let section = parse(&mut doc, &data);
        assert_eq!(section.col_info.n_cols, 2);
        assert_eq!(section.col_info.col_widths, vec![100, 200]);
        assert_eq!(section.col_info.attr >> 16, 0xABCD);
        assert_eq!(section.col_info.border_weight, 2);
    }
}
