//! DocInfo stream decoding for HWP 5.0.
//!
//! DocInfo carries the document-wide tables: object counts, binary-data
//! references, font faces, and the character and paragraph shape tables
//! that body paragraphs reference by index.

use log::warn;

use crate::error::Result;
use crate::model::docinfo::{
    font_face_attr, BinDataItem, CharShape, DocumentInfo, DocumentProperties,
    FontFace, FontTable, FontTypeInfo, IdCategory, IdMappings, ParaShape, CHAR_SHAPE_LANGS,
    MAX_ID_MAPPINGS,
};

use super::header::Version;
use super::record::{RecordContext, TagId};

/// Decodes a DocInfo stream into the document-wide tables.
///
/// Decoding is best-effort: a malformed record is logged and skipped, and
/// the tables built so far are kept.
pub fn parse_docinfo(data: &[u8], version: Version) -> DocumentInfo {
    let mut info = DocumentInfo::default();
    let mut ctx = RecordContext::new(data, version);

    while ctx.pull() {
        let result = match ctx.tag() {
            TagId::DocumentProperties => {
                parse_document_properties(&mut ctx).map(|props| info.properties = props)
            }
            TagId::IdMappings => parse_id_mappings(&mut ctx).map(|maps| {
                info.bin_items = Vec::with_capacity(maps.count(IdCategory::BinaryData) as usize);
                info.fonts = FontTable::with_counts(&maps);
                info.char_shapes =
                    Vec::with_capacity(maps.count(IdCategory::CharShapes) as usize);
                info.para_shapes =
                    Vec::with_capacity(maps.count(IdCategory::ParaShapes) as usize);
                info.id_maps = maps;
            }),
            TagId::BinData => parse_bin_data(&mut ctx).map(|item| {
                let declared = info.id_maps.count(IdCategory::BinaryData) as usize;
                if info.bin_items.len() < declared {
                    info.bin_items.push(item);
                } else {
                    warn!("binary-data entry beyond declared count {}", declared);
                }
            }),
            TagId::FaceName => parse_face_name(&mut ctx).map(|face| {
                if !info.fonts.push(face) {
                    warn!(
                        "font face beyond declared count {}",
                        info.fonts.declared_total()
                    );
                }
            }),
            TagId::CharShape => parse_char_shape(&mut ctx).map(|shape| {
                let declared = info.id_maps.count(IdCategory::CharShapes) as usize;
                if info.char_shapes.len() < declared {
                    info.char_shapes.push(shape);
                } else {
                    warn!("char shape beyond declared count {}", declared);
                }
            }),
            TagId::ParaShape => parse_para_shape(&mut ctx).map(|shape| {
                let declared = info.id_maps.count(IdCategory::ParaShapes) as usize;
                if info.para_shapes.len() < declared {
                    info.para_shapes.push(shape);
                } else {
                    warn!("para shape beyond declared count {}", declared);
                }
            }),
            _ => {
                log::debug!("skipping DocInfo record tag {}", ctx.tag_id);
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("DocInfo record tag {} failed: {}", ctx.tag_id, err);
        }
    }

    info
}

fn parse_document_properties(ctx: &mut RecordContext) -> Result<DocumentProperties> {
    Ok(DocumentProperties {
        n_sections: ctx.read_u16()?,
        start_page_num: ctx.read_u16()?,
        start_footnote_num: ctx.read_u16()?,
        start_endnote_num: ctx.read_u16()?,
        start_picture_num: ctx.read_u16()?,
        start_table_num: ctx.read_u16()?,
        start_math_num: ctx.read_u16()?,
        list_id: ctx.read_u32()?,
        paragraph_id: ctx.read_u32()?,
        char_unit_pos: ctx.read_u32()?,
    })
}

/// Number of ID-mapping entries present at a given format version.
fn id_mappings_len(ctx: &RecordContext) -> usize {
    let mut n = 15;
    if ctx.check_version(5, 0, 2, 1) {
        n += 1; // memo shapes
    }
    if ctx.check_version(5, 0, 3, 2) {
        n += 2; // history, history users
    }
    n
}

fn parse_id_mappings(ctx: &mut RecordContext) -> Result<IdMappings> {
    let n = id_mappings_len(ctx).min(MAX_ID_MAPPINGS);
    let mut maps = IdMappings::default();
    for index in 0..n {
        maps.set_count(index, ctx.read_u32()?);
    }
    Ok(maps)
}

fn parse_bin_data(ctx: &mut RecordContext) -> Result<BinDataItem> {
    let mut item = BinDataItem {
        attr: ctx.read_u16()?,
        ..BinDataItem::default()
    };

    if item.is_link() {
        item.link_abs_path = Some(ctx.read_string()?);
        item.link_rel_path = Some(ctx.read_string()?);
    } else {
        item.bindata_id = ctx.read_u16()?;
    }

    // Store-type items carry only the id.
    if item.is_embed() {
        item.ext = Some(ctx.read_string()?);
    }

    Ok(item)
}

fn parse_face_name(ctx: &mut RecordContext) -> Result<FontFace> {
    let mut face = FontFace {
        attr: ctx.read_u8()?,
        ..FontFace::default()
    };
    face.name = ctx.read_string()?;

    if face.attr & font_face_attr::ALT_FONT != 0 {
        face.alt_attr = ctx.read_u8()?;
        face.alt_name = Some(ctx.read_string()?);
    }
    if face.attr & font_face_attr::FONT_TYPE != 0 {
        face.type_info = Some(FontTypeInfo {
            family: ctx.read_u8()?,
            serif: ctx.read_u8()?,
            weight: ctx.read_u8()?,
            proportion: ctx.read_u8()?,
            contrast: ctx.read_u8()?,
            stroke: ctx.read_u8()?,
            kind: ctx.read_u8()?,
            char_kind: ctx.read_u8()?,
            midline: ctx.read_u8()?,
            x_height: ctx.read_u8()?,
        });
    }
    if face.attr & font_face_attr::DEF_FONT != 0 {
        face.default_name = Some(ctx.read_string()?);
    }

    Ok(face)
}

fn parse_char_shape(ctx: &mut RecordContext) -> Result<CharShape> {
    let mut shape = CharShape::default();

    for id in shape.face_ids.iter_mut() {
        *id = ctx.read_u16()?;
    }
    for lang in 0..CHAR_SHAPE_LANGS {
        shape.widths[lang] = ctx.read_u8()?;
    }
    for lang in 0..CHAR_SHAPE_LANGS {
        shape.spacings[lang] = ctx.read_u8()?;
    }
    for lang in 0..CHAR_SHAPE_LANGS {
        shape.rel_sizes[lang] = ctx.read_u8()?;
    }
    for lang in 0..CHAR_SHAPE_LANGS {
        shape.rel_positions[lang] = ctx.read_u8()?;
    }

    shape.base_size = ctx.read_i32()?;
    shape.attr = ctx.read_u32()?;
    shape.shadow_gap_x = ctx.read_i8()?;
    shape.shadow_gap_y = ctx.read_i8()?;
    shape.char_color = ctx.read_color()?;
    shape.underline_color = ctx.read_color()?;
    shape.shade_color = ctx.read_color()?;
    shape.shadow_color = ctx.read_color()?;

    if ctx.check_version(5, 0, 2, 1) {
        shape.border_fill_id = Some(ctx.read_u16()?);
    }
    if ctx.check_version(5, 0, 3, 0) {
        shape.midline_color = Some(ctx.read_color()?);
    }

    Ok(shape)
}

fn parse_para_shape(ctx: &mut RecordContext) -> Result<ParaShape> {
    let mut shape = ParaShape {
        attr1: ctx.read_u32()?,
        l_margin: ctx.read_i32()?,
        r_margin: ctx.read_i32()?,
        indent: ctx.read_i32()?,
        u_spacing: ctx.read_i32()?,
        d_spacing: ctx.read_i32()?,
        ..ParaShape::default()
    };

    if !ctx.check_version(5, 0, 1, 7) {
        shape.line_spacing_old = Some(ctx.read_i32()?);
    }

    shape.tab_def_id = ctx.read_u16()?;
    shape.numbering_id = ctx.read_u16()?;
    shape.border_fill_id = ctx.read_u16()?;
    shape.border_l_spacing = ctx.read_i16()?;
    shape.border_r_spacing = ctx.read_i16()?;
    shape.border_u_spacing = ctx.read_i16()?;
    shape.border_d_spacing = ctx.read_i16()?;

    if ctx.check_version(5, 0, 1, 7) {
        shape.attr2 = Some(ctx.read_u32()?);
    }
    if !ctx.check_version(5, 0, 2, 5) {
        shape.attr3 = Some(ctx.read_u32()?);
    }

    Ok(shape)
}
