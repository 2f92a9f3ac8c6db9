//! Document-wide tables decoded from the DocInfo stream.

use super::ColorRef;
use serde::Serialize;

/// Number of languages a char shape carries per-language arrays for.
pub const CHAR_SHAPE_LANGS: usize = 7;

/// ID-mapping categories, in stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(usize)]
pub enum IdCategory {
    BinaryData = 0,
    KoreanFonts = 1,
    EnglishFonts = 2,
    HanjaFonts = 3,
    JapaneseFonts = 4,
    OthersFonts = 5,
    SymbolFonts = 6,
    UserFonts = 7,
    BorderFills = 8,
    CharShapes = 9,
    TabDefs = 10,
    Numberings = 11,
    Bullets = 12,
    ParaShapes = 13,
    Styles = 14,
    /// Present from format 5.0.2.1.
    MemoShapes = 15,
    /// Present from format 5.0.3.2.
    History = 16,
    /// Present from format 5.0.3.2.
    HistoryUser = 17,
}

/// Total number of ID-mapping categories across all format versions.
pub const MAX_ID_MAPPINGS: usize = 18;

/// Per-category object counts declared near the start of DocInfo.
#[derive(Debug, Clone, Serialize)]
pub struct IdMappings {
    counts: [u32; MAX_ID_MAPPINGS],
}

impl Default for IdMappings {
    fn default() -> Self {
        Self {
            counts: [0; MAX_ID_MAPPINGS],
        }
    }
}

impl IdMappings {
    pub fn count(&self, category: IdCategory) -> u32 {
        self.counts[category as usize]
    }

    pub fn set_count(&mut self, index: usize, count: u32) {
        self.counts[index] = count;
    }

    /// Sum of the seven font-language counts.
    pub fn total_fonts(&self) -> u32 {
        FontLanguage::ALL
            .iter()
            .map(|lang| self.count(lang.category()))
            .sum()
    }
}

/// Document property block (DOCUMENT_PROPERTIES record).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentProperties {
    pub n_sections: u16,
    pub start_page_num: u16,
    pub start_footnote_num: u16,
    pub start_endnote_num: u16,
    pub start_picture_num: u16,
    pub start_table_num: u16,
    pub start_math_num: u16,
    pub list_id: u32,
    pub paragraph_id: u32,
    pub char_unit_pos: u32,
}

/// Binary-data attribute masks.
pub mod bindata_attr {
    pub const TYPE_MASK: u16 = 0xF;
    pub const TYPE_LINK: u16 = 0;
    pub const TYPE_EMBED: u16 = 1;
    pub const TYPE_STORE: u16 = 2;

    pub const COMPRESS_MASK: u16 = 0xF << 4;
    pub const COMPRESS_FOLLOW: u16 = 0 << 4;
    pub const COMPRESS_YES: u16 = 1 << 4;
    pub const COMPRESS_NO: u16 = 2 << 4;

    pub const ACCESS_MASK: u16 = 0xF << 8;
}

/// One BIN_DATA reference: a linked file, an embedded item, or a storage id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BinDataItem {
    pub attr: u16,
    /// Absolute path of a linked file.
    pub link_abs_path: Option<String>,
    /// Relative path of a linked file.
    pub link_rel_path: Option<String>,
    /// Storage id for embed/store items.
    pub bindata_id: u16,
    /// File extension of an embedded item.
    pub ext: Option<String>,
}

impl BinDataItem {
    pub fn is_link(&self) -> bool {
        self.attr & bindata_attr::TYPE_MASK == bindata_attr::TYPE_LINK
    }

    pub fn is_embed(&self) -> bool {
        self.attr & bindata_attr::TYPE_MASK == bindata_attr::TYPE_EMBED
    }
}

/// Font language buckets, in the fixed order the DocInfo stream declares
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontLanguage {
    Korean,
    English,
    Hanja,
    Japanese,
    Others,
    Symbol,
    User,
}

impl FontLanguage {
    pub const ALL: [FontLanguage; 7] = [
        FontLanguage::Korean,
        FontLanguage::English,
        FontLanguage::Hanja,
        FontLanguage::Japanese,
        FontLanguage::Others,
        FontLanguage::Symbol,
        FontLanguage::User,
    ];

    pub fn category(self) -> IdCategory {
        match self {
            FontLanguage::Korean => IdCategory::KoreanFonts,
            FontLanguage::English => IdCategory::EnglishFonts,
            FontLanguage::Hanja => IdCategory::HanjaFonts,
            FontLanguage::Japanese => IdCategory::JapaneseFonts,
            FontLanguage::Others => IdCategory::OthersFonts,
            FontLanguage::Symbol => IdCategory::SymbolFonts,
            FontLanguage::User => IdCategory::UserFonts,
        }
    }
}

/// Font face attribute bits.
pub mod font_face_attr {
    /// An alternate-font sub-record follows the name.
    pub const ALT_FONT: u8 = 1 << 7;
    /// A 10-byte font-type-classification sub-record is present.
    pub const FONT_TYPE: u8 = 1 << 6;
    /// A default-font-name string is present.
    pub const DEF_FONT: u8 = 1 << 5;
}

/// Panose-style font classification sub-record.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FontTypeInfo {
    pub family: u8,
    pub serif: u8,
    pub weight: u8,
    pub proportion: u8,
    pub contrast: u8,
    pub stroke: u8,
    pub kind: u8,
    pub char_kind: u8,
    pub midline: u8,
    pub x_height: u8,
}

/// One FACE_NAME entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontFace {
    pub attr: u8,
    pub name: String,
    pub alt_attr: u8,
    pub alt_name: Option<String>,
    pub type_info: Option<FontTypeInfo>,
    pub default_name: Option<String>,
}

/// All declared font faces in one backing array, logically partitioned by
/// language into contiguous sub-ranges (Korean first, then English, Hanja,
/// Japanese, Others, Symbol, User).
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontTable {
    counts: [u32; 7],
    faces: Vec<FontFace>,
}

impl FontTable {
    /// Reserves slots according to the ID-mapping font counts.
    pub fn with_counts(id_maps: &IdMappings) -> Self {
        let mut counts = [0u32; 7];
        for (slot, lang) in counts.iter_mut().zip(FontLanguage::ALL) {
            *slot = id_maps.count(lang.category());
        }
        Self {
            counts,
            faces: Vec::with_capacity(counts.iter().sum::<u32>() as usize),
        }
    }

    /// Declared total across all languages.
    pub fn declared_total(&self) -> usize {
        self.counts.iter().sum::<u32>() as usize
    }

    /// Number of faces decoded so far.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Appends the next face; fails when the declared total is exhausted.
    pub fn push(&mut self, face: FontFace) -> bool {
        if self.faces.len() >= self.declared_total() {
            return false;
        }
        self.faces.push(face);
        true
    }

    /// Face by global index.
    pub fn face(&self, index: usize) -> Option<&FontFace> {
        self.faces.get(index)
    }

    /// The contiguous sub-range backing one language.
    pub fn faces_for(&self, lang: FontLanguage) -> &[FontFace] {
        let mut start = 0usize;
        for (i, other) in FontLanguage::ALL.iter().enumerate() {
            if *other == lang {
                let end = (start + self.counts[i] as usize).min(self.faces.len());
                let start = start.min(self.faces.len());
                return &self.faces[start..end];
            }
            start += self.counts[i] as usize;
        }
        &[]
    }
}

/// One CHAR_SHAPE entry.
#[derive(Debug, Clone, Serialize)]
pub struct CharShape {
    pub face_ids: [u16; CHAR_SHAPE_LANGS],
    pub widths: [u8; CHAR_SHAPE_LANGS],
    pub spacings: [u8; CHAR_SHAPE_LANGS],
    pub rel_sizes: [u8; CHAR_SHAPE_LANGS],
    pub rel_positions: [u8; CHAR_SHAPE_LANGS],
    pub base_size: i32,
    pub attr: u32,
    pub shadow_gap_x: i8,
    pub shadow_gap_y: i8,
    pub char_color: ColorRef,
    pub underline_color: ColorRef,
    pub shade_color: ColorRef,
    pub shadow_color: ColorRef,
    /// Present from format 5.0.2.1.
    pub border_fill_id: Option<u16>,
    /// Present from format 5.0.3.0.
    pub midline_color: Option<ColorRef>,
}

impl Default for CharShape {
    fn default() -> Self {
        Self {
            face_ids: [0; CHAR_SHAPE_LANGS],
            widths: [0; CHAR_SHAPE_LANGS],
            spacings: [0; CHAR_SHAPE_LANGS],
            rel_sizes: [0; CHAR_SHAPE_LANGS],
            rel_positions: [0; CHAR_SHAPE_LANGS],
            base_size: 0,
            attr: 0,
            shadow_gap_x: 0,
            shadow_gap_y: 0,
            char_color: ColorRef::default(),
            underline_color: ColorRef::default(),
            shade_color: ColorRef::default(),
            shadow_color: ColorRef::default(),
            border_fill_id: None,
            midline_color: None,
        }
    }
}

/// One PARA_SHAPE entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParaShape {
    pub attr1: u32,
    pub l_margin: i32,
    pub r_margin: i32,
    pub indent: i32,
    pub u_spacing: i32,
    pub d_spacing: i32,
    /// Legacy line spacing, present only before format 5.0.1.7.
    pub line_spacing_old: Option<i32>,
    pub tab_def_id: u16,
    pub numbering_id: u16,
    pub border_fill_id: u16,
    pub border_l_spacing: i16,
    pub border_r_spacing: i16,
    pub border_u_spacing: i16,
    pub border_d_spacing: i16,
    /// Present from format 5.0.1.7.
    pub attr2: Option<u32>,
    /// Present only before format 5.0.2.5.
    pub attr3: Option<u32>,
}

/// Global tables decoded from the DocInfo stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentInfo {
    pub properties: DocumentProperties,
    pub id_maps: IdMappings,
    pub bin_items: Vec<BinDataItem>,
    pub fonts: FontTable,
    pub char_shapes: Vec<CharShape>,
    pub para_shapes: Vec<ParaShape>,
}
