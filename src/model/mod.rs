//! Document model for parsed HWP v5 documents.
//!
//! The model is a plain data tree: a [`Document`] owns a flat paragraph
//! arena; sections, pages, and table cells refer into it by [`ParagraphId`].

pub mod docinfo;
pub mod document;
pub mod page;
pub mod paragraph;
pub mod section;
pub mod table;

pub use docinfo::*;
pub use document::*;
pub use page::*;
pub use paragraph::*;
pub use section::*;
pub use table::*;

use serde::Serialize;

/// Fixed-point layout unit, 1/7200 inch.
pub type HwpUnit = i32;

/// 16-bit layout unit used for spacings and margins.
pub type HwpUnit16 = i16;

/// Layout units per typographic point (7200 units/inch, 72 points/inch).
pub const UNITS_PER_POINT: f64 = 100.0;

/// Packed 0x00BBGGRR color value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColorRef(pub u32);

impl ColorRef {
    pub fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
}

/// Index of a paragraph in the document's paragraph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ParagraphId(pub u32);

impl ParagraphId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
