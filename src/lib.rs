//! # hwpage
//!
//! A parser for binary HWP 5.0 Korean word processor documents, built for
//! text extraction and page-accurate layout.
//!
//! The document is an OLE container of compressed record streams. Parsing
//! decodes the document-wide tables (fonts, character and paragraph
//! shapes), reconstructs sections, paragraphs and tables from the tagged
//! record stream, and slices the result into pages using the line-segment
//! layout metadata the file carries.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hwpage::parse_file;
//!
//! fn main() -> hwpage::Result<()> {
//!     let document = parse_file("document.hwp")?;
//!
//!     println!("{} pages", document.n_pages());
//!     println!("{}", document.plain_text());
//!     Ok(())
//! }
//! ```

pub mod cursor;
pub mod error;
pub mod hwp5;
pub mod model;

// Re-exports
pub use error::{Error, Result};
pub use hwp5::Hwp5Parser;
pub use model::Document;

use std::io::{Read, Seek};
use std::path::Path;

/// Parses a document from a file path.
///
/// # Example
///
/// ```no_run
/// use hwpage::parse_file;
///
/// let document = parse_file("example.hwp")?;
/// println!("Paragraphs: {}", document.paragraph_count());
/// # Ok::<(), hwpage::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let mut parser = Hwp5Parser::open(path)?;
    parser.parse()
}

/// Parses a document from in-memory bytes.
pub fn parse_bytes(data: Vec<u8>) -> Result<Document> {
    let mut parser = Hwp5Parser::from_bytes(data)?;
    parser.parse()
}

/// Parses a document from a reader.
pub fn parse_reader<R: Read + Seek>(reader: R) -> Result<Document> {
    let mut parser = Hwp5Parser::from_reader(reader)?;
    parser.parse()
}
