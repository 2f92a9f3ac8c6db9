//! HWP 5.0 binary format parser.
//!
//! An HWP 5.0 document is an OLE container holding a fixed-size file
//! header, a DocInfo record stream, and one record stream per body
//! section. This module decodes them into the [`Document`] model and runs
//! the page-breaking pass.

mod bodytext;
mod container;
mod docinfo;
mod header;
mod paginate;
mod record;

pub use container::Hwp5Container;
pub use header::{FileHeader, Version};
pub use record::{RecordContext, TagId};

use log::warn;

use crate::error::{Error, Result};
use crate::model::Document;
use std::io::{Read, Seek};
use std::path::Path;

/// HWP 5.0 document parser.
pub struct Hwp5Parser {
    container: Hwp5Container,
    header: FileHeader,
}

impl Hwp5Parser {
    /// Opens a document from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(Hwp5Container::open(path)?)
    }

    /// Opens a document from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_container(Hwp5Container::from_reader(reader)?)
    }

    /// Opens a document from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(Hwp5Container::from_bytes(data)?)
    }

    fn from_container(container: Hwp5Container) -> Result<Self> {
        let header = container.read_file_header()?;
        Ok(Self { container, header })
    }

    /// The parsed file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn is_compressed(&self) -> bool {
        self.header.is_compressed()
    }

    pub fn is_encrypted(&self) -> bool {
        self.header.is_encrypted()
    }

    /// Parses the document into the document model.
    ///
    /// Stream-level decoding is best-effort: a malformed DocInfo or
    /// section stream contributes what it decoded before failing, and the
    /// rest of the document still loads. Only an encrypted document or an
    /// unreadable container fails outright.
    pub fn parse(&mut self) -> Result<Document> {
        if self.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let mut document = Document::new();
        document.version = Some(self.header.version_string());

        self.parse_docinfo(&mut document);
        self.parse_sections(&mut document);
        paginate::paginate(&mut document);
        self.read_preview_text(&mut document);

        Ok(document)
    }

    fn parse_docinfo(&self, document: &mut Document) {
        match self
            .container
            .read_stream_decompressed("DocInfo", self.is_compressed())
        {
            Ok(data) => {
                document.info = docinfo::parse_docinfo(&data, self.header.version);
            }
            Err(err) => warn!("DocInfo stream unavailable: {}", err),
        }
    }

    fn parse_sections(&self, document: &mut Document) {
        let names = self.container.list_section_streams();
        if names.is_empty() {
            warn!("no section streams; document loads without body text");
        }

        for (index, name) in names.iter().enumerate() {
            let data = match self
                .container
                .read_stream_decompressed(name, self.is_compressed())
            {
                Ok(data) => data,
                Err(err) => {
                    warn!("section stream {} unavailable: {}", name, err);
                    continue;
                }
            };

            let section =
                bodytext::parse_section(document, &data, index, self.header.version);
            document.sections.push(section);
        }
    }

    fn read_preview_text(&self, document: &mut Document) {
        if !self.container.stream_exists("PrvText") {
            return;
        }
        match self.container.read_preview_text() {
            Ok(text) => document.preview_text = Some(text),
            Err(err) => warn!("preview text unavailable: {}", err),
        }
    }
}
