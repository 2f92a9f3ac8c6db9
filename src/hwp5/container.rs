//! OLE compound-file access for HWP 5.0 documents.
//!
//! An HWP 5.0 file is a CFBF container. The streams this crate reads are
//! `FileHeader` (never compressed), `DocInfo`, the numbered section streams
//! under `BodyText/` (or `ViewText/` in distribution documents), and the
//! optional `PrvText` preview. Compressed streams use raw headerless
//! DEFLATE.

use crate::error::{Error, Result};
use cfb::CompoundFile;
use flate2::read::DeflateDecoder;
use std::cell::RefCell;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use super::header::FileHeader;

/// Storage prefixes that may hold the numbered section streams.
const SECTION_STORAGES: [&str; 2] = ["BodyText", "ViewText"];

/// OLE container wrapper for one HWP 5.0 document.
pub struct Hwp5Container {
    cfb: RefCell<CompoundFile<Cursor<Vec<u8>>>>,
}

impl Hwp5Container {
    /// Opens a container from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Opens a container from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens a container from in-memory bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cfb = CompoundFile::open(Cursor::new(data))
            .map_err(|e| Error::OleContainer(e.to_string()))?;
        Ok(Self {
            cfb: RefCell::new(cfb),
        })
    }

    /// Reads and parses the FileHeader stream, which is never compressed.
    pub fn read_file_header(&self) -> Result<FileHeader> {
        let data = self.read_stream_raw("FileHeader")?;
        FileHeader::parse(&data)
    }

    /// Reads a stream without decompression.
    pub fn read_stream_raw(&self, name: &str) -> Result<Vec<u8>> {
        let mut cfb = self.cfb.borrow_mut();

        let mut stream = cfb
            .open_stream(name)
            .map_err(|_| Error::MissingComponent(name.to_string()))?;

        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Reads a stream, applying raw DEFLATE when `compressed` is set.
    pub fn read_stream_decompressed(&self, name: &str, compressed: bool) -> Result<Vec<u8>> {
        let raw = self.read_stream_raw(name)?;

        if compressed {
            decompress_stream(&raw)
        } else {
            Ok(raw)
        }
    }

    /// Checks whether a stream exists in the container.
    pub fn stream_exists(&self, name: &str) -> bool {
        self.cfb.borrow().is_stream(name)
    }

    /// Lists the numbered section streams in document order.
    ///
    /// Regular documents keep sections under `BodyText/SectionN`;
    /// distribution documents keep them under `ViewText/SectionN` instead.
    /// The first storage with a `Section0` stream wins; a container with
    /// neither yields an empty list.
    pub fn list_section_streams(&self) -> Vec<String> {
        for storage in SECTION_STORAGES {
            let mut sections = Vec::new();
            loop {
                let name = format!("{}/Section{}", storage, sections.len());
                if !self.stream_exists(&name) {
                    break;
                }
                sections.push(name);
            }
            if !sections.is_empty() {
                return sections;
            }
        }

        Vec::new()
    }

    /// Reads the plain-text preview stream (`PrvText`) if present.
    pub fn read_preview_text(&self) -> Result<String> {
        let data = self.read_stream_raw("PrvText")?;
        // PrvText is bare UTF-16LE with no length prefix.
        decode_utf16le(&data)
    }
}

/// Decompresses a raw headerless DEFLATE stream.
pub(crate) fn decompress_stream(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut output = Vec::new();

    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(output)
}

/// Decodes UTF-16LE bytes to a String.
pub(crate) fn decode_utf16le(data: &[u8]) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(Error::Encoding("odd UTF-16LE byte length".into()));
    }

    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    Ok(String::from_utf16(&units)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decode_utf16le() {
        // "Hello" in UTF-16LE
        let data = [0x48, 0x00, 0x65, 0x00, 0x6C, 0x00, 0x6C, 0x00, 0x6F, 0x00];
        assert_eq!(decode_utf16le(&data).unwrap(), "Hello");
    }

    #[test]
    fn test_decode_utf16le_korean() {
        // "안녕" in UTF-16LE
        let data = [0x48, 0xC5, 0x55, 0xB1];
        assert_eq!(decode_utf16le(&data).unwrap(), "안녕");
    }

    #[test]
    fn test_decode_utf16le_rejects_odd_length() {
        assert!(matches!(
            decode_utf16le(&[0x48, 0x00, 0x65]),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_no_section_storage_lists_nothing() {
        let comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        let data = comp.into_inner().into_inner();

        let container = Hwp5Container::from_bytes(data).unwrap();
        assert!(container.list_section_streams().is_empty());
    }

    #[test]
    fn test_decompress_raw_deflate() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"record stream payload").unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = decompress_stream(&compressed).unwrap();
        assert_eq!(decoded, b"record stream payload");
    }
}
