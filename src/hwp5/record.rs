//! Record framing and the pull-based record context for HWP 5.0 streams.
//!
//! HWP 5.0 streams are flat sequences of TLV records. A 32-bit header packs
//! tag id (10 bits), nesting level (10 bits), and payload size (12 bits);
//! either of the level/size fields may escape to a trailing 32-bit value.

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::model::ColorRef;

use super::header::Version;

/// Tag IDs for HWP 5.0 records, based from HWPTAG_BEGIN = 0x10.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagId {
    // DocInfo tags (0x10 - 0x1F)
    DocumentProperties = 16,
    IdMappings = 17,
    BinData = 18,
    FaceName = 19,
    BorderFill = 20,
    CharShape = 21,
    TabDef = 22,
    Numbering = 23,
    Bullet = 24,
    ParaShape = 25,
    Style = 26,
    DocData = 27,
    DistributeDocData = 28,
    CompatibleDocument = 30,
    LayoutCompatibility = 31,

    // BodyText tags (0x42+)
    ParaHeader = 66,
    ParaText = 67,
    ParaCharShape = 68,
    ParaLineSeg = 69,
    ParaRangeTag = 70,
    CtrlHeader = 71,
    ListHeader = 72,
    PageDef = 73,
    FootnoteShape = 74,
    PageBorderFill = 75,
    ShapeComponent = 76,
    Table = 77,

    Unknown = 0xFFFF,
}

impl From<u16> for TagId {
    fn from(value: u16) -> Self {
        match value {
            16 => TagId::DocumentProperties,
            17 => TagId::IdMappings,
            18 => TagId::BinData,
            19 => TagId::FaceName,
            20 => TagId::BorderFill,
            21 => TagId::CharShape,
            22 => TagId::TabDef,
            23 => TagId::Numbering,
            24 => TagId::Bullet,
            25 => TagId::ParaShape,
            26 => TagId::Style,
            27 => TagId::DocData,
            28 => TagId::DistributeDocData,
            30 => TagId::CompatibleDocument,
            31 => TagId::LayoutCompatibility,
            66 => TagId::ParaHeader,
            67 => TagId::ParaText,
            68 => TagId::ParaCharShape,
            69 => TagId::ParaLineSeg,
            70 => TagId::ParaRangeTag,
            71 => TagId::CtrlHeader,
            72 => TagId::ListHeader,
            73 => TagId::PageDef,
            74 => TagId::FootnoteShape,
            75 => TagId::PageBorderFill,
            76 => TagId::ShapeComponent,
            77 => TagId::Table,
            _ => TagId::Unknown,
        }
    }
}

/// Escape value of the 10-bit level field: read an extra 32-bit level.
const EXTENDED_LEVEL_SENTINEL: u32 = 0x3FF;
/// Escape value of the 12-bit size field: read an extra 32-bit size.
const EXTENDED_SIZE_SENTINEL: u32 = 0xFFF;

/// Stateful cursor over one record stream.
///
/// `pull()` frames the next record; typed readers then consume the payload,
/// tracking `data_count` against `data_len`. Unread payload bytes of the
/// record just finished are skipped by the next `pull()`; many record
/// types are deliberately read only up to a field prefix.
pub struct RecordContext<'a> {
    cursor: ByteCursor<'a>,
    /// Tag id of the current record.
    pub tag_id: u16,
    /// Nesting level of the current record in the implicit record tree.
    pub level: u32,
    /// Declared payload length of the current record.
    pub data_len: u32,
    /// Payload bytes consumed so far.
    data_count: u32,
    /// Stream offset where the current record's payload begins.
    payload_start: usize,
    version: Version,
}

impl<'a> RecordContext<'a> {
    /// Creates a context over one stream with the document's format
    /// version, used to gate optional fields.
    pub fn new(data: &'a [u8], version: Version) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            tag_id: 0,
            level: 0,
            data_len: 0,
            data_count: 0,
            payload_start: 0,
            version,
        }
    }

    /// Tag id of the current record as an enum.
    pub fn tag(&self) -> TagId {
        TagId::from(self.tag_id)
    }

    /// Payload bytes of the current record not yet consumed.
    pub fn remaining_in_record(&self) -> u32 {
        self.data_len - self.data_count
    }

    /// Returns true iff the document's version is at least the given
    /// version, compared lexicographically component-by-component.
    pub fn check_version(&self, major: u8, minor: u8, micro: u8, extra: u8) -> bool {
        self.version.at_least(major, minor, micro, extra)
    }

    /// Frames the next record.
    ///
    /// Skips any unread payload of the previous record, then reads and
    /// unpacks the header. Returns false at end of stream or when the
    /// stream is too short for the declared payload; both are terminal for
    /// this stream.
    pub fn pull(&mut self) -> bool {
        self.cursor.seek(self.payload_start + self.data_len as usize);

        let header = match self.cursor.read_u32() {
            Ok(value) => value,
            Err(_) => return false,
        };

        let tag_id = (header & 0x3FF) as u16;
        let level_field = (header >> 10) & 0x3FF;
        let size_field = (header >> 20) & 0xFFF;

        let level = if level_field == EXTENDED_LEVEL_SENTINEL {
            match self.cursor.read_u32() {
                Ok(value) => value,
                Err(_) => return false,
            }
        } else {
            level_field
        };

        let data_len = if size_field == EXTENDED_SIZE_SENTINEL {
            match self.cursor.read_u32() {
                Ok(value) => value,
                Err(_) => return false,
            }
        } else {
            size_field
        };

        if self.cursor.remaining() < data_len as usize {
            log::warn!(
                "record tag {} declares {} payload bytes but only {} remain",
                tag_id,
                data_len,
                self.cursor.remaining()
            );
            return false;
        }

        self.tag_id = tag_id;
        self.level = level;
        self.data_len = data_len;
        self.data_count = 0;
        self.payload_start = self.cursor.position();
        true
    }

    /// Checks that `n` more payload bytes may be read from the current
    /// record. On failure the record is poisoned so that every later read
    /// also fails until the next `pull()`.
    fn ensure(&mut self, n: u32) -> Result<()> {
        if self.data_count + n > self.data_len {
            let err = Error::RecordOverrun {
                tag_id: self.tag_id,
                needed: n,
                data_len: self.data_len,
            };
            self.data_count = self.data_len;
            return Err(err);
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.cursor.read_u8()?;
        self.data_count += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        let value = self.cursor.read_i8()?;
        self.data_count += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let value = self.cursor.read_u16()?;
        self.data_count += 2;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        let value = self.cursor.read_i16()?;
        self.data_count += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let value = self.cursor.read_u32()?;
        self.data_count += 4;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        let value = self.cursor.read_i32()?;
        self.data_count += 4;
        Ok(value)
    }

    /// Reads a packed RGB color value.
    pub fn read_color(&mut self) -> Result<ColorRef> {
        Ok(ColorRef(self.read_u32()?))
    }

    /// Reads a 32-bit fixed-point layout unit.
    pub fn read_unit(&mut self) -> Result<i32> {
        self.read_i32()
    }

    /// Reads a 16-bit fixed-point layout unit.
    pub fn read_unit16(&mut self) -> Result<i16> {
        self.read_i16()
    }

    /// Reads a u16-length-prefixed UTF-16LE string.
    pub fn read_string(&mut self) -> Result<String> {
        let n_wchars = self.read_u16()? as u32;
        self.ensure(n_wchars * 2)?;
        let bytes = self.cursor.read_bytes(n_wchars as usize * 2)?;
        self.data_count += n_wchars * 2;

        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(String::from_utf16(&units)?)
    }

    /// Skips `n` payload bytes.
    pub fn skip(&mut self, n: u32) -> Result<()> {
        self.ensure(n)?;
        self.cursor.skip(n as usize)?;
        self.data_count += n;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Encodes one record with a packed 4-byte header, using the escape
    /// forms when the level or size exceeds its field width.
    pub fn record(tag_id: u16, level: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let level_field = if level >= 0x3FF { 0x3FF } else { level };
        let size = payload.len() as u32;
        let size_field = if size >= 0xFFF { 0xFFF } else { size };

        let header = (tag_id as u32 & 0x3FF) | (level_field << 10) | (size_field << 20);
        out.extend_from_slice(&header.to_le_bytes());
        if level_field == 0x3FF {
            out.extend_from_slice(&level.to_le_bytes());
        }
        if size_field == 0xFFF {
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    fn context(data: &[u8]) -> RecordContext<'_> {
        RecordContext::new(data, Version::new(5, 0, 0, 0))
    }

    #[test]
    fn test_pull_unpacks_header() {
        // Tag 66 (ParaHeader), level 0, size 10.
        let mut data = record(66, 0, &[0u8; 10]);
        data.extend_from_slice(&record(67, 1, &[0u8; 4]));

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.tag_id, 66);
        assert_eq!(ctx.tag(), TagId::ParaHeader);
        assert_eq!(ctx.level, 0);
        assert_eq!(ctx.data_len, 10);

        assert!(ctx.pull());
        assert_eq!(ctx.tag(), TagId::ParaText);
        assert_eq!(ctx.level, 1);

        assert!(!ctx.pull());
    }

    #[test]
    fn test_pull_extended_size() {
        let payload = vec![0xAB; 5000];
        let data = record(67, 0, &payload);

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.data_len, 5000);
        assert_eq!(ctx.read_u8().unwrap(), 0xAB);
    }

    #[test]
    fn test_pull_extended_level() {
        let data = record(66, 0x3FF, &[1, 2]);

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.level, 0x3FF);
        assert_eq!(ctx.data_len, 2);
    }

    #[test]
    fn test_pull_resyncs_past_unread_payload() {
        // First record's payload is read only partially; the second pull
        // must still land on the next record header.
        let mut data = record(71, 0, &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        data.extend_from_slice(&record(73, 0, &[0x77, 0x88]));

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.read_u16().unwrap(), 0x2211);

        assert!(ctx.pull());
        assert_eq!(ctx.tag(), TagId::PageDef);
        assert_eq!(ctx.read_u16().unwrap(), 0x8877);
        assert!(!ctx.pull());
    }

    #[test]
    fn test_truncated_payload_terminates_stream() {
        let mut data = record(66, 0, &[0u8; 8]);
        data.truncate(data.len() - 3);

        let mut ctx = context(&data);
        assert!(!ctx.pull());
    }

    #[test]
    fn test_record_overrun_poisons_record() {
        let mut data = record(66, 0, &[1, 2, 3]);
        data.extend_from_slice(&record(67, 0, &[9, 9]));

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.read_u16().unwrap(), 0x0201);

        let err = ctx.read_u32().unwrap_err();
        assert!(matches!(err, Error::RecordOverrun { tag_id: 66, .. }));
        // Poisoned: even a 1-byte read now fails.
        assert!(ctx.read_u8().is_err());

        // The next pull resyncs to the following record.
        assert!(ctx.pull());
        assert_eq!(ctx.tag(), TagId::ParaText);
    }

    #[test]
    fn test_read_string() {
        // "AB" as a u16-length-prefixed UTF-16LE string.
        let payload = [0x02, 0x00, 0x41, 0x00, 0x42, 0x00];
        let data = record(19, 0, &payload);

        let mut ctx = context(&data);
        assert!(ctx.pull());
        assert_eq!(ctx.read_string().unwrap(), "AB");
        assert_eq!(ctx.remaining_in_record(), 0);
    }

    #[test]
    fn test_check_version_gate() {
        let data = record(17, 0, &[]);
        let mut ctx = RecordContext::new(&data, Version::new(5, 0, 2, 0));
        assert!(ctx.pull());
        assert!(ctx.check_version(5, 0, 1, 7));
        assert!(!ctx.check_version(5, 0, 2, 1));
    }
}
