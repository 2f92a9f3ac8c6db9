//! FileHeader parsing for HWP 5.0 documents.

use crate::error::{Error, Result};

/// HWP 5.0 file header signature, null-padded to 32 bytes in the stream.
const HWP_SIGNATURE: &[u8] = b"HWP Document File";

/// FileHeader stream is always 256 bytes.
const FILE_HEADER_SIZE: usize = 256;

/// Property flag bit positions.
pub mod flags {
    /// Body streams are raw-DEFLATE compressed.
    pub const COMPRESSED: u32 = 1 << 0;
    /// Document is encrypted.
    pub const ENCRYPTED: u32 = 1 << 1;
    /// Distribution document.
    pub const DISTRIBUTION: u32 = 1 << 2;
    /// Scripts present.
    pub const SCRIPT: u32 = 1 << 3;
    /// DRM protected.
    pub const DRM: u32 = 1 << 4;
    /// XML template storage present.
    pub const XML_TEMPLATE: u32 = 1 << 5;
    /// Document history present.
    pub const HISTORY: u32 = 1 << 6;
    /// Digital signature present.
    pub const SIGNATURE: u32 = 1 << 7;
    /// Public key encryption.
    pub const CERTIFICATE_ENCRYPT: u32 = 1 << 8;
    /// Space reserved for a digital signature.
    pub const SIGNATURE_SPARE: u32 = 1 << 9;
    /// Certificate DRM.
    pub const CERTIFICATE_DRM: u32 = 1 << 10;
    /// CCL document.
    pub const CCL: u32 = 1 << 11;
}

/// HWP format version tuple.
///
/// Stored in the file header as 4 bytes at offsets 32-35, least significant
/// component first (extra, micro, minor, major).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub micro: u8,
    pub extra: u8,
}

impl Version {
    pub fn new(major: u8, minor: u8, micro: u8, extra: u8) -> Self {
        Self {
            major,
            minor,
            micro,
            extra,
        }
    }

    /// Returns true if this version is at least the given version,
    /// component-by-component with the major component most significant.
    ///
    /// This is the version gate used for every optional-field check.
    pub fn at_least(&self, major: u8, minor: u8, micro: u8, extra: u8) -> bool {
        (self.major, self.minor, self.micro, self.extra) >= (major, minor, micro, extra)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.micro, self.extra
        )
    }
}

/// HWP 5.0 FileHeader: signature, version, feature flags.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub version: Version,
    pub properties: u32,
}

impl FileHeader {
    /// Parses the 256-byte FileHeader stream.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(Error::InvalidData(format!(
                "FileHeader too small: {} bytes, expected {}",
                data.len(),
                FILE_HEADER_SIZE
            )));
        }

        if !data.starts_with(HWP_SIGNATURE) {
            return Err(Error::InvalidData("invalid HWP signature".into()));
        }

        let version = Version {
            extra: data[32],
            micro: data[33],
            minor: data[34],
            major: data[35],
        };

        let properties = u32::from_le_bytes([data[36], data[37], data[38], data[39]]);

        Ok(Self {
            version,
            properties,
        })
    }

    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    pub fn is_compressed(&self) -> bool {
        self.properties & flags::COMPRESSED != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.properties & flags::ENCRYPTED != 0
    }

    pub fn is_distribution(&self) -> bool {
        self.properties & flags::DISTRIBUTION != 0
    }

    pub fn is_drm_protected(&self) -> bool {
        self.properties & flags::DRM != 0
    }

    pub fn has_scripts(&self) -> bool {
        self.properties & flags::SCRIPT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: [u8; 4], properties: u32) -> Vec<u8> {
        let mut data = vec![0u8; 256];
        data[..17].copy_from_slice(b"HWP Document File");
        data[32..36].copy_from_slice(&version);
        data[36..40].copy_from_slice(&properties.to_le_bytes());
        data
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(5, 0, 3, 2);
        assert_eq!(v.to_string(), "5.0.3.2");
    }

    #[test]
    fn test_version_gate_is_total_order() {
        let v = Version::new(5, 0, 2, 0);
        assert!(v.at_least(5, 0, 1, 7));
        assert!(v.at_least(5, 0, 2, 0));
        assert!(!v.at_least(5, 0, 2, 1));

        let older = Version::new(5, 0, 1, 6);
        assert!(!older.at_least(5, 0, 1, 7));
        assert!(older.at_least(5, 0, 1, 6));
        assert!(older.at_least(4, 9, 9, 9));
    }

    #[test]
    fn test_parse_header() {
        // Bytes at 32-35 are (extra, micro, minor, major).
        let data = header_bytes([1, 3, 0, 5], flags::COMPRESSED);
        let header = FileHeader::parse(&data).unwrap();

        assert_eq!(header.version, Version::new(5, 0, 3, 1));
        assert!(header.is_compressed());
        assert!(!header.is_encrypted());
        assert!(!header.is_distribution());
    }

    #[test]
    fn test_parse_header_rejects_bad_signature() {
        let mut data = header_bytes([0, 0, 0, 5], 0);
        data[0] = b'X';
        assert!(FileHeader::parse(&data).is_err());
    }
}
