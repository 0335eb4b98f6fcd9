//! Minimal GLB header probe.
//!
//! The model payload is opaque to this crate; the header is only read to
//! describe an archive (`nx3 info`) and to warn about payloads that are not
//! binary glTF at all.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

/// `glTF` read as a little-endian u32.
pub const GLB_MAGIC: u32 = u32::from_le_bytes(*b"glTF");

/// Chunk type of the JSON chunk.
pub const CHUNK_JSON: u32 = u32::from_le_bytes(*b"JSON");

/// Chunk type of the binary buffer chunk.
pub const CHUNK_BIN: u32 = u32::from_le_bytes(*b"BIN\0");

/// The 12-byte GLB header plus the first chunk header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlbHeader {
    /// Container version (2 for glTF 2.0).
    pub version: u32,
    /// Total length declared by the header.
    pub length: u32,
    /// Length of the first chunk, if present.
    pub json_length: Option<u32>,
}

impl GlbHeader {
    /// Parse the header. Returns `None` if the magic does not match or the
    /// data is shorter than 12 bytes.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut cur = Cursor::new(data);
        if cur.read_u32::<LittleEndian>().ok()? != GLB_MAGIC {
            return None;
        }
        let version = cur.read_u32::<LittleEndian>().ok()?;
        let length = cur.read_u32::<LittleEndian>().ok()?;

        let json_length = match (
            cur.read_u32::<LittleEndian>(),
            cur.read_u32::<LittleEndian>(),
        ) {
            (Ok(len), Ok(CHUNK_JSON)) => Some(len),
            _ => None,
        };

        Some(Self {
            version,
            length,
            json_length,
        })
    }

    /// Whether the declared length matches the payload size.
    pub fn matches_len(&self, actual: usize) -> bool {
        self.length as usize == actual
    }
}
