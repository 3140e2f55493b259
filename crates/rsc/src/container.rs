//! Container framing: fixed header, compressed payload, segment split.

use std::io::{Cursor, Read};

use binrw::{binread, BinReaderExt};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use log::debug;

use crate::error::ContainerError;
use crate::flags;

/// Fixed header of the 32-bit `RSC` container generation.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little, magic = b"RSC")]
pub struct RscHeader {
    pub version: u8,
    /// Read for diagnostics only; no known consumer validates it.
    pub resource_type: u32,
    pub flags: u32,
}

/// Fixed header of the 64-bit `RSC7` container generation.
#[binread]
#[derive(Debug, Clone, Copy)]
#[br(little, magic = b"RSC7")]
pub struct Rsc7Header {
    pub version: u32,
    pub system_flags: u32,
    pub graphics_flags: u32,
}

/// A decoded resource container: header words plus the two decompressed
/// memory segments.
#[derive(Debug)]
pub struct ResourceFile {
    pub version: u32,
    pub resource_type: Option<u32>,
    pub system: Vec<u8>,
    pub graphics: Vec<u8>,
}

impl ResourceFile {
    /// Reads an `RSC` container (zlib-wrapped payload, 12-byte header).
    pub fn read_rsc(data: &[u8]) -> Result<Self, ContainerError> {
        if data.len() < 12 {
            return Err(ContainerError::HeaderTruncated {
                got: data.len(),
                need: 12,
            });
        }

        let header: RscHeader = Cursor::new(data)
            .read_le()
            .map_err(|err| header_error(err, data.len(), 12))?;
        let (system_size, graphics_size) = flags::rsc_segment_sizes(header.flags);
        debug!(
            "RSC v{} type 0x{:08X}: {} system + {} graphics bytes",
            header.version, header.resource_type, system_size, graphics_size
        );

        let mut decompressed = Vec::new();
        ZlibDecoder::new(&data[12..]).read_to_end(&mut decompressed)?;

        let (system, graphics) = split_segments(decompressed, system_size, graphics_size)?;
        Ok(Self {
            version: header.version as u32,
            resource_type: Some(header.resource_type),
            system,
            graphics,
        })
    }

    /// Reads an `RSC7` container (raw DEFLATE payload, 16-byte header).
    pub fn read_rsc7(data: &[u8]) -> Result<Self, ContainerError> {
        if data.len() < 16 {
            return Err(ContainerError::HeaderTruncated {
                got: data.len(),
                need: 16,
            });
        }

        let header: Rsc7Header = Cursor::new(data)
            .read_le()
            .map_err(|err| header_error(err, data.len(), 16))?;
        let system_size = flags::rsc7_segment_size(header.system_flags);
        let graphics_size = flags::rsc7_segment_size(header.graphics_flags);
        debug!(
            "RSC7 v{}: {} system + {} graphics bytes",
            header.version, system_size, graphics_size
        );

        let mut decompressed = Vec::new();
        DeflateDecoder::new(&data[16..]).read_to_end(&mut decompressed)?;

        let (system, graphics) = split_segments(decompressed, system_size, graphics_size)?;
        Ok(Self {
            version: header.version,
            resource_type: None,
            system,
            graphics,
        })
    }
}

/// Splits the decompressed stream into the two segment buffers. Trailing
/// bytes beyond the two segments are dropped.
fn split_segments(
    mut decompressed: Vec<u8>,
    system_size: usize,
    graphics_size: usize,
) -> Result<(Vec<u8>, Vec<u8>), ContainerError> {
    let need = system_size + graphics_size;
    if decompressed.len() < need {
        return Err(ContainerError::DecompressedTooShort {
            got: decompressed.len(),
            need,
        });
    }

    let graphics = decompressed[system_size..need].to_vec();
    decompressed.truncate(system_size);
    Ok((decompressed, graphics))
}

fn header_error(err: binrw::Error, got: usize, need: usize) -> ContainerError {
    match err {
        binrw::Error::BadMagic { .. } => ContainerError::MagicMismatch,
        _ => ContainerError::HeaderTruncated { got, need },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::*;

    fn zlib(payload: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(payload).unwrap();
        enc.finish().unwrap()
    }

    fn rsc_file(flags: u32, payload: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"RSC");
        data.push(110);
        data.extend_from_slice(&0x32u32.to_le_bytes());
        data.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&zlib(payload));
        data
    }

    #[test]
    fn reads_both_segments() {
        // 0x100 bytes each
        let flags = 1 | (1 << 15);
        let mut payload = vec![0xAAu8; 0x100];
        payload.extend(vec![0xBBu8; 0x100]);

        let rf = ResourceFile::read_rsc(&rsc_file(flags, &payload)).unwrap();
        assert_eq!(rf.version, 110);
        assert_eq!(rf.resource_type, Some(0x32));
        assert_eq!(rf.system, vec![0xAA; 0x100]);
        assert_eq!(rf.graphics, vec![0xBB; 0x100]);
    }

    #[test]
    fn trailing_payload_bytes_are_dropped() {
        let flags = 1; // 0x100 system, no graphics
        let mut payload = vec![1u8; 0x100];
        payload.extend_from_slice(b"trailer");

        let rf = ResourceFile::read_rsc(&rsc_file(flags, &payload)).unwrap();
        assert_eq!(rf.system.len(), 0x100);
        assert!(rf.graphics.is_empty());
    }

    #[test]
    fn magic_mismatch() {
        let mut data = rsc_file(1, &[0u8; 0x100]);
        data[0..3].copy_from_slice(b"XYZ");
        assert!(matches!(
            ResourceFile::read_rsc(&data),
            Err(ContainerError::MagicMismatch)
        ));
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(
            ResourceFile::read_rsc(b"RSC"),
            Err(ContainerError::HeaderTruncated { got: 3, need: 12 })
        ));
    }

    #[test]
    fn short_payload_is_rejected() {
        let data = rsc_file(1, &[0u8; 0x40]); // segment says 0x100
        assert!(matches!(
            ResourceFile::read_rsc(&data),
            Err(ContainerError::DecompressedTooShort { got: 0x40, need: 0x100 })
        ));
    }

    #[test]
    fn garbage_payload_fails_decompression() {
        let mut data = Vec::new();
        data.extend_from_slice(b"RSC");
        data.push(110);
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(
            ResourceFile::read_rsc(&data),
            Err(ContainerError::DecompressionFailed(_))
        ));
    }

    #[test]
    fn reads_rsc7_raw_deflate() {
        let payload = vec![0x11u8; 0x2000];
        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&payload).unwrap();
        let compressed = enc.finish().unwrap();

        let mut data = Vec::new();
        data.extend_from_slice(b"RSC7");
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&(1u32 << 17).to_le_bytes()); // one system page
        data.extend_from_slice(&0u32.to_le_bytes()); // empty graphics
        data.extend_from_slice(&compressed);

        let rf = ResourceFile::read_rsc7(&data).unwrap();
        assert_eq!(rf.version, 2);
        assert_eq!(rf.resource_type, None);
        assert_eq!(rf.system.len(), 0x2000);
        assert!(rf.graphics.is_empty());
    }
}
