//! Scaleform GFX movies.
//!
//! A `.gfx` file is an SWF whose signature was rebranded: `FWS` became `GFX`
//! and the zlib-compressed `CWS` became `CFX`. The payload is untouched, so
//! converting back is a header swap.

use anyhow::bail;

pub struct GfxFile {
    /// Whether the payload is zlib-compressed (`CFX`).
    pub compressed: bool,
    pub version: u8,
    pub data: Vec<u8>,
}

impl GfxFile {
    pub fn read(data: &[u8]) -> anyhow::Result<Self> {
        if data.len() < 4 {
            bail!("file too small to be a GFX movie");
        }

        let compressed = match &data[0..3] {
            b"GFX" => false,
            b"CFX" => true,
            other => bail!("not a GFX movie (signature {:?})", other),
        };

        Ok(Self {
            compressed,
            version: data[3],
            data: data[4..].to_vec(),
        })
    }

    /// Restores the original SWF signature in front of the payload.
    pub fn to_swf(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 4);
        out.extend_from_slice(if self.compressed { b"CWS" } else { b"FWS" });
        out.push(self.version);
        out.extend_from_slice(&self.data);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_movies_become_fws() {
        let gfx = GfxFile::read(b"GFX\x0Apayload").unwrap();
        assert!(!gfx.compressed);
        assert_eq!(gfx.version, 10);
        assert_eq!(gfx.to_swf(), b"FWS\x0Apayload");
    }

    #[test]
    fn compressed_movies_become_cws() {
        let gfx = GfxFile::read(b"CFX\x0Bzlibdata").unwrap();
        assert!(gfx.compressed);
        assert_eq!(gfx.to_swf(), b"CWS\x0Bzlibdata");
    }

    #[test]
    fn rejects_other_signatures() {
        assert!(GfxFile::read(b"SWF\x01").is_err());
        assert!(GfxFile::read(b"GF").is_err());
    }
}
