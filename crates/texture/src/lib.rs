//! Embedded textures: metadata records, pixel-data binding, and CPU decoding
//! to RGBA8.
//!
//! Texture metadata lives in the system segment of a resource container; the
//! pixel payload lives at an offset in the graphics segment. A [`Texture`] is
//! built from the metadata, then *bound* to its byte range, then decoded.

pub mod bc;
pub mod format;
pub mod ytd;

use thiserror::Error;

pub use format::PixelFormat;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("unsupported pixel format 0x{0:08X}")]
    UnsupportedFormat(u32),

    #[error("texture data out of bounds: {offset} + {size} bytes exceeds {available}-byte graphics segment")]
    OutOfBounds {
        offset: usize,
        size: usize,
        available: usize,
    },

    #[error("texture has no bound pixel data")]
    Unbound,
}

/// One entry of an embedded texture dictionary.
#[derive(Debug, Clone)]
pub struct Texture {
    /// May contain path separators; used as the output file stem.
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub format: PixelFormat,
    /// Mipmap levels stored after the base image.
    pub levels: u8,
    /// Offset of the pixel payload in the graphics segment.
    pub data_offset: usize,
    /// Pixel payload (base image plus mip tail), populated by [`bind`].
    ///
    /// [`bind`]: Texture::bind
    pub data: Vec<u8>,
}

impl Texture {
    /// Byte length of the payload, including the mip tail.
    pub fn data_size(&self) -> usize {
        self.format
            .data_size(self.width as usize, self.height as usize, self.levels)
    }

    /// Copies this texture's payload out of the graphics segment.
    pub fn bind(&mut self, graphics: &[u8]) -> Result<(), TextureError> {
        let size = self.data_size();
        let end = self.data_offset.saturating_add(size);
        if end > graphics.len() {
            return Err(TextureError::OutOfBounds {
                offset: self.data_offset,
                size,
                available: graphics.len(),
            });
        }
        self.data = graphics[self.data_offset..end].to_vec();
        Ok(())
    }

    /// Decodes the base image to tightly packed RGBA8. Mip levels beyond the
    /// base are carried in `data` but never decoded.
    pub fn decode_rgba(&self) -> Result<Vec<u8>, TextureError> {
        if self.data.is_empty() {
            return Err(TextureError::Unbound);
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let base = &self.data[..self.format.base_size(w, h).min(self.data.len())];

        Ok(match self.format {
            PixelFormat::Dxt1 => bc::decode_dxt1(base, w, h),
            PixelFormat::Dxt3 => bc::decode_dxt3(base, w, h),
            PixelFormat::Dxt5 => bc::decode_dxt5(base, w, h),
            PixelFormat::Argb8888 => argb_to_rgba(base),
            PixelFormat::L8 => l8_to_rgba(base),
        })
    }
}

/// ARGB8888 is stored as little-endian BGRA bytes; swap to RGBA.
fn argb_to_rgba(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; data.len()];
    for (src, dst) in data.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = src[3];
    }
    out
}

fn l8_to_rgba(data: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; data.len() * 4];
    for (&l, dst) in data.iter().zip(out.chunks_exact_mut(4)) {
        dst[0] = l;
        dst[1] = l;
        dst[2] = l;
        dst[3] = 255;
    }
    out
}
