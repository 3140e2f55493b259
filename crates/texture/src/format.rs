//! Pixel formats and data-size arithmetic.

/// Pixel formats found in embedded texture dictionaries. The format word is
/// either a FourCC (`DXT1`/`DXT3`/`DXT5`) or one of the numeric D3D codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    /// 32-bit ARGB, one byte per channel.
    Argb8888,
    /// 8-bit luminance.
    L8,
}

impl PixelFormat {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x31545844 => Some(Self::Dxt1), // "DXT1"
            0x33545844 => Some(Self::Dxt3), // "DXT3"
            0x35545844 => Some(Self::Dxt5), // "DXT5"
            0x15 => Some(Self::Argb8888),
            0x32 => Some(Self::L8),
            _ => None,
        }
    }

    /// Byte size of the base image.
    pub fn base_size(self, width: usize, height: usize) -> usize {
        match self {
            Self::Dxt1 => width * height / 2,
            Self::Dxt3 | Self::Dxt5 => width * height,
            Self::Argb8888 => 4 * width * height,
            Self::L8 => width * height,
        }
    }

    /// Byte size of the full mip chain: the base image plus one quarter-size
    /// image per additional level. Shrinking levels are floored at one block
    /// (8 bytes for DXT1, 16 otherwise) so the tail of a deep chain keeps its
    /// storage granularity.
    pub fn data_size(self, width: usize, height: usize, levels: u8) -> usize {
        let base = self.base_size(width, height);
        let floor = if self == Self::Dxt1 { 8 } else { 16 };

        let mut total = base;
        let mut level = base;
        for _ in 1..levels {
            total += level / 4;
            level /= 4;
            if level < floor {
                level = floor;
            }
        }
        total
    }
}
