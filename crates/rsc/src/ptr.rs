//! Relocated pointers.
//!
//! Pointers inside a resource image are not addresses: the low 28 bits are an
//! offset into one of the two memory segments and bits 28..31 name the
//! segment the offset belongs to. `RSC7` widens the word to 64 bits but
//! leaves the upper half zero.

/// Segment tag for system-memory pointers.
pub const TAG_SYSTEM: u8 = 5;
/// Segment tag for graphics-memory pointers.
pub const TAG_GRAPHICS: u8 = 6;

/// A tagged segment pointer. A raw value of zero is null regardless of tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ptr(u64);

impl Ptr {
    pub fn from_u32(raw: u32) -> Self {
        Ptr(raw as u64)
    }

    pub fn from_u64(raw: u64) -> Self {
        Ptr(raw)
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// In-segment offset (low 28 bits).
    pub fn offset(self) -> usize {
        (self.0 & 0x0FFF_FFFF) as usize
    }

    /// Segment tag (bits 28..31).
    pub fn tag(self) -> u8 {
        ((self.0 >> 28) & 0xF) as u8
    }

    /// Offset into system memory, if this is a non-null system pointer.
    pub fn system_offset(self) -> Option<usize> {
        (!self.is_null() && self.tag() == TAG_SYSTEM).then(|| self.offset())
    }

    /// Offset into graphics memory, if this is a non-null graphics pointer.
    pub fn graphics_offset(self) -> Option<usize> {
        (!self.is_null() && self.tag() == TAG_GRAPHICS).then(|| self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_tag_and_offset() {
        let p = Ptr::from_u32(0x5000_1234);
        assert_eq!(p.tag(), TAG_SYSTEM);
        assert_eq!(p.offset(), 0x1234);
        assert_eq!(p.system_offset(), Some(0x1234));
        assert_eq!(p.graphics_offset(), None);
    }

    #[test]
    fn graphics_tag() {
        let p = Ptr::from_u64(0x6ABC_DEF0);
        assert_eq!(p.tag(), TAG_GRAPHICS);
        assert_eq!(p.graphics_offset(), Some(0x0ABC_DEF0));
    }

    #[test]
    fn zero_is_null_for_any_width() {
        assert!(Ptr::from_u32(0).is_null());
        assert!(Ptr::from_u64(0).is_null());
        assert_eq!(Ptr::from_u32(0).system_offset(), None);
    }

    #[test]
    fn unknown_tags_resolve_to_neither_segment() {
        let p = Ptr::from_u32(0x1000_0010);
        assert_eq!(p.system_offset(), None);
        assert_eq!(p.graphics_offset(), None);
    }
}
