//! Parser for WHM documents: in-game web pages stored as a serialized node
//! graph plus an embedded texture dictionary inside an `RSC` container.
//!
//! The system segment holds a dump of the original in-memory document: a
//! root pointer at offset 0, a texture-dictionary pointer at offset 12, and
//! a graph of styled nodes linked by tagged segment pointers. Decoding is a
//! single pass over the two segments; the returned [`Document`] owns
//! everything it exposes.

pub mod node;
pub mod style;
pub mod tag;

mod parser;

use log::debug;
use rageweb_rsc::{ContainerError, ResourceFile};
use rageweb_texture::Texture;
use thiserror::Error;

pub use node::{Element, ElementKind, Node};
pub use style::{AttrValue, Border, Edges, RenderState};
pub use tag::Tag;

use parser::GraphParser;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error("document root unreadable (offset 0x{offset:X}, tag {tag})")]
    RootUnreadable { offset: usize, tag: u8 },
}

/// A fully decoded in-game web page.
#[derive(Debug)]
pub struct Document {
    pub root: Node,
    /// Embedded textures, already bound to their pixel bytes. A texture that
    /// failed to bind is kept with empty data so callers can report it.
    pub textures: Vec<Texture>,
    /// System-segment offset the texture dictionary was found at.
    pub dictionary_offset: Option<u32>,
}

impl Document {
    /// Decodes a WHM document from raw `RSC` container bytes.
    pub fn read(data: &[u8]) -> Result<Self, DocumentError> {
        let rf = ResourceFile::read_rsc(data)?;
        Self::from_segments(&rf.system, &rf.graphics)
    }

    /// Decodes a WHM document from already-split memory segments.
    pub fn from_segments(system: &[u8], graphics: &[u8]) -> Result<Self, DocumentError> {
        let mut parser = GraphParser::new(system);

        let root_ptr = parser.mem().ptr_at(0);
        let unreadable = DocumentError::RootUnreadable {
            offset: root_ptr.offset(),
            tag: root_ptr.tag(),
        };

        // Anything shorter cannot hold even the document header.
        if system.len() < 64 {
            return Err(unreadable);
        }

        // Roots occasionally relocate with a zero tag; only the offset is
        // required to be sound.
        let root = parser.node(root_ptr.offset()).ok_or(unreadable)?;

        let dict_ptr = parser.mem().ptr_at(12);
        let (dictionary_offset, textures) = match dict_ptr.system_offset() {
            Some(offset) => {
                let textures = parser.texture_dictionary(offset, graphics);
                debug!("texture dictionary at 0x{offset:X}: {} textures", textures.len());
                (Some(offset as u32), textures)
            }
            None => (None, Vec::new()),
        };

        Ok(Self {
            root,
            textures,
            dictionary_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rageweb_texture::PixelFormat;

    use super::*;

    /// System-segment image under construction.
    struct Image(Vec<u8>);

    impl Image {
        fn new(len: usize) -> Self {
            Image(vec![0u8; len])
        }

        fn u8(&mut self, off: usize, v: u8) {
            self.0[off] = v;
        }

        fn u16(&mut self, off: usize, v: u16) {
            self.0[off..off + 2].copy_from_slice(&v.to_le_bytes());
        }

        fn u32(&mut self, off: usize, v: u32) {
            self.0[off..off + 4].copy_from_slice(&v.to_le_bytes());
        }

        fn f32(&mut self, off: usize, v: f32) {
            self.u32(off, v.to_bits());
        }

        fn ptr(&mut self, off: usize, tag: u8, target: usize) {
            self.u32(off, ((tag as u32) << 28) | target as u32);
        }

        fn str(&mut self, off: usize, s: &str) {
            self.0[off..off + s.len()].copy_from_slice(s.as_bytes());
            self.0[off + s.len()] = 0;
        }

        /// Node prefix: vtable, kind word, parent, child array triple.
        fn node_prefix(&mut self, off: usize, kind: u32, children: Option<(usize, u16)>) {
            self.u32(off, 0x0040_2030); // vtable, diagnostic only
            self.u32(off + 4, kind);
            if let Some((array, capacity)) = children {
                self.ptr(off + 12, 5, array);
                self.u16(off + 16, capacity); // count mirrors capacity
                self.u16(off + 18, capacity);
            }
        }

        /// Element fields following the render state.
        fn element_tail(&mut self, off: usize, tag: u32) {
            self.u32(off + 216, tag);
        }

        fn element(&mut self, off: usize, tag: u32, children: Option<(usize, u16)>) {
            self.node_prefix(off, 0, children);
            self.element_tail(off, tag);
        }
    }

    /// Render state starts after the 20-byte node prefix.
    fn state(node: usize) -> usize {
        node + 20
    }

    /// Element tail (tag word, name pointer, link run) after the state.
    fn tail(node: usize) -> usize {
        node + 216
    }

    #[test]
    fn single_body_root() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None); // body

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let root = doc.root.as_element().unwrap();
        assert_eq!(root.tag, Tag::Body);
        assert_eq!(root.kind, ElementKind::Plain);
        assert!(root.children.is_empty());
        assert!(doc.textures.is_empty());
        assert_eq!(doc.dictionary_offset, None);
    }

    #[test]
    fn null_root_is_unreadable() {
        let img = Image::new(0x100);
        let err = Document::from_segments(&img.0, &[]).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::RootUnreadable { offset: 0, tag: 0 }
        ));
    }

    #[test]
    fn tiny_system_segment_is_unreadable() {
        let err = Document::from_segments(&[0u8; 4], &[]).unwrap_err();
        assert!(matches!(err, DocumentError::RootUnreadable { .. }));
    }

    #[test]
    fn mistagged_child_slot_is_skipped() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, Some((0x130, 3)));

        // three slots; the middle one has tag 0
        img.ptr(0x130, 5, 0x200);
        img.ptr(0x134, 0, 0x300);
        img.ptr(0x138, 5, 0x400);
        for (off, text_at, text) in [(0x200, 0x500usize, "first"), (0x300, 0x510, "mid"), (0x400, 0x520, "last")] {
            img.node_prefix(off, 1, None); // data node
            img.ptr(tail(off), 5, text_at);
            img.str(text_at, text);
        }

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let root = doc.root.as_element().unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(matches!(&root.children[0], Node::Data(s) if s == "first"));
        assert!(matches!(&root.children[1], Node::Data(s) if s == "last"));
    }

    #[test]
    fn capacity_bounds_child_iteration() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, Some((0x130, 2)));
        img.u16(0x40 + 16, 0); // count lies; capacity still drives the walk

        img.ptr(0x130, 5, 0x200);
        img.ptr(0x134, 5, 0x300);
        img.element(0x200, 11, None); // div
        img.element(0x300, 28, None); // p

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        assert_eq!(doc.root.as_element().unwrap().children.len(), 2);
    }

    #[test]
    fn revisited_nodes_are_pruned() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, Some((0x130, 2)));

        img.ptr(0x130, 5, 0x200);
        img.ptr(0x134, 5, 0x40); // back at the root
        img.element(0x200, 11, None);

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let root = doc.root.as_element().unwrap();
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn text_pseudo_tag_takes_its_name_slot_as_content() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 38, None); // Text
        img.ptr(tail(0x40) + 4, 5, 0x500);
        img.str(0x500, "LOADING");

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let root = doc.root.as_element().unwrap();
        assert_eq!(root.tag, Tag::Text);
        assert_eq!(root.text, "LOADING");
    }

    #[test]
    fn link_run_is_read_verbatim() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 2, None); // anchor
        img.ptr(tail(0x40) + 8, 5, 0x500);
        img.u16(tail(0x40) + 12, 5); // length, no terminator
        img.0[0x500..0x508].copy_from_slice(b"abcdeXYZ");

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        assert_eq!(doc.root.as_element().unwrap().link, "abcde");
    }

    #[test]
    fn render_state_fields_are_decoded() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);

        let s = state(0x40);
        img.u32(s, 15); // display: block
        img.f32(s + 0x04, 42.0);
        img.u32(s + 0x20, 0x00FF_8800);
        img.u32(s + 0x3C, 99); // out of the token set
        img.u32(s + 0x48, 12); // font size: large
        img.u32(s + 0x80, 20); // border top: solid
        img.f32(s + 0x84, 2.0);
        img.u32(s + 0xB0, 3); // colspan
        img.u8(s + 0xB8, 1); // has background

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let style = &doc.root.as_element().unwrap().style;
        assert_eq!(style.display, Some(AttrValue::Block));
        assert_eq!(style.width, 42.0);
        assert_eq!(style.background_color, 0x00FF_8800);
        assert_eq!(style.v_align, None);
        assert_eq!(style.font_size, Some(AttrValue::Large));
        assert_eq!(style.border_top.style, Some(AttrValue::Solid));
        assert_eq!(style.border_top.width, 2.0);
        assert_eq!(style.col_span, 3);
        assert!(style.has_background);
    }

    #[test]
    fn background_image_resolves_through_texture_record() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);
        img.ptr(state(0x40) + 0x24, 5, 0x600); // background texture record
        img.ptr(0x614, 5, 0x500); // its name pointer
        img.str(0x500, "backdrop");

        let doc = Document::from_segments(&img.0, &[]).unwrap();
        let style = &doc.root.as_element().unwrap().style;
        assert_eq!(style.background_image_offset, 0x600);
        assert_eq!(style.background_image, "backdrop");
    }

    /// Writes a texture record; returns nothing, fields per the PC layout.
    fn texture_record(img: &mut Image, off: usize, name_at: usize, format: u32) {
        img.ptr(off + 0x14, 5, name_at);
        img.u16(off + 0x1C, 4);
        img.u16(off + 0x1E, 4);
        img.u32(off + 0x20, format);
        img.u8(off + 0x27, 1); // mip levels
        img.u32(off + 0x48, 0x6000_0000); // graphics offset 0
    }

    fn dictionary(img: &mut Image, off: usize, entries: &[usize]) {
        img.ptr(0xC, 5, off);
        img.ptr(off + 32, 5, off + 0x40);
        img.u16(off + 36, entries.len() as u16);
        img.u16(off + 38, entries.len() as u16);
        for (i, &record) in entries.iter().enumerate() {
            img.ptr(off + 0x40 + i * 4, 5, record);
        }
    }

    #[test]
    fn texture_dictionary_parses_and_binds() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);

        texture_record(&mut img, 0x600, 0x500, 0x32); // L8
        img.str(0x500, "logo");
        dictionary(&mut img, 0x700, &[0x600]);

        let graphics = vec![0x80u8; 16];
        let doc = Document::from_segments(&img.0, &graphics).unwrap();
        assert_eq!(doc.dictionary_offset, Some(0x700));
        assert_eq!(doc.textures.len(), 1);

        let tex = &doc.textures[0];
        assert_eq!(tex.name, "logo");
        assert_eq!(tex.format, PixelFormat::L8);
        assert_eq!(tex.data, graphics);

        let rgba = tex.decode_rgba().unwrap();
        assert_eq!(rgba.len(), 64);
        assert_eq!(&rgba[..4], [0x80, 0x80, 0x80, 0xFF]);
    }

    #[test]
    fn unsupported_format_skips_only_that_texture() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);

        texture_record(&mut img, 0x600, 0x500, 0x99); // unknown format word
        texture_record(&mut img, 0x660, 0x508, 0x32);
        img.str(0x500, "bad");
        img.str(0x508, "ok");
        dictionary(&mut img, 0x700, &[0x600, 0x660]);

        let doc = Document::from_segments(&img.0, &vec![0u8; 16]).unwrap();
        assert_eq!(doc.textures.len(), 1);
        assert_eq!(doc.textures[0].name, "ok");
    }

    #[test]
    fn out_of_bounds_texture_is_kept_unbound() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);

        texture_record(&mut img, 0x600, 0x500, 0x32);
        img.str(0x500, "huge");
        dictionary(&mut img, 0x700, &[0x600]);

        let doc = Document::from_segments(&img.0, &[0u8; 4]).unwrap(); // needs 16
        assert_eq!(doc.textures.len(), 1);
        assert!(doc.textures[0].data.is_empty());
    }

    #[test]
    fn decodes_a_full_container() {
        let mut img = Image::new(0x800);
        img.ptr(0, 5, 0x40);
        img.element(0x40, 3, None);

        let mut enc =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(&img.0).unwrap();
        let compressed = enc.finish().unwrap();

        let mut file = Vec::new();
        file.extend_from_slice(b"RSC");
        file.push(110);
        file.extend_from_slice(&0x32u32.to_le_bytes());
        file.extend_from_slice(&8u32.to_le_bytes()); // 8 pages << 8 = 0x800, no graphics
        file.extend_from_slice(&compressed);

        let doc = Document::read(&file).unwrap();
        assert_eq!(doc.root.as_element().unwrap().tag, Tag::Body);
        assert!(doc.textures.is_empty());
    }

    #[test]
    fn bad_container_magic_surfaces() {
        let err = Document::read(b"XYZ\x6E____________").unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Container(ContainerError::MagicMismatch)
        ));
    }
}
