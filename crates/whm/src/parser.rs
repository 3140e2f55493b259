//! Walks the relocated-pointer graph inside the system segment and
//! materializes the document tree and texture dictionary.
//!
//! The serialized graph carries parent back-pointers and may contain other
//! shared or looping references; the walk keeps a visited set and treats any
//! revisit as malformed, so the result is always a finite owning tree.
//! Structural damage below the root prunes the affected subtree and keeps
//! the rest.

use std::collections::HashSet;

use log::{debug, trace, warn};
use rageweb_rsc::RegionReader;
use rageweb_texture::{PixelFormat, Texture, TextureError};

use crate::node::{Element, ElementKind, Node};
use crate::style::{AttrValue, Border, Edges, RenderState};
use crate::tag::Tag;

/// Node prefix: vtable, kind word, parent pointer, child array triple.
const NODE_PREFIX: usize = 20;
/// Size of the render-state record that follows the prefix.
const RENDER_STATE_SIZE: usize = 0xC4;

/// Mipmap level counts above this are presumed corrupt; the adjacent bytes
/// of that field are not fully mapped.
const MAX_MIP_LEVELS: u8 = 12;

pub(crate) struct GraphParser<'a> {
    mem: RegionReader<'a>,
    visited: HashSet<usize>,
}

impl<'a> GraphParser<'a> {
    pub fn new(system: &'a [u8]) -> Self {
        Self {
            mem: RegionReader::new(system),
            visited: HashSet::new(),
        }
    }

    pub fn mem(&self) -> &RegionReader<'a> {
        &self.mem
    }

    /// Parses the node at `offset`, or nothing if the offset is null,
    /// out of range, already visited, or structurally unrecognizable.
    pub fn node(&mut self, offset: usize) -> Option<Node> {
        if offset == 0 || !self.mem.contains(offset) {
            return None;
        }
        if !self.visited.insert(offset) {
            debug!("node at 0x{offset:X} already in the tree, pruning");
            return None;
        }

        // the vtable word identifies the runtime class; diagnostic only
        let vtable = self.mem.u32_at(offset);
        let kind_raw = self.mem.u32_at(offset + 4);
        trace!("node at 0x{offset:X}: kind {kind_raw}, vtable 0x{vtable:08X}");

        let child_array = self.mem.ptr_at(offset + 12);
        let _count = self.mem.u16_at(offset + 16);
        let capacity = self.mem.u16_at(offset + 18) as usize;
        let children = match child_array.system_offset() {
            Some(array) => self.children(array, capacity),
            None => Vec::new(),
        };

        let state = offset + NODE_PREFIX;
        let tail = state + RENDER_STATE_SIZE;

        // Data nodes carry a single string pointer after the render state.
        if kind_raw == 1 {
            return Some(Node::Data(self.string_at(tail)));
        }

        let kind = match kind_raw {
            0 => ElementKind::Plain,
            2 => ElementKind::Table,
            3 => ElementKind::TableCell,
            _ => {
                debug!("unknown node kind {kind_raw} at 0x{offset:X}, pruning");
                return None;
            }
        };

        let tag_raw = self.mem.u32_at(tail);
        let Some(tag) = Tag::from_raw(tag_raw) else {
            debug!("unknown tag {tag_raw} at 0x{offset:X}, pruning");
            return None;
        };

        // The tag-name string duplicates the tag id, except for the content
        // pseudo-tags, where the name slot holds the text itself.
        let tag_name = self.string_at(tail + 4);
        let text = if matches!(tag, Tag::Text | Tag::ScriptObject) {
            tag_name
        } else {
            String::new()
        };

        // Link address: a counted byte run, not null-terminated.
        let link_ptr = self.mem.ptr_at(tail + 8);
        let link_len = self.mem.u16_at(tail + 12) as usize;
        let link = match link_ptr.system_offset() {
            Some(run) if link_len > 0 => {
                String::from_utf8_lossy(self.mem.bytes_at(run, link_len)).into_owned()
            }
            _ => String::new(),
        };

        let mut style = self.render_state(state);
        if style.background_image_offset != 0 {
            style.background_image = self.texture_name(style.background_image_offset as usize);
        }

        Some(Node::Element(Element {
            kind,
            tag,
            link,
            text,
            style,
            children,
        }))
    }

    /// Child slots are iterated over the array *capacity*; the count field
    /// does not bound the live entries in source data.
    fn children(&mut self, array: usize, capacity: usize) -> Vec<Node> {
        let mut children = Vec::new();
        for i in 0..capacity {
            if let Some(child) = self.mem.ptr_at(array + i * 4).system_offset() {
                if let Some(node) = self.node(child) {
                    children.push(node);
                }
            }
        }
        children
    }

    fn render_state(&self, o: usize) -> RenderState {
        let m = &self.mem;
        RenderState {
            display: AttrValue::from_raw(m.u32_at(o)),
            width: m.f32_at(o + 0x04),
            height: m.f32_at(o + 0x08),
            background_color: m.u32_at(o + 0x20),
            background_image_offset: m.ptr_at(o + 0x24).offset() as u32,
            background_image: String::new(),
            background_repeat: AttrValue::from_raw(m.u32_at(o + 0x30)),
            color: m.u32_at(o + 0x34),
            h_align: AttrValue::from_raw(m.u32_at(o + 0x38)),
            v_align: AttrValue::from_raw(m.u32_at(o + 0x3C)),
            text_decoration: AttrValue::from_raw(m.u32_at(o + 0x40)),
            font_size: AttrValue::from_raw(m.u32_at(o + 0x48)),
            font_style: m.i32_at(o + 0x4C),
            font_weight: m.i32_at(o + 0x50),
            border_bottom: Border {
                color: m.u32_at(o + 0x58),
                style: AttrValue::from_raw(m.u32_at(o + 0x5C)),
                width: m.f32_at(o + 0x60),
            },
            border_left: Border {
                color: m.u32_at(o + 0x64),
                style: AttrValue::from_raw(m.u32_at(o + 0x68)),
                width: m.f32_at(o + 0x6C),
            },
            border_right: Border {
                color: m.u32_at(o + 0x70),
                style: AttrValue::from_raw(m.u32_at(o + 0x74)),
                width: m.f32_at(o + 0x78),
            },
            border_top: Border {
                color: m.u32_at(o + 0x7C),
                style: AttrValue::from_raw(m.u32_at(o + 0x80)),
                width: m.f32_at(o + 0x84),
            },
            margin: Edges {
                bottom: m.f32_at(o + 0x88),
                left: m.f32_at(o + 0x8C),
                right: m.f32_at(o + 0x90),
                top: m.f32_at(o + 0x94),
            },
            padding: Edges {
                bottom: m.f32_at(o + 0x98),
                left: m.f32_at(o + 0x9C),
                right: m.f32_at(o + 0xA0),
                top: m.f32_at(o + 0xA4),
            },
            cell_padding: m.f32_at(o + 0xA8),
            cell_spacing: m.f32_at(o + 0xAC),
            col_span: m.i32_at(o + 0xB0),
            row_span: m.i32_at(o + 0xB4),
            has_background: m.u8_at(o + 0xB8) == 1,
            link_color: m.u32_at(o + 0xBC),
        }
    }

    /// Dereferences a string through a system-tagged pointer word.
    fn string_at(&self, ptr_offset: usize) -> String {
        match self.mem.ptr_at(ptr_offset).system_offset() {
            Some(target) => self.mem.cstr_at(target),
            None => String::new(),
        }
    }

    /// Reads the name out of the texture record a background image points at.
    fn texture_name(&self, record: usize) -> String {
        if !self.mem.contains(record) {
            return String::new();
        }
        self.string_at(record + 0x14)
    }

    /// Parses the texture dictionary at `offset` and binds every entry to
    /// its graphics bytes. Unreadable entries are logged and dropped; a bind
    /// failure keeps the entry so the caller can report it.
    pub fn texture_dictionary(&self, offset: usize, graphics: &[u8]) -> Vec<Texture> {
        let m = &self.mem;

        // Dictionary header: vtable, paging base, parent, use count, then
        // the hash array header, then the texture array triple.
        let array_ptr = m.ptr_at(offset + 32);
        let count = m.u16_at(offset + 36) as usize;
        let capacity = m.u16_at(offset + 38) as usize;

        let Some(array) = array_ptr.system_offset() else {
            return Vec::new();
        };

        let mut textures = Vec::new();
        for i in 0..count.min(capacity) {
            let Some(record) = m.ptr_at(array + i * 4).system_offset() else {
                continue;
            };
            if !m.contains(record) {
                continue;
            }

            match self.texture_info(record) {
                Ok(mut tex) => {
                    if let Err(err) = tex.bind(graphics) {
                        warn!("texture '{}': {err}", tex.name);
                    }
                    textures.push(tex);
                }
                Err(err) => warn!("texture record at 0x{record:X}: {err}"),
            }
        }
        textures
    }

    fn texture_info(&self, o: usize) -> Result<Texture, TextureError> {
        let m = &self.mem;

        let name = self.string_at(o + 0x14);
        let width = m.u16_at(o + 0x1C);
        let height = m.u16_at(o + 0x1E);

        let raw_format = m.u32_at(o + 0x20);
        let format =
            PixelFormat::from_raw(raw_format).ok_or(TextureError::UnsupportedFormat(raw_format))?;

        let mut levels = m.u8_at(o + 0x27);
        if levels > MAX_MIP_LEVELS {
            warn!("texture '{name}' claims {levels} mip levels, clamping to {MAX_MIP_LEVELS}");
            levels = MAX_MIP_LEVELS;
        }

        // Raw-data pointer: only the low 28 bits (the graphics offset) are
        // meaningful here.
        let data_offset = m.ptr_at(o + 0x48).offset();

        Ok(Texture {
            name,
            width,
            height,
            format,
            levels,
            data_offset,
            data: Vec::new(),
        })
    }
}
