//! Texture dictionaries embedded in `RSC7` containers.
//!
//! The newer container generation stores its texture records in a layout
//! that is only partially mapped. Width and height sit at fixed offsets, but
//! the name and pixel-data pointers move between revisions, so both are
//! located by scanning the record for the first plausible tagged pointer of
//! the right segment. The pixel format is likewise not read from the record:
//! it is inferred from the bytes left in the graphics segment.

use log::{debug, warn};
use rageweb_rsc::{RegionReader, ResourceFile};

use crate::{PixelFormat, Texture};

/// Widest window a texture record is scanned over, in bytes.
const RECORD_WINDOW: usize = 0x80;

/// Parses the texture dictionary at the start of an `RSC7` system segment
/// and binds every usable texture to its graphics bytes.
///
/// Records that cannot be resolved (no plausible name, no data pointer, not
/// enough pixel bytes) are logged and skipped; the rest still decode.
pub fn read_texture_dictionary(resource: &ResourceFile) -> Vec<Texture> {
    let system = RegionReader::new(&resource.system);
    if system.len() < 0x40 {
        warn!("system segment too small for a texture dictionary");
        return Vec::new();
    }

    // Dictionary header: the texture pointer list and its occupancy.
    let list = system.ptr64_at(0x30);
    let count = system.u16_at(0x38) as usize;
    let capacity = system.u16_at(0x3A) as usize;
    debug!(
        "texture dictionary: {count} of {capacity} entries at 0x{:X}",
        list.offset()
    );

    if list.is_null() || count == 0 {
        return Vec::new();
    }

    let list_offset = list.offset();
    if !system.contains(list_offset) {
        warn!("texture list pointer out of bounds: 0x{list_offset:X}");
        return Vec::new();
    }

    let mut textures = Vec::new();
    for i in 0..count {
        let entry = system.ptr64_at(list_offset + i * 8);
        if entry.is_null() {
            continue;
        }

        let record = entry.offset();
        if !system.contains(record) {
            warn!("texture {i}: record pointer out of bounds: 0x{record:X}");
            continue;
        }

        if let Some(tex) = read_record(&system, &resource.graphics, record) {
            textures.push(tex);
        } else {
            warn!("texture {i}: unresolvable record at 0x{record:X}");
        }
    }

    textures
}

fn read_record(system: &RegionReader, graphics: &[u8], record: usize) -> Option<Texture> {
    if record + RECORD_WINDOW > system.len() {
        return None;
    }

    let width = system.u16_at(record + 0x18);
    let height = system.u16_at(record + 0x1A);

    // First system pointer in the record that lands on a plausible name.
    let mut name = String::new();
    for off in (0..RECORD_WINDOW).step_by(8) {
        if let Some(target) = system.ptr64_at(record + off).system_offset() {
            if system.contains(target) {
                let candidate = system.cstr_at(target);
                if is_valid_name(&candidate) {
                    name = candidate;
                    break;
                }
            }
        }
    }
    if name.is_empty() {
        return None;
    }

    // First graphics pointer is the pixel payload.
    let data_offset = (0..RECORD_WINDOW)
        .step_by(8)
        .find_map(|off| system.ptr64_at(record + off).graphics_offset())?;

    let (format, data) = infer_pixels(graphics, data_offset, width, height)?;

    Some(Texture {
        name,
        width,
        height,
        format,
        levels: 1,
        data_offset,
        data,
    })
}

/// Chooses between DXT5 and DXT1 by the bytes remaining past the payload
/// offset. With multiple textures packed end to end this can overestimate,
/// so the per-record size should replace it once its field is mapped.
fn infer_pixels(
    graphics: &[u8],
    offset: usize,
    width: u16,
    height: u16,
) -> Option<(PixelFormat, Vec<u8>)> {
    let blocks = (width as usize / 4) * (height as usize / 4);
    let available = graphics.len().checked_sub(offset)?;

    if available >= blocks * 16 {
        Some((
            PixelFormat::Dxt5,
            graphics[offset..offset + blocks * 16].to_vec(),
        ))
    } else if available >= blocks * 8 {
        Some((
            PixelFormat::Dxt1,
            graphics[offset..offset + blocks * 8].to_vec(),
        ))
    } else {
        None
    }
}

/// Texture names are short path-safe identifiers.
fn is_valid_name(s: &str) -> bool {
    (1..100).contains(&s.len())
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
