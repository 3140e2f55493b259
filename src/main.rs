mod export;
mod indexes;
mod localization;
mod ruffle;
mod site;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use rageweb_gfx::GfxFile;
use rageweb_rsc::ResourceFile;
use rageweb_texture::{ytd, Texture};
use rageweb_whm::Document;

use crate::localization::Localization;

#[macro_use]
extern crate log;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Converts in-game websites into a browsable static archive")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Convert a tree of WHM pages into HTML sites with decoded textures
    Whm {
        /// Directory containing www.* site directories of .whm files
        source: PathBuf,
        /// Game directory of the archive to write into
        target: PathBuf,
        /// Localization table (key = value lines)
        #[arg(short, long)]
        strings: Option<PathBuf>,
    },
    /// Convert Scaleform GFX sites and their RSC7 texture dictionaries
    Gfx {
        /// Game data directory containing the scaleform web folders
        source: PathBuf,
        /// Game directory of the archive to write into
        target: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Whm {
            source,
            target,
            strings,
        } => run_whm(&source, &target, strings.as_deref()),
        Command::Gfx { source, target } => run_gfx(&source, &target),
    }
}

fn run_whm(source: &Path, target: &Path, strings: Option<&Path>) -> Result<()> {
    let strings = match strings {
        Some(path) => Localization::load(path),
        None => Localization::default(),
    };
    if !strings.is_empty() {
        info!("loaded {} localization strings", strings.len());
    }

    let mut pages = glob_ext(source, "whm")?;
    pages.retain(|path| {
        path.strip_prefix(source)
            .ok()
            .and_then(site::site_name)
            .is_some()
    });
    info!("{} pages under {}", pages.len(), source.display());

    let errors = AtomicUsize::new(0);
    pages.par_iter().for_each(|path| {
        if let Err(err) = convert_page(source, target, path, &strings) {
            error!("{}: {err:#}", path.display());
            errors.fetch_add(1, Ordering::Relaxed);
        }
    });

    let errors = errors.into_inner();
    if errors > 0 {
        warn!("conversion finished with {errors} errors");
    } else {
        info!("conversion finished");
    }

    indexes::write(target)
}

fn convert_page(source: &Path, target: &Path, path: &Path, strings: &Localization) -> Result<()> {
    let rel = path.strip_prefix(source)?;
    let page_site = site::site_name(rel).context("page outside a www.* site directory")?;
    let depth = rel.components().count();

    let data = std::fs::read(path)?;
    let doc = Document::read(&data)?;

    let out_path = target.join(rel).with_extension("html");
    let out_dir = out_path.parent().context("output path has no parent")?;
    std::fs::create_dir_all(out_dir)?;
    std::fs::write(&out_path, export::page(&doc, &page_site, depth, strings))?;
    info!("{} -> {}", path.display(), out_path.display());

    let mut written = 0usize;
    for tex in &doc.textures {
        if tex.data.is_empty() {
            warn!("  texture '{}' has no pixel data", tex.name);
            continue;
        }
        match write_texture(out_dir, tex) {
            Ok(()) => written += 1,
            Err(err) => warn!("  texture '{}': {err:#}", tex.name),
        }
    }
    if written > 0 {
        info!("  {written} textures");
    }

    Ok(())
}

/// Decodes a texture to RGBA and writes it as a PNG under `dir`. Texture
/// names may carry path components, e.g. `Image/banner`.
fn write_texture(dir: &Path, tex: &Texture) -> Result<()> {
    let rgba = tex.decode_rgba()?;
    let image = image::RgbaImage::from_raw(tex.width as u32, tex.height as u32, rgba)
        .context("decoded pixel buffer does not match the texture dimensions")?;

    let path = dir.join(format!("{}.png", tex.name));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Scaleform web movies ship split across the base game and its updates.
const SCALEFORM_DIRS: &[&str] = &[
    "x64b_scaleform_web",
    "update_scaleform_web",
    "update_copy_scaleform_web",
];

fn run_gfx(source: &Path, target: &Path) -> Result<()> {
    std::fs::create_dir_all(target)?;

    // the shared font library lives next to the web movies
    let fontlib = source.join("gfxfontlib.gfx");
    if fontlib.is_file() {
        match GfxFile::read(&std::fs::read(&fontlib)?) {
            Ok(gfx) => {
                std::fs::write(target.join("gfxfontlib.swf"), gfx.to_swf())?;
                info!("converted gfxfontlib.gfx");
            }
            Err(err) => warn!("gfxfontlib.gfx: {err:#}"),
        }
    }

    let mut processed = 0usize;
    let mut errors = 0usize;

    for dir in SCALEFORM_DIRS {
        let dir = source.join(dir);
        if !dir.is_dir() {
            debug!("skipping missing directory {}", dir.display());
            continue;
        }
        info!("processing {}", dir.display());

        for path in glob_ext(&dir, "ytd")? {
            let Some(stem) = file_stem(&path) else { continue };
            if !is_web_site_stem(&stem) {
                continue;
            }
            let out_dir = target.join(site::site_dir_name(&stem));
            match extract_ytd(&path, &out_dir) {
                Ok(count) => info!("{}: {count} textures", path.display()),
                Err(err) => {
                    error!("{}: {err:#}", path.display());
                    errors += 1;
                }
            }
        }

        for path in glob_ext(&dir, "gfx")? {
            let Some(stem) = file_stem(&path) else { continue };
            // the in-game browser shell itself is not a site
            if stem.to_lowercase().starts_with("web_browser") || !is_web_site_stem(&stem) {
                continue;
            }
            let out_page = target.join(site::site_dir_name(&stem)).join("index.html");
            match ruffle::export(&path, &out_page, 1) {
                Ok(()) => {
                    info!("{} -> {}", path.display(), out_page.display());
                    processed += 1;
                }
                Err(err) => {
                    error!("{}: {err:#}", path.display());
                    errors += 1;
                }
            }
        }
    }

    if errors > 0 {
        warn!("conversion finished with {errors} errors");
    } else {
        info!("conversion finished");
    }

    if processed > 0 {
        indexes::write(target)?;
    }
    Ok(())
}

fn extract_ytd(path: &Path, out_dir: &Path) -> Result<usize> {
    let data = std::fs::read(path)?;
    let resource = ResourceFile::read_rsc7(&data)?;
    let textures = ytd::read_texture_dictionary(&resource);

    std::fs::create_dir_all(out_dir)?;
    let mut written = 0;
    for tex in &textures {
        match write_texture(out_dir, tex) {
            Ok(()) => written += 1,
            Err(err) => warn!("  texture '{}': {err:#}", tex.name),
        }
    }
    Ok(written)
}

fn is_web_site_stem(stem: &str) -> bool {
    let lower = stem.to_lowercase();
    lower.starts_with("www_") || lower.starts_with("foreclosures_")
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

fn glob_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("**").join(format!("*.{ext}"));
    let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .with_context(|| format!("bad pattern for {}", dir.display()))?
        .flatten()
        .collect();
    paths.sort();
    Ok(paths)
}
