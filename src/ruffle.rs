//! Wraps a converted SWF in a Ruffle player page so GFX sites play in a
//! plain browser.

use std::path::Path;

use anyhow::{Context, Result};
use rageweb_gfx::GfxFile;

const PLAYER_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body, html {
            background-color: #000;
            overflow: hidden;
            width: 100%;
            height: 100%;
        }
        #container {
            width: 100vw;
            height: 100vh;
            display: flex;
            justify-content: center;
            align-items: center;
        }
        #player {
            width: 100%;
            height: 100%;
            display: block;
        }
    </style>
    <script src="{{ruffle}}"></script>
</head>
<body>
    <div id="container">
        <embed
            id="player"
            src="{{swf}}"
            width="100%"
            height="100%"
            type="application/x-shockwave-flash"
            allowfullscreen="true"
            quality="high"
            bgcolor="#000000"
            wmode="direct"
        />
    </div>
    <script>
        window.RufflePlayer = window.RufflePlayer || {};
        window.RufflePlayer.config = {
            autoplay: "on",
            unmuteOverlay: "hidden",
            logLevel: "error",
            letterbox: "on",
            scale: "showAll",
            warnOnUnsupportedContent: false,
            contextMenu: "off"
        };
    </script>
</body>
</html>
"##;

/// Converts one GFX movie: writes the repacked SWF next to `out_page` and
/// an HTML player page at `out_page` itself. `depth` is how many directories
/// separate the page from the archive root, where `ruffle/ruffle.js` lives.
pub fn export(gfx_path: &Path, out_page: &Path, depth: usize) -> Result<()> {
    let data = std::fs::read(gfx_path).with_context(|| format!("reading {}", gfx_path.display()))?;
    let gfx = GfxFile::read(&data)?;

    let stem = gfx_path
        .file_stem()
        .context("GFX path has no file name")?
        .to_string_lossy();

    let out_dir = out_page.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(out_dir)?;

    let swf_name = format!("{stem}.swf");
    std::fs::write(out_dir.join(&swf_name), gfx.to_swf())?;

    let title = stem.replace('_', ".").replace("www.", "");
    let html = PLAYER_TEMPLATE
        .replace("{{title}}", &title)
        .replace("{{swf}}", &swf_name)
        .replace("{{ruffle}}", &format!("{}ruffle/ruffle.js", "../".repeat(depth)));

    std::fs::write(out_page, html).with_context(|| format!("writing {}", out_page.display()))?;
    Ok(())
}
