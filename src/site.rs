//! Site naming and link rewriting.
//!
//! Converted sites live in `www.*` directories under the archive root. Page
//! links inside the game data point at absolute in-game URLs; the archive
//! rewrites them to relative paths so it browses from disk.

use std::path::Path;

/// First `www.*` component of a page's path relative to the source root.
pub fn site_name(rel: &Path) -> Option<String> {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .find(|c| c.starts_with("www."))
        .map(|c| c.into_owned())
}

/// Maps a scaleform resource stem to its site directory:
/// `www_example_d_site_com` becomes `www.example-site.com`.
pub fn site_dir_name(stem: &str) -> String {
    stem.replace("_d_", "-").replace('_', ".")
}

/// Rewrites an in-game link target to a path relative to the current site
/// directory. Cross-site links route through the archive root; bare site
/// links land on that site's index; extensionless page names get `.html`.
pub fn rewrite_href(link: &str, current_site: &str) -> String {
    let mut link = link.replace('\\', "/");

    if let Some(stripped) = link.strip_prefix("http://") {
        link = stripped.to_string();
    }

    if link.starts_with("www.") {
        let (target_site, target_path) = match link.split_once('/') {
            Some((site, path)) => (site.to_string(), path.to_string()),
            None => (link.clone(), String::new()),
        };

        link = if target_site == current_site {
            if target_path.is_empty() {
                "index.html".to_string()
            } else {
                target_path
            }
        } else if target_path.is_empty() {
            format!("../{target_site}/index.html")
        } else {
            format!("../{target_site}/{target_path}")
        };
    }

    if !link.ends_with(".html") && !link.ends_with(".htm") {
        let base = link.rsplit('/').next().unwrap_or(&link);
        if !base.contains('.') {
            link.push_str(".html");
        }
    }

    link
}

/// Image sources swap whatever extension they carried for `.png`.
pub fn image_src(link: &str) -> String {
    let stem = match link.rfind('.') {
        Some(dot) => &link[..dot],
        None => link,
    };
    format!("{stem}.png")
}
