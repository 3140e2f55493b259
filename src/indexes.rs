//! Landing pages for the converted archive: a root page linking each game
//! directory and, per game, a directory of its converted sites.

use std::path::Path;

use anyhow::{Context, Result};

const ROOT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>In-Game Web Archive</title>
    <style>
        @font-face {
            font-family: 'DIN Medium';
            font-style: normal;
            font-weight: normal;
            src: local('DIN Medium'), url('ttf/DIN-Medium.woff2') format('woff2');
        }
        body {
            font-family: 'DIN Medium', Arial, Helvetica, sans-serif;
            background-color: #f5f5f5;
            margin: 40px;
            line-height: 1.6;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 40px;
            border: 1px solid #ddd;
        }
        h1 {
            font-size: 32px;
            color: #333;
            border-bottom: 2px solid #333;
            padding-bottom: 10px;
        }
        .game-card {
            display: block;
            border: 1px solid #ccc;
            padding: 20px;
            margin-bottom: 15px;
            text-decoration: none;
            color: #0066cc;
            font-size: 20px;
        }
        .game-card:hover {
            background: #f9f9f9;
            border-color: #999;
        }
        .footer {
            margin-top: 40px;
            padding-top: 20px;
            border-top: 1px solid #ddd;
            font-size: 12px;
            color: #999;
            text-align: center;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>In-Game Web Archive</h1>
        <p>Browse the internet the way the game shipped it.</p>
{{cards}}
        <div class="footer">Converted from the original game resources</div>
    </div>
</body>
</html>
"#;

const SITES_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}} - Website Directory</title>
    <style>
        @font-face {
            font-family: 'DIN Medium';
            font-style: normal;
            font-weight: normal;
            src: local('DIN Medium'), url('../ttf/DIN-Medium.woff2') format('woff2');
        }
        body {
            font-family: 'DIN Medium', Arial, Helvetica, sans-serif;
            background-color: #f5f5f5;
            margin: 40px;
            line-height: 1.6;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            padding: 40px;
            border: 1px solid #ddd;
        }
        h1 {
            font-size: 32px;
            color: #333;
            border-bottom: 2px solid #333;
            padding-bottom: 10px;
        }
        .count {
            display: inline-block;
            background: #eee;
            padding: 5px 10px;
            font-size: 14px;
            color: #666;
        }
        .site-list {
            list-style: none;
            padding: 0;
            margin: 20px 0;
            column-count: 3;
            column-gap: 20px;
        }
        .site-list li {
            break-inside: avoid;
            margin-bottom: 5px;
        }
        .site-list a {
            display: block;
            padding: 8px 10px;
            text-decoration: none;
            color: #0066cc;
            background: #f9f9f9;
            border: 1px solid #e0e0e0;
        }
        .site-list a:hover {
            background: #fff;
            border-color: #0066cc;
        }
        @media (max-width: 900px) {
            .site-list { column-count: 2; }
        }
        @media (max-width: 600px) {
            .site-list { column-count: 1; }
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{title}} Websites</h1>
        <div class="count">{{count}} websites available</div>
        <br>
        <a href="../index.html">&larr; Back</a>
        <ul class="site-list">
{{sites}}
        </ul>
    </div>
</body>
</html>
"#;

/// Writes the site directory for one game plus the archive root page.
pub fn write(game_dir: &Path) -> Result<()> {
    write_site_directory(game_dir)?;
    write_root(game_dir)?;
    Ok(())
}

fn write_site_directory(game_dir: &Path) -> Result<()> {
    let sites = subdirectories(game_dir, |name| name.starts_with("www."))?;

    let mut list = String::new();
    for name in &sites {
        let display = name.strip_prefix("www.").unwrap_or(name);
        list.push_str(&format!(
            "            <li><a href=\"{name}/index.html\">{display}</a></li>\n"
        ));
    }

    let title = game_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let html = SITES_TEMPLATE
        .replace("{{title}}", &title)
        .replace("{{count}}", &sites.len().to_string())
        .replace("{{sites}}", &list);

    let path = game_dir.join("index.html");
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    info!("site directory: {} ({} sites)", path.display(), sites.len());
    Ok(())
}

fn write_root(game_dir: &Path) -> Result<()> {
    let root = game_dir.parent().unwrap_or(Path::new("."));

    // every game directory converted so far gets a card
    let games = subdirectories(root, |_| true)?
        .into_iter()
        .filter(|name| root.join(name).join("index.html").is_file())
        .collect::<Vec<_>>();

    let mut cards = String::new();
    for name in &games {
        cards.push_str(&format!(
            "        <a href=\"{name}/index.html\" class=\"game-card\">{}</a>\n",
            name.to_uppercase()
        ));
    }

    let path = root.join("index.html");
    std::fs::write(&path, ROOT_TEMPLATE.replace("{{cards}}", &cards))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn subdirectories(dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if keep(&name) {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}
