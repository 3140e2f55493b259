//! Serializes a decoded document to a static HTML page.
//!
//! The in-game renderer drew pages on a television at a fixed zoom with its
//! own font, so the page shell recreates that: DIN over a black backdrop,
//! zoomed up. Structure follows the source tree; the `html`/`head` wrappers
//! are unwrapped (the shell provides its own), `style` elements are elided,
//! and the `body` becomes a centered full-viewport container.

use rageweb_whm::{AttrValue, Document, Element, ElementKind, Node, Tag};

use crate::localization::Localization;
use crate::site;

pub fn page(doc: &Document, current_site: &str, depth: usize, strings: &Localization) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n");
    out.push_str(&format!(
        "@font-face {{\n  font-family: 'DIN Medium';\n  font-style: normal;\n  \
         font-weight: normal;\n  src: local('DIN Medium'), url('{}ttf/DIN-Medium.woff2') \
         format('woff2');\n}}\n",
        "../".repeat(depth)
    ));
    out.push_str(
        "body {\n  font-family: 'DIN Medium', Helvetica, Arial, sans-serif;\n  margin: 0;\n  \
         padding: 0;\n  background-color: #000;\n  zoom: 150%;\n}\n</style>\n</head><body>",
    );

    write_node(&doc.root, &mut out, current_site, strings);

    out.push_str("</body></html>");
    out
}

fn write_node(node: &Node, out: &mut String, site: &str, strings: &Localization) {
    match node {
        Node::Data(text) => {
            if !text.is_empty() {
                out.push_str(&escape(strings.get(text)));
            }
        }
        Node::Element(el) => write_element(el, out, site, strings),
    }
}

fn write_element(el: &Element, out: &mut String, site: &str, strings: &Localization) {
    match el.tag {
        // the shell supplies its own stylesheet
        Tag::Style => return,

        Tag::Text | Tag::ScriptObject => {
            if !el.text.is_empty() {
                out.push_str(&escape(strings.get(&el.text)));
            } else if !el.link.is_empty() {
                out.push_str(&escape(strings.get(&el.link)));
            } else {
                for child in &el.children {
                    write_node(child, out, site, strings);
                }
            }
            return;
        }

        // unwrapped; the shell provides the real document element
        Tag::Html | Tag::Head => {
            for child in &el.children {
                write_node(child, out, site, strings);
            }
            return;
        }

        Tag::Body => {
            out.push_str(&format!(
                "<div style=\"background-color: {}; min-height: 100vh; display: flex; \
                 justify-content: center; align-items: flex-start;\">\
                 <div style=\"max-width: 100%; margin: 0 auto;\">",
                css_color(el.style.background_color)
            ));
            for child in &el.children {
                write_node(child, out, site, strings);
            }
            out.push_str("</div></div>");
            return;
        }

        _ => {}
    }

    let name = el.tag.as_str();
    let attrs = attributes(el, site);
    if el.children.is_empty() {
        out.push_str(&format!("<{name}{attrs}/>"));
    } else {
        out.push_str(&format!("<{name}{attrs}>"));
        for child in &el.children {
            write_node(child, out, site, strings);
        }
        out.push_str(&format!("</{name}>"));
    }
}

fn attributes(el: &Element, site: &str) -> String {
    if matches!(el.tag, Tag::Html | Tag::Head | Tag::Title | Tag::Style) {
        return String::new();
    }

    let rs = &el.style;
    let mut attrs: Vec<(&str, String)> = Vec::new();
    let mut css: Vec<(&str, String)> = Vec::new();

    if rs.has_background {
        if rs.background_image_offset == 0 {
            css.push(("background-color", css_color(rs.background_color)));
        } else if !rs.background_image.is_empty() {
            css.push((
                "background-image",
                format!("url({}.png)", rs.background_image),
            ));
            if let Some(repeat) = rs.background_repeat {
                css.push(("background-repeat", repeat.css().into()));
            }
        }
    }

    // Table containers and cells take their box metrics as attributes.
    if rs.width > -1.0 {
        if el.kind.is_table() {
            attrs.push(("width", format!("{:.0}", rs.width)));
        } else {
            css.push(("width", css_px(rs.width)));
        }
    }
    if rs.height > -1.0 {
        if el.kind.is_table() {
            attrs.push(("height", format!("{:.0}", rs.height)));
        } else {
            css.push(("height", css_px(rs.height)));
        }
    }

    for (name, value) in [
        ("margin-left", rs.margin.left),
        ("margin-right", rs.margin.right),
        ("margin-top", rs.margin.top),
        ("margin-bottom", rs.margin.bottom),
        ("padding-left", rs.padding.left),
        ("padding-right", rs.padding.right),
        ("padding-top", rs.padding.top),
        ("padding-bottom", rs.padding.bottom),
    ] {
        if value != 0.0 {
            css.push((name, css_px(value)));
        }
    }

    for (name, border) in [
        ("border-left", &rs.border_left),
        ("border-right", &rs.border_right),
        ("border-top", &rs.border_top),
        ("border-bottom", &rs.border_bottom),
    ] {
        if let Some(style) = border.style {
            if style != AttrValue::None && border.width > 0.0 {
                css.push((
                    name,
                    format!("{} {} {}", style.css(), css_px(border.width), css_color(border.color)),
                ));
            }
        }
    }

    if let Some(deco) = rs.text_decoration {
        css.push(("text-decoration", deco.css().into()));
    }
    if let Some(size) = rs.font_size {
        css.push(("font-size", size.css().into()));
    }

    // Tables keep their native display behavior.
    let table_tag = matches!(el.tag, Tag::Table | Tag::Tr | Tag::Td | Tag::Th);
    if !table_tag && !el.kind.is_table() {
        if let Some(display) = rs.display {
            if display != AttrValue::Inline {
                css.push(("display", display.css().into()));
            }
        }
    }

    if rs.color != 0 {
        css.push(("color", css_color(rs.color)));
    }

    match el.kind {
        ElementKind::Table => {
            attrs.push(("cellpadding", format!("{:.0}", rs.cell_padding)));
            attrs.push(("cellspacing", format!("{:.0}", rs.cell_spacing)));
            if rs.cell_spacing == 0.0 {
                css.push(("border-collapse", "collapse".into()));
            }
        }
        ElementKind::TableCell => {
            if rs.col_span > 1 {
                attrs.push(("colspan", rs.col_span.to_string()));
            }
            if rs.row_span > 1 {
                attrs.push(("rowspan", rs.row_span.to_string()));
            }
            if let Some(valign) = rs.v_align {
                attrs.push(("valign", valign.css().into()));
            }
            if let Some(align) = rs.h_align {
                attrs.push(("align", align.css().into()));
            }
        }
        ElementKind::Plain => {
            if let Some(valign) = rs.v_align {
                if valign != AttrValue::Inherit {
                    css.push(("vertical-align", valign.css().into()));
                }
            }
            if let Some(align) = rs.h_align {
                if align != AttrValue::Inherit {
                    css.push(("text-align", align.css().into()));
                }
            }
        }
    }

    match el.tag {
        Tag::A => {
            let href = if el.link.is_empty() {
                "#".to_string()
            } else {
                site::rewrite_href(&el.link, site)
            };
            attrs.push(("href", href));
        }
        Tag::Img => {
            if !el.link.is_empty() {
                attrs.push(("src", site::image_src(&el.link)));
            }
        }
        _ => {}
    }

    let mut result = String::new();
    if !css.is_empty() {
        let mut style = String::new();
        for (name, value) in &css {
            style.push_str(&format!("{name}: {value}; "));
        }
        attrs.push(("style", style.trim_end().to_string()));
    }
    for (name, value) in &attrs {
        result.push_str(&format!(" {name}=\"{value}\""));
    }
    result
}

fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xFFFFFF)
}

fn css_px(value: f32) -> String {
    format!("{value:.0}px")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
