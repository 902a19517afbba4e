//! HTML preview of a rendered document. Every user value is escaped.

use std::fmt::Write;

use crate::templates::document::{Align, Block, HeaderRule, RenderedDocument};

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// The `href` to emit for a user-supplied link, or `None` when it must be shown
/// as plain text. Bare hosts such as `linkedin.com/in/x` get `https://`.
pub fn link_target(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.chars().any(char::is_control) {
        return None;
    }
    let scheme = href
        .split_once(':')
        .map(|(head, _)| head)
        .filter(|head| {
            !head.is_empty()
                && !head.contains('.')
                && head.chars().all(|c| c.is_ascii_alphanumeric() || "+-".contains(c))
        });
    match scheme {
        Some(scheme) if LINK_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) => {
            Some(href.to_string())
        }
        Some(_) => None,
        None if href.starts_with("//") => Some(format!("https:{href}")),
        None => Some(format!("https://{href}")),
    }
}

fn write_block(out: &mut String, block: &Block, accent: &str) {
    // Writing into a String cannot fail.
    let _ = match block {
        Block::Title { text } => write!(out, "<h1>{}</h1>", escape(text)),
        Block::Subtitle { text } => write!(out, "<h2 class=\"subtitle\">{}</h2>", escape(text)),
        Block::Strong { text } => write!(out, "<h4>{}</h4>", escape(text)),
        Block::Text { text } => write!(out, "<p>{}</p>", escape(text)),
        Block::Muted { text } => write!(out, "<p class=\"muted\">{}</p>", escape(text)),
        Block::Bullets { items } => {
            out.push_str("<ul>");
            for item in items {
                let _ = write!(out, "<li>{}</li>", escape(item));
            }
            out.push_str("</ul>");
            Ok(())
        }
        Block::Tags { label, items } => {
            out.push_str("<div class=\"tags\">");
            if let Some(label) = label {
                let _ = write!(out, "<h5>{}</h5>", escape(label));
            }
            for item in items {
                let _ = write!(out, "<span class=\"tag\">{}</span>", escape(item));
            }
            out.push_str("</div>");
            Ok(())
        }
        Block::Link { label, href } => match link_target(href) {
            Some(target) => write!(
                out,
                "<a href=\"{}\" style=\"color:{accent}\">{}</a>",
                escape(&target),
                escape(label)
            ),
            None => write!(out, "<p>{}: {}</p>", escape(label), escape(href)),
        },
        Block::Inline { items } => {
            let parts: Vec<String> = items.iter().map(|i| escape(i)).collect();
            write!(out, "<p class=\"inline\">{}</p>", parts.join(" &bull; "))
        }
    };
}

pub fn render_html(doc: &RenderedDocument) -> String {
    let p = &doc.palette;
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Preview</title><style>\
         body{{margin:0;background:{bg};color:{text};font-family:Helvetica,Arial,sans-serif}}\
         .page{{width:800px;margin:0 auto;padding:32px;box-sizing:border-box}}\
         h1,h3{{color:{heading}}} .muted{{color:{muted}}}\
         .row{{display:flex;gap:32px}} .tag{{display:inline-block;margin-right:6px}}\
         </style></head><body><div class=\"page\" data-template=\"{id}\">",
        bg = p.background.hex(),
        text = p.text.hex(),
        heading = p.heading.hex(),
        muted = p.muted.hex(),
        id = doc.selection.id(),
    );

    let align = match doc.header.align {
        Align::Left => "left",
        Align::Center => "center",
    };
    let _ = write!(out, "<header style=\"text-align:{align}\">");
    let accent = p.accent.hex();
    for block in &doc.header.blocks {
        write_block(&mut out, block, &accent);
    }
    out.push_str("</header>");
    match doc.header.rule {
        HeaderRule::None => {}
        HeaderRule::Thin => {
            let _ = write!(out, "<hr style=\"border-top:1px solid {}\">", p.muted.hex());
        }
        HeaderRule::Thick => {
            let _ = write!(out, "<hr style=\"border-top:3px solid {}\">", p.heading.hex());
        }
    }

    out.push_str("<div class=\"row\">");
    for column in &doc.columns {
        let _ = write!(
            out,
            "<div class=\"col\" style=\"flex:{} 1 0\">",
            column.span
        );
        for section in &column.sections {
            let _ = write!(out, "<section><h3>{}</h3>", escape(&section.heading));
            for entry in &section.entries {
                out.push_str("<div class=\"entry\">");
                for block in &entry.blocks {
                    write_block(&mut out, block, &accent);
                }
                out.push_str("</div>");
            }
            out.push_str("</section>");
        }
        out.push_str("</div>");
    }
    out.push_str("</div></div></body></html>");
    out
}
