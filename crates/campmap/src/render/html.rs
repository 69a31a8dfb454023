//! HTML fragments for popups, modals and side panels.

use std::fmt::Write as _;

use serde::Serialize;

use super::CampAssets;
use crate::camp::Camp;
use crate::catalog::{Catalog, IconCategory};
use crate::config::{DataSource, StyleConfig};
use crate::error::Result;

/// Escape text for use in HTML element content or a quoted attribute.
#[must_use]
pub fn escape(text: &str) -> String {
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

/// Serialize `value` as JSON that can be embedded in a `<script>` element.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Popup body for one camp.
pub(super) fn popup(
    camp: &Camp,
    index: usize,
    assets: &CampAssets,
    prefix: &str,
    style: &StyleConfig,
) -> String {
    let name = escape(camp.name());
    let text = format!(
        "color: {}; font-size: {}; margin: 5px 0;",
        escape(&style.text_color),
        escape(&style.font_size)
    );

    let mut out = String::new();
    let _ = write!(
        out,
        "<div style=\"font-family: {}; text-align: {}; padding: {};\">",
        escape(&style.font_family),
        escape(&style.text_align),
        escape(&style.padding)
    );
    let _ = write!(
        out,
        "<h4 style=\"color: {}; margin-bottom: 10px;\">{name}</h4>",
        escape(&style.title_color)
    );
    let _ = write!(
        out,
        "<p style=\"{text}\">Population: <strong>{}</strong> at end of 2023</p>",
        escape(camp.population())
    );
    let _ = write!(
        out,
        "<p style=\"{text}\">Latitude: <strong>{:.6}</strong></p>",
        camp.latitude()
    );
    let _ = write!(
        out,
        "<p style=\"{text}\">Longitude: <strong>{:.6}</strong></p>",
        camp.longitude()
    );
    let _ = write!(
        out,
        "<img src=\"{}\" alt=\"Preview of {name}\" \
         style=\"width: 200px; cursor: pointer; margin: 10px 0;\" \
         onclick=\"openModal('modal_{index}')\">",
        escape(&format!("{prefix}{}", assets.preview))
    );
    let _ = write!(
        out,
        "<div style=\"margin-top: 10px; text-align: center;\">\
         <button class=\"camp-button\" style=\"background-color: #27AE60; border: none; cursor: pointer;\" \
         onclick=\"openModal('modal_{index}_results')\">View results</button></div>"
    );
    let _ = write!(
        out,
        "<div style=\"margin-top: 10px; text-align: center;\">\
         <a class=\"camp-button\" style=\"background-color: #3498DB;\" href=\"{}\" download>\
         Download .tif</a></div>",
        escape(&format!("{prefix}{}", assets.download))
    );
    out.push_str("</div>");
    out
}

/// Full-screen image modals for one camp: the preview and the results.
pub(super) fn modals(camp: &Camp, index: usize, assets: &CampAssets, prefix: &str) -> String {
    let name = escape(camp.name());
    let mut out = modal(
        &format!("modal_{index}"),
        &name,
        &escape(&format!("{prefix}{}", assets.preview)),
        &format!("Preview of {name}"),
        "Click anywhere or press Escape to close",
    );
    out.push_str(&modal(
        &format!("modal_{index}_results"),
        &format!("Results for {name}"),
        &escape(&format!("{prefix}{}", assets.results)),
        &format!("Results for {name}"),
        "Click anywhere or press Escape to close",
    ));
    out
}

/// One modal; every argument must already be escaped.
fn modal(id: &str, title: &str, src: &str, alt: &str, caption: &str) -> String {
    format!(
        "  <div id=\"{id}\" class=\"camp-modal\">\n\
         \x20   <span class=\"close\" onclick=\"closeModal('{id}')\">&times;</span>\n\
         \x20   <div class=\"frame\"><div class=\"content\">\n\
         \x20     <h2>{title}</h2>\n\
         \x20     <img src=\"{src}\" alt=\"{alt}\">\n\
         \x20     <p>{caption}</p>\n\
         \x20   </div></div>\n\
         \x20 </div>\n"
    )
}

/// Bottom-left panel with the icon categories and credited sources.
pub(super) fn legend(
    catalog: &Catalog,
    sources: &[DataSource],
    prefix: &str,
    style: &StyleConfig,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  <div class=\"legend\" style=\"position: fixed; bottom: {}; left: {}; width: {}; \
         height: {}; border: {}; z-index: 9999; font-size: {}; background-color: {}; \
         padding: 10px; overflow-y: auto;\">",
        escape(&style.legend_bottom),
        escape(&style.legend_left),
        escape(&style.legend_width),
        escape(&style.legend_height),
        escape(&style.legend_border),
        escape(&style.font_size),
        escape(&style.legend_background)
    );
    out.push_str("    <p style=\"margin: 0 0 8px 0;\"><strong>Legend</strong></p>\n");

    for icon in &catalog.icons {
        if let Some(path) = catalog.icon_path(&icon.key) {
            let _ = writeln!(
                out,
                "    <p style=\"margin: 4px 0;\"><img src=\"{}\" width=\"20\" height=\"20\" \
                 style=\"vertical-align: middle;\"> {}</p>",
                escape(&format!("{prefix}{path}")),
                escape(&icon.description)
            );
        }
    }

    if !sources.is_empty() {
        out.push_str("    <p style=\"margin: 8px 0 4px 0;\"><strong>Sources</strong></p>\n");
        for source in sources {
            let _ = writeln!(
                out,
                "    <p style=\"margin: 2px 0;\"><a href=\"{}\" target=\"_blank\" \
                 rel=\"noopener\">{}</a></p>",
                escape(&source.url),
                escape(&source.label)
            );
        }
    }

    out.push_str("  </div>\n");
    out
}

/// Top-right panel with the camp total and non-empty category counts.
pub(super) fn statistics(
    total: usize,
    counts: &[(&IconCategory, usize)],
    style: &StyleConfig,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  <div class=\"stats\" style=\"position: fixed; top: 10px; right: 10px; z-index: 9999; \
         background-color: {}; border: {}; border-radius: 5px; padding: 10px; font-size: {};\">",
        escape(&style.legend_background),
        escape(&style.legend_border),
        escape(&style.font_size)
    );
    out.push_str("    <h4 style=\"margin: 0 0 5px 0;\">Statistics</h4>\n");
    let _ = writeln!(
        out,
        "    <p style=\"margin: 2px 0;\">Total camps: <strong>{total}</strong></p>"
    );
    for (icon, count) in counts.iter().filter(|(_, count)| *count > 0) {
        let _ = writeln!(
            out,
            "    <p style=\"margin: 2px 0;\">{}: <strong>{count}</strong></p>",
            escape(&icon.description)
        );
    }
    out.push_str("  </div>\n");
    out
}
