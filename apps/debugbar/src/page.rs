//! # Page Assembly
//!
//! Minimal HTML documents for the demo routes, and the footer step that
//! splices a rendered overlay into them:
//!
//! - asset tags for `<head>` before `</head>`
//! - body classes on the `<body>` tag
//! - toggle control, overlay body and footer scripts before `</body>`

use debugbar_core::RenderedOverlay;
use debugbar_core::markup::{Markup, escape};

/// A complete HTML document with `content` as its body.
#[must_use]
pub fn document(title: &str, content: &Markup) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n",
            "<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n"
        ),
        escape(title),
        content
    )
}

/// Splice `overlay` into `page`.
///
/// Pages without `<head>`/`<body>` markers get the overlay appended.
#[must_use]
pub fn inject(page: &str, overlay: &RenderedOverlay) -> String {
    let mut out = page.to_string();

    let head = overlay.assets.render_head();
    match out.find("</head>") {
        Some(at) => out.insert_str(at, &head),
        None => out.insert_str(0, &head),
    }

    if let Some(at) = out.find("<body>") {
        let tag = format!("<body class=\"{}\">", escape(&overlay.body_classes.join(" ")));
        out.replace_range(at..at + "<body>".len(), &tag);
    }

    let mut footer = String::with_capacity(overlay.body.len() + 256);
    footer.push_str(&overlay.toggle);
    footer.push('\n');
    footer.push_str(&overlay.body);
    footer.push_str(&overlay.assets.render_footer());
    match out.rfind("</body>") {
        Some(at) => out.insert_str(at, &footer),
        None => out.push_str(&footer),
    }
    out
}
