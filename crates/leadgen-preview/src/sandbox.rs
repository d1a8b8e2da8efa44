//! Isolated rendering of generated markup.
//!
//! Generated templates are untrusted. They render inside an iframe fed by
//! `srcdoc` with a sandbox that allows scripts, forms and popups but never
//! `allow-same-origin` or `allow-top-navigation`, so the content gets an
//! opaque origin: no host cookies, no host storage, no navigating the host.

use std::fmt::Write as _;

use leadgen_core::Template;
use sha2::{Digest, Sha256};

/// Substrings that mark `html_content` as a complete document.
pub const DOCUMENT_MARKERS: [&str; 2] = ["<!DOCTYPE html>", "<html"];

/// Sandbox tokens for the preview frame.
pub const SANDBOX_TOKENS: &str = "allow-scripts allow-forms allow-popups";

/// Literal substring check, not a parse. Case-sensitive.
#[must_use]
pub fn is_full_document(html: &str) -> bool {
    DOCUMENT_MARKERS.iter().any(|marker| html.contains(marker))
}

/// The document a preview renders for `template`.
///
/// A full document is returned verbatim. A fragment is wrapped in a minimal
/// document with the business name as title and `css_content` inlined.
#[must_use]
pub fn resolve_document(template: &Template, business_name: &str) -> String {
    if is_full_document(&template.html_content) {
        return template.html_content.clone();
    }

    let css = template.css_content.as_deref().unwrap_or_default();
    let mut doc = String::with_capacity(template.html_content.len() + css.len() + 256);
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("<meta charset=\"UTF-8\">\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(doc, "<title>{}</title>", escape_html(business_name));
    let _ = writeln!(doc, "<style>\n{css}\n</style>");
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&template.html_content);
    doc.push_str("\n</body>\n</html>\n");
    doc
}

/// Escapes text for an HTML text node or a double- or single-quoted
/// attribute value.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The embedded rendering surface for one selected variant.
///
/// Hosts compare [`key`](Self::key) between renders and recreate the frame
/// whenever it changes, i.e. on every variant switch or content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxFrame {
    key: String,
    title: String,
    srcdoc: String,
}

impl SandboxFrame {
    #[must_use]
    pub fn new(template: &Template, business_name: &str) -> Self {
        Self {
            key: frame_key(template),
            title: format!("{business_name} - variant {}", template.variant_number),
            srcdoc: resolve_document(template, business_name),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The resolved document, unescaped.
    #[must_use]
    pub fn srcdoc(&self) -> &str {
        &self.srcdoc
    }

    #[must_use]
    pub fn sandbox(&self) -> &'static str {
        SANDBOX_TOKENS
    }

    /// `<iframe>` markup for the host page.
    #[must_use]
    pub fn to_html(&self, fullscreen: bool) -> String {
        let class = if fullscreen {
            "template-preview template-preview--fullscreen"
        } else {
            "template-preview"
        };
        format!(
            "<iframe data-key=\"{key}\" class=\"{class}\" title=\"{title}\" \
             sandbox=\"{SANDBOX_TOKENS}\" referrerpolicy=\"no-referrer\" \
             srcdoc=\"{srcdoc}\"></iframe>",
            key = self.key,
            title = escape_html(&self.title),
            srcdoc = escape_html(&self.srcdoc),
        )
    }
}

fn frame_key(template: &Template) -> String {
    let mut hasher = Sha256::new();
    hasher.update(template.id.as_bytes());
    hasher.update(template.variant_number.to_be_bytes());
    hasher.update(template.html_content.as_bytes());
    for part in [&template.css_content, &template.js_content] {
        // Tag and length prefix so `None`, `Some("")` and adjacent fields stay distinct.
        match part {
            Some(text) => {
                hasher.update([1u8]);
                hasher.update((text.len() as u64).to_be_bytes());
                hasher.update(text.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    format!("{:x}", hasher.finalize())
}
