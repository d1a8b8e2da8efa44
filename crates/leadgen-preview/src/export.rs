//! Export of already-loaded templates. Nothing here touches the network.
//!
//! Download names are a stable external contract:
//! `template-{variant}.html`, `template-{variant}.css`, `template-{variant}.js`.

use std::fs;
use std::path::{Path, PathBuf};

use leadgen_core::Template;
use uuid::Uuid;

use crate::error::ExportError;
use crate::sandbox::resolve_document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    fn new(file_name: String, mime_type: &'static str, content: &str) -> Self {
        Self {
            file_name,
            mime_type,
            bytes: content.as_bytes().to_vec(),
        }
    }
}

/// Raw `html_content`, plus stylesheet and script when present.
#[must_use]
pub fn download_artifacts(template: &Template) -> Vec<ExportArtifact> {
    let n = template.variant_number;
    let mut artifacts = vec![ExportArtifact::new(
        format!("template-{n}.html"),
        "text/html",
        &template.html_content,
    )];
    if let Some(css) = non_blank(template.css_content.as_deref()) {
        artifacts.push(ExportArtifact::new(format!("template-{n}.css"), "text/css", css));
    }
    if let Some(js) = non_blank(template.js_content.as_deref()) {
        artifacts.push(ExportArtifact::new(
            format!("template-{n}.js"),
            "text/javascript",
            js,
        ));
    }
    artifacts
}

fn non_blank(content: Option<&str>) -> Option<&str> {
    content.filter(|c| !c.trim().is_empty())
}

/// The resolved document as a standalone page for opening outside the
/// embedded frame. Every call gets a fresh name.
#[must_use]
pub fn standalone_blob(template: &Template, business_name: &str) -> ExportArtifact {
    ExportArtifact::new(
        format!("preview-{}-{}.html", template.variant_number, Uuid::new_v4()),
        "text/html",
        &resolve_document(template, business_name),
    )
}

/// Writes `artifacts` into `dir`, creating it first. Existing files with the
/// same names are overwritten.
///
/// # Errors
///
/// Returns [`ExportError`] naming the path that could not be created or written.
pub fn write_artifacts(
    dir: &Path,
    artifacts: &[ExportArtifact],
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError {
        path: dir.to_path_buf(),
        source,
    })?;

    artifacts
        .iter()
        .map(|artifact| {
            let path = dir.join(&artifact.file_name);
            fs::write(&path, &artifact.bytes).map_err(|source| ExportError {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), bytes = artifact.bytes.len(), "wrote artifact");
            Ok(path)
        })
        .collect()
}
