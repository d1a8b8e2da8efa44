//! `export` command: download files for one variant, optionally opening a
//! standalone preview page in the system browser.

use std::path::Path;
use std::process::Command;

use anyhow::Context as _;
use leadgen_client::{LeadgenClient, TemplateService};
use leadgen_preview::{download_artifacts, standalone_blob, write_artifacts, AcquisitionController};
use uuid::Uuid;

/// Acquires templates once (generating only when none exist), then writes
/// the requested variant's files to `dir`.
///
/// # Errors
///
/// Returns an error if the business is not a qualified lead, acquisition
/// fails, the variant does not exist, or the files cannot be written.
pub(crate) async fn run_export(
    controller: AcquisitionController<LeadgenClient>,
    id: Uuid,
    desired_count: u32,
    variant: u32,
    dir: &Path,
    open: bool,
) -> anyhow::Result<()> {
    let business = controller.service().get_business(id).await?;
    if !business.is_qualified_lead() {
        anyhow::bail!(
            "{} scored {}: not a qualified lead, nothing to export",
            business.name,
            business.score_label()
        );
    }

    let templates = controller.ensure_templates(id, desired_count).await?;
    let template = templates.by_variant(variant).with_context(|| {
        format!(
            "variant {variant} not found ({})",
            templates.availability_label()
        )
    })?;

    let mut artifacts = download_artifacts(template);
    let blob = open.then(|| standalone_blob(template, &business.name));
    artifacts.extend(blob.clone());

    let written = write_artifacts(dir, &artifacts)?;
    for path in &written {
        println!("wrote {}", path.display());
    }

    if let Some(blob) = blob {
        let page = dir.join(&blob.file_name);
        open_in_browser(&page)
            .with_context(|| format!("failed to open {}", page.display()))?;
    }
    Ok(())
}

fn open_in_browser(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    };
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = Command::new("xdg-open");

    tracing::debug!(path = %path.display(), "opening standalone preview");
    command.arg(path).spawn().map(|_| ())
}
