//! `preview` command: runs one preview session and prints what it shows.

use std::fmt::Write as _;

use leadgen_client::{LeadgenClient, TemplateService};
use anyhow::Context as _;
use leadgen_preview::{
    AcquisitionController, PreviewEntry, PreviewSession, PreviewState, ReadyView,
};
use uuid::Uuid;

#[derive(Debug)]
pub(crate) struct PreviewOptions {
    pub variants: u32,
    /// Variant number, matched against `variant_number` like `export --variant`.
    pub select: Option<u32>,
    pub regenerate: bool,
    pub card: bool,
    pub frame: bool,
    pub fullscreen: bool,
}

/// Mounts a preview, optionally regenerates and selects a variant, then
/// prints the resulting state. Acquisition failures are printed, not
/// returned, so the command mirrors what the modal would show.
///
/// # Errors
///
/// Returns an error if the business cannot be read, or if the selected
/// variant is not in the set.
pub(crate) async fn run_preview(
    controller: AcquisitionController<LeadgenClient>,
    id: Uuid,
    options: &PreviewOptions,
) -> anyhow::Result<()> {
    let business = controller.service().get_business(id).await?;
    let entry = if options.card {
        PreviewEntry::Card
    } else {
        PreviewEntry::Detail
    };

    let Some(session) = PreviewSession::open(controller, &business, entry, options.variants) else {
        println!(
            "{} scored {}: not a qualified lead, no preview available",
            business.name,
            business.score_label()
        );
        return Ok(());
    };

    session.mount().await?;
    if options.regenerate {
        if session.can_regenerate() {
            session.regenerate().await?;
        } else {
            println!("regenerate is not offered from the {} preview here", entry.label());
        }
    }

    if let PreviewState::Ready(view) = session.snapshot() {
        if let Some(number) = options.select {
            let index = variant_index(&view, number).with_context(|| {
                format!(
                    "variant {number} not found ({})",
                    view.templates().availability_label()
                )
            })?;
            session.select_variant(index)?;
        }
        if options.fullscreen {
            session.toggle_fullscreen()?;
        }
    }

    let state = session.snapshot();
    print!("{}", render_state(&state, entry));
    if options.frame {
        match session.frame() {
            Some(frame) => {
                let fullscreen = state.ready().is_some_and(|view| view.fullscreen());
                println!("{}", frame.to_html(fullscreen));
            }
            None => println!("no frame: nothing is selected"),
        }
    }

    session.teardown();
    Ok(())
}

/// Position of variant `number` within the displayed set.
fn variant_index(view: &ReadyView, number: u32) -> Option<usize> {
    view.templates()
        .iter()
        .position(|template| template.variant_number == number)
}

pub(crate) fn render_state(state: &PreviewState, entry: PreviewEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", state.status_line());

    match state {
        PreviewState::Ready(view) => {
            for (index, template) in view.templates().iter().enumerate() {
                let marker = if index == view.selected_index() { '>' } else { ' ' };
                let _ = writeln!(
                    out,
                    "{marker} variant {}  generated {}",
                    template.variant_number,
                    template.generated_at.format("%Y-%m-%d %H:%M")
                );
            }
            if let Some(selected) = view.selected() {
                for improvement in &selected.improvements_made {
                    let impact = improvement
                        .impact
                        .as_ref()
                        .map_or_else(String::new, |impact| format!("[{impact}] "));
                    let _ = writeln!(
                        out,
                        "    - {impact}{}: {}",
                        improvement.category, improvement.description
                    );
                }
            }
        }
        PreviewState::Error(view) => {
            if let Some(last_good) = view.last_good() {
                let _ = writeln!(out, "last good set: {}", last_good.availability_label());
            }
            let _ = writeln!(out, "retry: run the command again");
        }
        PreviewState::Idle | PreviewState::Loading | PreviewState::Generating { .. } => {}
    }

    if entry.offers_regenerate(state) {
        let _ = writeln!(out, "regenerate: pass --regenerate");
    }
    out
}
