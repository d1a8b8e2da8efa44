//! `business` command handlers: the detail page, rendered as text.

use std::fmt::Write as _;

use clap::Subcommand;
use leadgen_client::LeadgenClient;
use leadgen_preview::{AcquisitionController, BusinessDetail, DetailView, EvaluationStatus};
use uuid::Uuid;

/// Sub-commands available under `business`.
#[derive(Debug, Subcommand)]
pub enum BusinessCommands {
    /// Show score, evaluation and existing templates
    Show {
        /// Business ID
        id: Uuid,
    },
    /// Run a website evaluation and show the refreshed business
    Evaluate {
        /// Business ID
        id: Uuid,
    },
}

/// # Errors
///
/// Returns an error if the business does not exist or cannot be read.
pub(crate) async fn run_business_show(
    controller: AcquisitionController<LeadgenClient>,
    id: Uuid,
) -> anyhow::Result<()> {
    let detail = DetailView::new(controller, id).load().await?;
    print!("{}", render_detail(&detail));
    Ok(())
}

/// # Errors
///
/// Returns an error if the evaluation fails or the business cannot be re-read.
pub(crate) async fn run_business_evaluate(
    controller: AcquisitionController<LeadgenClient>,
    id: Uuid,
) -> anyhow::Result<()> {
    println!("evaluating website, this can take a minute...");
    let detail = DetailView::new(controller, id).evaluate().await?;
    println!("new score: {}", detail.business.score_label());
    print!("{}", render_detail(&detail));
    Ok(())
}

pub(crate) fn render_detail(detail: &BusinessDetail) -> String {
    let business = &detail.business;
    let band = detail.score_band();
    let mut out = String::new();

    let _ = writeln!(out, "{}", business.name);
    for (label, value) in [
        ("category", &business.category),
        ("location", &business.location),
        ("address", &business.address),
        ("email", &business.email),
        ("phone", &business.phone),
        ("website", &business.website_url),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label:<11}{value}");
        }
    }
    let _ = writeln!(
        out,
        "  {:<11}{} ({}, {})",
        "score",
        business.score_label(),
        band.label(),
        band.color()
    );

    match &detail.evaluation {
        EvaluationStatus::Evaluated(evaluation) => {
            let parts: Vec<String> = evaluation
                .sub_scores()
                .iter()
                .map(|(label, percent)| match percent {
                    Some(p) => format!("{label} {p}%"),
                    None => format!("{label} \u{2014}"),
                })
                .collect();
            let _ = writeln!(out, "  {:<11}{}", "evaluation", parts.join(", "));
            let _ = writeln!(
                out,
                "  {:<11}{}",
                "evaluated",
                evaluation.evaluated_at.format("%Y-%m-%d %H:%M")
            );
        }
        EvaluationStatus::NotEvaluated => {
            if let Some(prompt) = detail.evaluation_prompt() {
                let _ = writeln!(out, "  {prompt}");
                let _ = writeln!(out, "  run `leadgen-cli business evaluate {}`", business.id);
            }
        }
    }

    if let Some(callout) = detail.qualified_callout() {
        let _ = writeln!(out, "  {callout}");
        match &detail.existing_templates {
            Some(set) => {
                let _ = writeln!(out, "  {:<11}{}", "templates", set.availability_label());
            }
            None => {
                let _ = writeln!(out, "  {:<11}none yet", "templates");
            }
        }
        let _ = writeln!(out, "  run `leadgen-cli preview {}`", business.id);
    }

    out
}
