mod business;
mod export;
mod preview;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use leadgen_client::LeadgenClient;
use leadgen_preview::AcquisitionController;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::business::BusinessCommands;
use crate::preview::PreviewOptions;

#[derive(Debug, Parser)]
#[command(name = "leadgen-cli")]
#[command(about = "Lead-generation dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect or evaluate a business
    Business {
        #[command(subcommand)]
        command: BusinessCommands,
    },
    /// Open an AI template preview for a qualified lead
    Preview {
        /// Business ID
        id: Uuid,
        /// Number of variants to generate when none exist (1-3)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=3))]
        variants: Option<u32>,
        /// Variant number to select
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        select: Option<u32>,
        /// Replace the current templates with a fresh set
        #[arg(long)]
        regenerate: bool,
        /// Use the lightweight list-card preview instead of the detail modal
        #[arg(long)]
        card: bool,
        /// Print the sandboxed iframe markup for the selected variant
        #[arg(long)]
        frame: bool,
        /// Render the frame fullscreen
        #[arg(long)]
        fullscreen: bool,
    },
    /// Download a variant's HTML and CSS
    Export {
        /// Business ID
        id: Uuid,
        /// Variant number to export
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        variant: u32,
        /// Output directory (defaults to LEADGEN_EXPORT_DIR/<id>)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write a standalone preview page and open it
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("leadgen-cli: no command given; see --help");
        return Ok(());
    };

    let config = leadgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api = %config.api_base_url, "config loaded");

    let client = Arc::new(LeadgenClient::new(&config)?);
    let controller = AcquisitionController::new(client);

    match command {
        Commands::Business { command } => match command {
            BusinessCommands::Show { id } => business::run_business_show(controller, id).await?,
            BusinessCommands::Evaluate { id } => {
                business::run_business_evaluate(controller, id).await?;
            }
        },
        Commands::Preview {
            id,
            variants,
            select,
            regenerate,
            card,
            frame,
            fullscreen,
        } => {
            let options = PreviewOptions {
                variants: variants.unwrap_or(config.template_variants),
                select,
                regenerate,
                card,
                frame,
                fullscreen,
            };
            preview::run_preview(controller, id, &options).await?;
        }
        Commands::Export {
            id,
            variant,
            out,
            open,
        } => {
            let dir = out.unwrap_or_else(|| config.export_dir.join(id.to_string()));
            export::run_export(controller, id, config.template_variants, variant, &dir, open)
                .await?;
        }
    }

    Ok(())
}
