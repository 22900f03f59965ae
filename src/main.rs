use clap::Parser;
use hosted_checkout::application::orchestrator::CheckoutOrchestrator;
use hosted_checkout::application::session::CheckoutSession;
use hosted_checkout::config::CheckoutConfig;
use hosted_checkout::domain::submission::SubmitDecision;
use hosted_checkout::infrastructure::in_memory::InMemoryPage;
use hosted_checkout::infrastructure::scripted_sdk::ScriptedSdk;
use hosted_checkout::interfaces::csv::event_writer::EventWriter;
use hosted_checkout::interfaces::json::scenario_reader::{ScenarioReader, Step};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Checkout scenario (JSON) to replay
    input: PathBuf,

    /// Page configuration (JSON). Replaces the scenario's `config` section.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Message shown instead of unexpected confirmation errors
    #[arg(long)]
    generic_error_message: Option<String>,

    /// Log orchestration details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let file = File::open(&cli.input).into_diagnostic()?;
    let scenario = ScenarioReader::new(file).scenario().into_diagnostic()?;

    let mut config = match cli.config {
        Some(path) => CheckoutConfig::from_path(path).into_diagnostic()?,
        None => scenario.config,
    };
    if let Some(message) = cli.generic_error_message {
        config.generic_error_message = message;
    }

    let stdout = io::stdout();
    let mut writer = EventWriter::new(stdout.lock());

    if let Err(e) = config.require_checkout_page() {
        warn!("{e}; checkout orchestration not mounted");
        writer.finish().into_diagnostic()?;
        return Ok(());
    }

    let page = InMemoryPage::new(scenario.page.into_state());
    let sdk = ScriptedSdk::new(scenario.sdk);
    let mut session = CheckoutSession::new(CheckoutOrchestrator::with_page(
        Box::new(sdk),
        page.clone(),
        config,
    ));

    // Every page load checks for a pending confirmation first.
    let steps = std::iter::once(Step::PageLoad).chain(scenario.steps);
    for (index, step) in steps.enumerate() {
        let action = step.action();
        match step {
            Step::Submit { form } => {
                let decision = session.submit(form).await;
                for event in page.take_events().await {
                    writer.write_event(index, action, &event).into_diagnostic()?;
                }
                let result = match decision {
                    SubmitDecision::Allow => "posted",
                    SubmitDecision::Intercepted => "held",
                };
                writer
                    .write_row(index, action, result, form.as_str(), "")
                    .into_diagnostic()?;
                continue;
            }
            Step::HashChange { hash } => {
                page.apply_hash(&hash).await.into_diagnostic()?;
                session.hash_change(&hash).await;
            }
            Step::PageLoad => {
                session.page_load().await;
            }
            Step::Check { id, checked } => {
                page.set_checked(&id, checked).await;
            }
        }
        for event in page.take_events().await {
            writer.write_event(index, action, &event).into_diagnostic()?;
        }
    }

    writer.finish().into_diagnostic()?;

    Ok(())
}
