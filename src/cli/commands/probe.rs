//! Probe Command
//!
//! Send a short test prompt to every provider and report each outcome.

use crate::ai::provider::{ProbeOutcome, ProbeReport};
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, render_structured, require_providers};
use crate::constants::probe::TEST_PROMPT;
use crate::types::Result;

pub async fn run(format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load()?;
    require_providers(&ctx.manager)?;

    let report = ctx.manager.probe(TEST_PROMPT).await;

    if let Some(rendered) = render_structured(&report, format)? {
        println!("{}", rendered);
        return Ok(());
    }

    print_text(&report);
    Ok(())
}

fn print_text(report: &ProbeReport) {
    let out = Output::new();
    out.header("Provider Probe");

    for entry in &report.results {
        let label = format!("{} ({})", entry.provider, entry.model);
        match &entry.outcome {
            ProbeOutcome::Success { preview } => out.success(&format!("{}: {}", label, preview)),
            ProbeOutcome::Skipped { reason } => out.warning(&format!("{}: skipped, {}", label, reason)),
            ProbeOutcome::Failed { error, category } => {
                out.error(&format!("{}: [{}] {}", label, category, error))
            }
        }
    }

    println!();
    out.info(&format!(
        "{} of {} providers answered",
        report.successes(),
        report.results.len()
    ));
}
