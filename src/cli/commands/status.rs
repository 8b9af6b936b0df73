//! Status Command
//!
//! Display the provider registry: health, quota usage and last errors.

use crate::ai::provider::StatusSnapshot;
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, render_structured};
use crate::types::Result;

pub fn run(format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load()?;
    let snapshot = ctx.manager.status_snapshot();

    if let Some(rendered) = render_structured(&snapshot, format)? {
        println!("{}", rendered);
        return Ok(());
    }

    print_text(&snapshot);
    Ok(())
}

fn print_text(snapshot: &StatusSnapshot) {
    let out = Output::new();
    out.header("LetterGate Status");

    if snapshot.total_providers() == 0 {
        out.warning("No providers configured. Set an API key such as GEMINI_API_KEY in .env");
        return;
    }

    let mut providers: Vec<_> = snapshot.providers.iter().collect();
    providers.sort_by_key(|(_, p)| p.priority);

    for (name, provider) in providers {
        out.section(name);
        out.field("status", out.status(provider.status));
        out.field("model", &provider.model);
        out.field("priority", provider.priority);
        out.field(
            "minute",
            format!(
                "{}/{}",
                provider.requests_this_minute, provider.max_requests_minute
            ),
        );
        out.field(
            "day",
            format!("{}/{}", provider.requests_today, provider.max_requests_day),
        );
        out.field("errors", provider.error_count);
        if let Some(error) = &provider.last_error {
            out.field("last error", error);
        }
        if let Some(success) = provider.last_success {
            out.field("last success", success.to_rfc3339());
        }
        out.field(
            "available",
            if provider.can_make_request { "yes" } else { "no" },
        );
    }

    println!();
    out.info(&format!(
        "{} of {} providers active",
        snapshot.active_providers(),
        snapshot.total_providers()
    ));
}
