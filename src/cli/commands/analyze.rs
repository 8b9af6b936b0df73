//! Analyze Command
//!
//! Analyze a letter given as text or as an image/PDF file.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::analysis::{
    AnalysisReport, CommandLineExtractor, ContentKind, LetterAnalyzer, PromptLanguage,
};
use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, render_structured, require_providers};
use crate::types::{GatewayError, Result};

/// Where the letter comes from
#[derive(Debug, Clone)]
pub enum LetterInput {
    Text(String),
    File { path: PathBuf, mime: Option<String> },
}

pub async fn run(input: LetterInput, language: Option<String>, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load()?;
    require_providers(&ctx.manager)?;

    let language = PromptLanguage::from_code(
        language
            .as_deref()
            .unwrap_or(&ctx.config.gateway.default_language),
    );
    let extractor = CommandLineExtractor::new(ctx.config.extraction.clone());
    let analyzer = LetterAnalyzer::new(ctx.manager.clone(), Arc::new(extractor));

    let report = match input {
        LetterInput::Text(text) => analyzer.analyze_text(&text, language).await?,
        LetterInput::File { path, mime } => {
            let mime = match mime {
                Some(mime) => mime,
                None => ContentKind::guess_mime(&path)
                    .map(str::to_string)
                    .ok_or_else(|| GatewayError::UnsupportedContent(path.display().to_string()))?,
            };
            let bytes = tokio::fs::read(&path).await?;
            info!(path = %path.display(), %mime, bytes = bytes.len(), "Read letter file");
            analyzer.analyze_document(&bytes, &mime, language).await?
        }
    };

    if let Some(rendered) = render_structured(&report, format)? {
        println!("{}", rendered);
        return Ok(());
    }

    print_text(&report);
    Ok(())
}

fn print_text(report: &AnalysisReport) {
    let out = Output::new();
    out.header("Letter Analysis");

    if report.is_degraded() {
        out.warning(&report.summary);
    } else {
        println!("{}", report.summary);
    }

    for key in ["sender", "letter_type", "urgency_level"] {
        if let Some(value) = report.analysis.get(key).and_then(|v| v.as_str()) {
            out.field(key, value);
        }
    }

    out.section("Actions needed");
    out.list(&report.actions_needed);

    out.section("Deadlines");
    out.list(&report.deadlines);

    if let Some(template) = &report.response_template {
        out.section("Response template");
        println!("{}", template);
    }

    println!();
    out.info(&format!("Provider: {}", report.llm_provider));
}
