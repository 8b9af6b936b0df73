//! Letter Analysis
//!
//! Turns an uploaded official letter into a structured, plain-language
//! report using the ranked provider fallback.
//!
//! ## Pipeline
//!
//! 1. `extract`: image/PDF bytes → text (Tesseract, pdftotext)
//! 2. `prompt`: text → analysis prompt in the requested language
//! 3. `service`: prompt → first successful provider
//! 4. `response`: generated text → [`AnalysisReport`], degraded when unusable

mod extract;
mod prompt;
mod response;
mod service;

pub use extract::{CommandLineExtractor, ContentKind, TextExtractor};
pub use prompt::{PromptBuilder, PromptLanguage, PromptSection, build_analysis_prompt};
pub use response::{AnalysisReport, NO_PROVIDER, ReportOutcome, extract_json_object};
pub use service::LetterAnalyzer;
