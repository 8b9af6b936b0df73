//! Letter Analyzer
//!
//! Caller side of the provider orchestration: extract text, build the
//! prompt, run the ranked fallback and turn the outcome into a report.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::extract::{ContentKind, TextExtractor};
use super::prompt::{PromptLanguage, build_analysis_prompt};
use super::response::AnalysisReport;
use crate::ai::provider::ProviderManager;
use crate::types::{GatewayError, RequestId, Result};

/// Document-to-report pipeline over a shared provider manager
#[derive(Clone)]
pub struct LetterAnalyzer {
    manager: Arc<ProviderManager>,
    extractor: Arc<dyn TextExtractor>,
}

impl LetterAnalyzer {
    pub fn new(manager: Arc<ProviderManager>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { manager, extractor }
    }

    pub fn manager(&self) -> &Arc<ProviderManager> {
        &self.manager
    }

    /// Analyze already-extracted letter text.
    ///
    /// Exhausting every adapter yields a degraded report, not an error.
    #[instrument(
        skip_all,
        fields(request_id = %RequestId::generate(), language = %language, text_chars = text.len())
    )]
    pub async fn analyze_text(&self, text: &str, language: PromptLanguage) -> Result<AnalysisReport> {
        let prompt = build_analysis_prompt(text, language);

        match self.manager.generate(&prompt).await {
            Ok((content, provider)) => {
                let report = AnalysisReport::from_generated(&content, &provider);
                if report.is_degraded() {
                    warn!(provider = %provider, "Analysis response was not usable");
                } else {
                    info!(provider = %provider, "Analysis completed");
                }
                Ok(report)
            }
            Err(err @ GatewayError::AllProvidersFailed { .. }) => {
                Ok(AnalysisReport::all_providers_failed(&err))
            }
            Err(err) => Err(err),
        }
    }

    /// Extract text from an uploaded document, then analyze it
    pub async fn analyze_document(
        &self,
        bytes: &[u8],
        mime: &str,
        language: PromptLanguage,
    ) -> Result<AnalysisReport> {
        let kind = ContentKind::from_mime(mime)?;
        let text = self.extractor.extract(bytes, kind).await?;
        if text.trim().is_empty() {
            return Err(GatewayError::NoTextExtracted);
        }
        info!(?kind, chars = text.len(), "Extracted document text");
        self.analyze_text(&text, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::mock::MockBackend;
    use crate::ai::provider::{AdapterSettings, ProviderAdapter};
    use async_trait::async_trait;

    struct FixedExtractor(&'static str);

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract(&self, _bytes: &[u8], _kind: ContentKind) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn analyzer(backends: Vec<MockBackend>, extracted: &'static str) -> LetterAnalyzer {
        let adapters = backends
            .into_iter()
            .enumerate()
            .map(|(i, backend)| {
                ProviderAdapter::new(Arc::new(backend), AdapterSettings::new(i as u32 + 1, 10, 100))
            })
            .collect();
        LetterAnalyzer::new(
            Arc::new(ProviderManager::from_adapters(adapters)),
            Arc::new(FixedExtractor(extracted)),
        )
    }

    #[tokio::test]
    async fn test_analyze_text_falls_back() {
        let analyzer = analyzer(
            vec![
                MockBackend::failing("primary", "503 service unavailable"),
                MockBackend::succeeding("secondary", r#"{"summary": "Rent increase notice"}"#),
            ],
            "",
        );

        let report = analyzer
            .analyze_text("Mieterhöhung", PromptLanguage::English)
            .await
            .unwrap();
        assert_eq!(report.llm_provider, "secondary");
        assert_eq!(report.summary, "Rent increase notice");
        assert!(!report.is_degraded());
    }

    #[tokio::test]
    async fn test_all_failed_is_degraded_report() {
        let analyzer = analyzer(vec![MockBackend::failing("only", "401 unauthorized")], "");

        let report = analyzer
            .analyze_text("Bescheid", PromptLanguage::Russian)
            .await
            .unwrap();
        assert_eq!(report.llm_provider, "none");
        assert_eq!(report.analysis["error"], "All LLM providers failed");
    }

    #[tokio::test]
    async fn test_prompt_carries_letter_text() {
        let backend = Arc::new(MockBackend::succeeding("a", "{}"));
        let manager = ProviderManager::from_adapters(vec![ProviderAdapter::new(
            backend.clone(),
            AdapterSettings::new(1, 10, 100),
        )]);
        let analyzer = LetterAnalyzer::new(Arc::new(manager), Arc::new(FixedExtractor("")));

        analyzer
            .analyze_text("Frist bis 30.06.", PromptLanguage::English)
            .await
            .unwrap();
        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Frist bis 30.06."));
    }

    #[tokio::test]
    async fn test_document_without_text() {
        let analyzer = analyzer(vec![MockBackend::succeeding("a", "{}")], "   ");
        let err = analyzer
            .analyze_document(b"img", "image/png", PromptLanguage::English)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NoTextExtracted));
    }

    #[tokio::test]
    async fn test_document_unsupported_type() {
        let analyzer = analyzer(vec![MockBackend::succeeding("a", "{}")], "text");
        let err = analyzer
            .analyze_document(b"hello", "text/plain", PromptLanguage::English)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedContent(_)));
    }

    #[tokio::test]
    async fn test_document_analyzed() {
        let analyzer = analyzer(
            vec![MockBackend::succeeding("a", r#"{"deadlines": ["01.07."]}"#)],
            "Bitte zahlen Sie bis 01.07.",
        );
        let report = analyzer
            .analyze_document(b"%PDF", "application/pdf", PromptLanguage::English)
            .await
            .unwrap();
        assert_eq!(report.deadlines, vec!["01.07."]);
        assert_eq!(report.llm_provider, "a");
    }
}
