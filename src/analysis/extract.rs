//! Text extraction from uploaded documents using pdftotext and Tesseract.

use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::types::{ExtractionError, GatewayError, Result};

/// Document kinds the gateway can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Pdf,
}

impl ContentKind {
    /// `image/*` → Image, `application/pdf` → Pdf, anything else is rejected
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Ok(Self::Image)
        } else if essence == "application/pdf" {
            Ok(Self::Pdf)
        } else {
            Err(GatewayError::UnsupportedContent(mime.to_string()))
        }
    }

    /// Best-effort MIME guess from a file extension
    pub fn guess_mime(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some("application/pdf"),
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "tif" | "tiff" => Some("image/tiff"),
            "gif" => Some("image/gif"),
            "bmp" => Some("image/bmp"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

/// Turns raw document bytes into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8], kind: ContentKind) -> Result<String>;
}

/// Map a finished process onto its stdout, or the matching extraction error.
fn handle_cmd_output(
    result: std::io::Result<Output>,
    tool_name: &str,
    error_prefix: &str,
) -> std::result::Result<String, ExtractionError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExtractionError::ExtractionFailed(format!(
                "{}: {}",
                error_prefix,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Extractor that shells out to `tesseract` (images) and `pdftotext` (PDFs)
#[derive(Debug, Clone)]
pub struct CommandLineExtractor {
    config: ExtractionConfig,
    tesseract_bin: String,
    pdftotext_bin: String,
}

impl Default for CommandLineExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

impl CommandLineExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            tesseract_bin: "tesseract".to_string(),
            pdftotext_bin: "pdftotext".to_string(),
        }
    }

    /// Override the tesseract executable
    pub fn with_tesseract(mut self, bin: &str) -> Self {
        self.tesseract_bin = bin.to_string();
        self
    }

    /// Override the pdftotext executable
    pub fn with_pdftotext(mut self, bin: &str) -> Self {
        self.pdftotext_bin = bin.to_string();
        self
    }

    fn tesseract_args(&self, input: &Path) -> Vec<String> {
        vec![
            input.display().to_string(),
            "stdout".to_string(),
            "--oem".to_string(),
            self.config.ocr_engine_mode.to_string(),
            "--psm".to_string(),
            self.config.page_segmentation_mode.to_string(),
            "-l".to_string(),
            self.config.ocr_languages.clone(),
        ]
    }

    fn pdftotext_args(input: &Path) -> Vec<String> {
        vec![
            "-layout".to_string(),
            "-enc".to_string(),
            "UTF-8".to_string(),
            input.display().to_string(),
            "-".to_string(),
        ]
    }

    async fn run(&self, bin: &str, args: Vec<String>, error_prefix: &str) -> Result<String> {
        debug!(tool = bin, "Running extraction tool");
        let result = Command::new(bin).args(&args).output().await;
        Ok(handle_cmd_output(result, bin, error_prefix)?)
    }
}

#[async_trait]
impl TextExtractor for CommandLineExtractor {
    async fn extract(&self, bytes: &[u8], kind: ContentKind) -> Result<String> {
        let suffix = match kind {
            ContentKind::Image => ".img",
            ContentKind::Pdf => ".pdf",
        };

        let mut file = tempfile::Builder::new()
            .prefix("lettergate-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        let text = match kind {
            ContentKind::Image => {
                self.run(
                    &self.tesseract_bin,
                    self.tesseract_args(file.path()),
                    "Failed to extract text from image",
                )
                .await?
            }
            ContentKind::Pdf => {
                self.run(
                    &self.pdftotext_bin,
                    Self::pdftotext_args(file.path()),
                    "Failed to extract text from PDF",
                )
                .await?
            }
        };

        Ok(text.trim().to_string())
    }
}
