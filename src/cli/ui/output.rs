use console::{StyledObject, style};

use crate::ai::provider::ProviderStatus;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Indented `key: value` line
    pub fn field(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(format!("{}:", key)).dim(), value);
    }

    /// Indented bullet list, or a dimmed placeholder when empty
    pub fn list(&self, items: &[String]) {
        if items.is_empty() {
            println!("  {}", style("(none)").dim());
        }
        for item in items {
            println!("  • {}", item);
        }
    }

    /// Status word colored by health
    pub fn status(&self, status: ProviderStatus) -> StyledObject<String> {
        let text = status.to_string();
        match status {
            ProviderStatus::Active => style(text).green(),
            ProviderStatus::QuotaExceeded => style(text).yellow(),
            ProviderStatus::Error => style(text).red(),
            ProviderStatus::Disabled => style(text).dim(),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
