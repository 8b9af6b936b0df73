//! Prompt Builder
//!
//! Section-based prompt construction plus the letter-analysis prompt in
//! every supported output language.

use std::fmt;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Code block with language
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: &[&str]) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.iter().map(|o| o.to_string()).collect(),
        ));
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Letter Analysis Prompt
// =============================================================================

/// Output language of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptLanguage {
    #[default]
    English,
    Russian,
}

impl PromptLanguage {
    /// Unknown codes fall back to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Self::Russian,
            _ => Self::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Russian => "ru",
        }
    }

    fn pack(self) -> &'static LanguagePack {
        match self {
            Self::English => &ENGLISH,
            Self::Russian => &RUSSIAN,
        }
    }
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

struct LanguagePack {
    intro: &'static str,
    letter_header: &'static str,
    format_instruction: &'static str,
    schema: &'static str,
    checklist_header: &'static str,
    checklist: [&'static str; 5],
}

const ENGLISH: LanguagePack = LanguagePack {
    intro: "You are an expert assistant helping migrants and refugees understand German official letters. \
Analyze this German letter and provide a comprehensive response in English.",
    letter_header: "LETTER TEXT",
    format_instruction: "Please provide a detailed analysis in the following JSON format:",
    schema: r#"{
    "summary": "Brief summary of what this letter is about",
    "sender": "Who sent this letter (agency/organization)",
    "letter_type": "Type of letter (e.g., Jobcenter notification, BAMF decision, etc.)",
    "main_content": "Main content explanation in simple English",
    "actions_needed": ["List of specific actions the recipient needs to take"],
    "deadlines": ["Any important deadlines mentioned with dates"],
    "documents_required": ["Any documents that need to be submitted"],
    "consequences": "What happens if no action is taken",
    "urgency_level": "LOW/MEDIUM/HIGH",
    "response_template": "A template response letter in German if a response is needed (or null if no response needed)"
}"#,
    checklist_header: "Make sure to",
    checklist: [
        "Explain everything in simple, clear English",
        "Highlight any urgent deadlines",
        "Explain the consequences of not responding",
        "Provide practical next steps",
        "If a response is needed, include a polite German template",
    ],
};

const RUSSIAN: LanguagePack = LanguagePack {
    intro: "Вы эксперт-помощник, помогающий мигрантам и беженцам понимать немецкие официальные письма. \
Проанализируйте это немецкое письмо и предоставьте подробный ответ на русском языке.",
    letter_header: "ТЕКСТ ПИСЬМА",
    format_instruction: "Предоставьте детальный анализ в следующем JSON формате:",
    schema: r#"{
    "summary": "Краткое резюме о чем это письмо",
    "sender": "Кто отправил это письмо (агентство/организация)",
    "letter_type": "Тип письма (например, уведомление Jobcenter, решение BAMF и т.д.)",
    "main_content": "Объяснение основного содержания простыми словами на русском",
    "actions_needed": ["Список конкретных действий, которые нужно предпринять получателю"],
    "deadlines": ["Любые важные сроки с датами"],
    "documents_required": ["Любые документы, которые нужно предоставить"],
    "consequences": "Что произойдет, если не предпринять никаких действий",
    "urgency_level": "LOW/MEDIUM/HIGH",
    "response_template": "Шаблон ответного письма на немецком языке, если требуется ответ (или null, если ответ не нужен)"
}"#,
    checklist_header: "Убедитесь, что вы",
    checklist: [
        "Объясняете все простыми, понятными словами на русском",
        "Выделяете срочные сроки",
        "Объясняете последствия неответа",
        "Предоставляете практические следующие шаги",
        "Если нужен ответ, включите вежливый немецкий шаблон",
    ],
};

/// Build the letter-analysis prompt for `text` in `language`
pub fn build_analysis_prompt(text: &str, language: PromptLanguage) -> String {
    let pack = language.pack();
    PromptBuilder::new()
        .text(pack.intro)
        .section(pack.letter_header, text)
        .text(pack.format_instruction)
        .code("json", pack.schema)
        .section(pack.checklist_header, "")
        .objectives(&pack.checklist)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 10] = [
        "summary",
        "sender",
        "letter_type",
        "main_content",
        "actions_needed",
        "deadlines",
        "documents_required",
        "consequences",
        "urgency_level",
        "response_template",
    ];

    #[test]
    fn test_builder_sections() {
        let prompt = PromptBuilder::new()
            .section("Input", "hello")
            .objectives(&["First", "Second"])
            .code("json", "{}")
            .build();

        assert!(prompt.starts_with("Input:\nhello"));
        assert!(prompt.contains("1. First\n2. Second"));
        assert!(prompt.ends_with("```json\n{}\n```"));
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(PromptLanguage::from_code("ru"), PromptLanguage::Russian);
        assert_eq!(PromptLanguage::from_code(" RU "), PromptLanguage::Russian);
        assert_eq!(PromptLanguage::from_code("en"), PromptLanguage::English);
        assert_eq!(PromptLanguage::from_code("tr"), PromptLanguage::English);
        assert_eq!(PromptLanguage::Russian.to_string(), "ru");
    }

    #[test]
    fn test_prompt_embeds_letter_and_schema() {
        let letter = "Sehr geehrte Damen und Herren, bitte melden Sie sich bis 01.04.";
        for language in [PromptLanguage::English, PromptLanguage::Russian] {
            let prompt = build_analysis_prompt(letter, language);
            assert!(prompt.contains(letter));
            for key in KEYS {
                assert!(
                    prompt.contains(&format!("\"{}\"", key)),
                    "{} prompt lacks {}",
                    language,
                    key
                );
            }
            assert!(prompt.contains("```json"));
        }
    }

    #[test]
    fn test_schema_blocks_are_valid_json() {
        for pack in [&ENGLISH, &RUSSIAN] {
            let value: serde_json::Value = serde_json::from_str(pack.schema).unwrap();
            assert_eq!(value.as_object().unwrap().len(), KEYS.len());
        }
    }

    #[test]
    fn test_prompt_language_specific_text() {
        let en = build_analysis_prompt("x", PromptLanguage::English);
        let ru = build_analysis_prompt("x", PromptLanguage::Russian);
        assert!(en.contains("LETTER TEXT:"));
        assert!(ru.contains("ТЕКСТ ПИСЬМА:"));
        assert!(en.contains("5. If a response is needed"));
    }
}
