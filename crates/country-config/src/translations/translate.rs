use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::{TargetLanguage, TranslationError, Translator};
use crate::config::TranslationConfig;

const MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Deserialize)]
struct CopyRow {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    en: String,
}

#[derive(Debug, Serialize)]
struct TranslatedRow {
    id: String,
    description: String,
    en: String,
    si: String,
    ta: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranslationSummary {
    pub rows: usize,
    pub translated: usize,
}

/// Adds Sinhala and Tamil columns to a copy CSV. Rows are translated one at
/// a time, Sinhala before Tamil; an empty answer keeps the English text.
pub async fn translate_csv(
    input: &Path,
    output: &Path,
    translator: &dyn Translator,
) -> Result<TranslationSummary, TranslationError> {
    let file = std::fs::File::open(input).map_err(|source| TranslationError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().from_reader(file);
    let rows = reader
        .deserialize::<CopyRow>()
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = TranslationSummary::default();
    let mut translated_rows = Vec::with_capacity(rows.len());
    for row in rows {
        summary.rows += 1;
        let english = row.en.trim();
        let (si, ta) = if english.is_empty() {
            (String::new(), String::new())
        } else {
            summary.translated += 1;
            let si = or_english(translator.translate(english, TargetLanguage::Sinhala).await?, &row.en);
            let ta = or_english(translator.translate(english, TargetLanguage::Tamil).await?, &row.en);
            (si, ta)
        };
        translated_rows.push(TranslatedRow {
            id: row.id,
            description: row.description,
            en: row.en,
            si,
            ta,
        });
    }

    let mut writer = csv::Writer::from_path(output)?;
    for row in &translated_rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| TranslationError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    info!(rows = summary.rows, path = %output.display(), "Translation complete");
    Ok(summary)
}

fn or_english(answer: String, english: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        english.to_string()
    } else {
        answer.to_string()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completions backed translator.
#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiTranslator {
    pub fn new(client: reqwest::Client, config: &TranslationConfig) -> Result<Self, TranslationError> {
        if config.api_key.trim().is_empty() {
            return Err(TranslationError::NotConfigured("OPENAI_API_KEY"));
        }
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

fn system_prompt(language: TargetLanguage) -> String {
    format!(
        "You are a professional translator. Translate this English sentence to {}, preserving placeholders like {{name}}, {{officeName}}, etc.",
        language.name()
    )
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, english: &str, language: TargetLanguage) -> Result<String, TranslationError> {
        let prompt = system_prompt(language);
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt,
                },
                ChatMessage {
                    role: "user",
                    content: english,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "translation request rejected");
            return Err(TranslationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        Ok(reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}
