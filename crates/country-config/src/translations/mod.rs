//! One-shot utilities for the translation workflow: machine translation of
//! the copy CSV and export of the message catalogues for translators.

pub mod export;
pub mod translate;

pub use export::{export_copy, read_sheet, CopySheet, CopySource, TRANSLATIONS_WORKBOOK};
pub use translate::{translate_csv, OpenAiTranslator, TranslationSummary};

use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalogue {path}: {source}")]
    Catalogue {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("translation service responded with status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("translation is not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage {
    Sinhala,
    Tamil,
}

impl TargetLanguage {
    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::Sinhala => "si",
            TargetLanguage::Tamil => "ta",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Sinhala => "Sinhala",
            TargetLanguage::Tamil => "Tamil",
        }
    }
}

/// Translates English copy into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, english: &str, language: TargetLanguage) -> Result<String, TranslationError>;
}
