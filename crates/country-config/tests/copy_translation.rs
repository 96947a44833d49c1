use std::sync::Mutex;

use async_trait::async_trait;
use country_config::translations::{
    translate_csv, TargetLanguage, TranslationError, TranslationSummary, Translator,
};

/// Answers with a language-tagged echo and records every call.
struct EchoTranslator {
    calls: Mutex<Vec<(String, &'static str)>>,
    blank_for: Option<TargetLanguage>,
}

impl EchoTranslator {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            blank_for: None,
        }
    }
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, english: &str, language: TargetLanguage) -> Result<String, TranslationError> {
        self.calls
            .lock()
            .expect("calls mutex")
            .push((english.to_string(), language.code()));
        if self.blank_for == Some(language) {
            return Ok(String::new());
        }
        Ok(format!("[{}] {}", language.code(), english))
    }
}

struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _english: &str, _language: TargetLanguage) -> Result<String, TranslationError> {
        Err(TranslationError::Upstream {
            status: 429,
            body: "rate limited".to_string(),
        })
    }
}

fn write_input(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let input = dir.path().join("copy.csv");
    std::fs::write(
        &input,
        "id,description,en\n\
         buttons.login,Login button,Login\n\
         buttons.blank,Unused,\n\
         validations.range,Range error,\"Must be within {min} and {max}\"\n",
    )
    .expect("write input");
    input
}

#[tokio::test]
async fn adds_sinhala_and_tamil_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(&dir);
    let output = dir.path().join("translated.csv");
    let translator = EchoTranslator::new();

    let summary = translate_csv(&input, &output, &translator)
        .await
        .expect("translation succeeds");

    assert_eq!(summary, TranslationSummary { rows: 3, translated: 2 });
    let written = std::fs::read_to_string(&output).expect("output written");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "id,description,en,si,ta");
    assert_eq!(lines[1], "buttons.login,Login button,Login,[si] Login,[ta] Login");
    assert_eq!(lines[2], "buttons.blank,Unused,,,");

    let calls = translator.calls.lock().expect("calls mutex");
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], ("Login".to_string(), "si"));
    assert_eq!(calls[1], ("Login".to_string(), "ta"));
}

#[tokio::test]
async fn blank_answer_keeps_english() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(&dir);
    let output = dir.path().join("translated.csv");
    let translator = EchoTranslator {
        blank_for: Some(TargetLanguage::Tamil),
        ..EchoTranslator::new()
    };

    translate_csv(&input, &output, &translator)
        .await
        .expect("translation succeeds");

    let written = std::fs::read_to_string(&output).expect("output written");
    assert!(written.contains("buttons.login,Login button,Login,[si] Login,Login"));
}

#[tokio::test]
async fn translator_failure_stops_before_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(&dir);
    let output = dir.path().join("translated.csv");

    let err = translate_csv(&input, &output, &FailingTranslator)
        .await
        .expect_err("translator fails");

    assert!(matches!(err, TranslationError::Upstream { status: 429, .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");

    let err = translate_csv(
        &dir.path().join("absent.csv"),
        &dir.path().join("out.csv"),
        &EchoTranslator::new(),
    )
    .await
    .expect_err("no input");

    assert!(matches!(err, TranslationError::Io { .. }));
}
