use rust_xlsxwriter::{Format, Workbook};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

use super::TranslationError;

#[derive(Debug, Deserialize)]
struct LanguageCopy {
    lang: String,
    #[serde(default)]
    messages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Catalogue {
    data: Vec<LanguageCopy>,
}

#[derive(Debug, Deserialize)]
struct Descriptions {
    #[serde(default)]
    data: HashMap<String, String>,
}

/// Name of the workbook `export_copy` writes.
pub const TRANSLATIONS_WORKBOOK: &str = "Translations.xlsx";

/// A message catalogue and its translator-facing descriptions, exported as
/// one worksheet.
#[derive(Debug, Clone)]
pub struct CopySource {
    pub sheet: String,
    pub messages: PathBuf,
    pub descriptions: PathBuf,
}

impl CopySource {
    pub fn new(sheet: &str, messages: PathBuf, descriptions: PathBuf) -> Self {
        Self {
            sheet: sheet.to_string(),
            messages,
            descriptions,
        }
    }

    /// The client, login and SMS catalogues shipped under `data_dir`.
    pub fn bundled(data_dir: &Path) -> Vec<Self> {
        let copy = data_dir.join("copy");
        vec![
            Self::new(
                "Client application",
                copy.join("client.json"),
                copy.join("client-descriptions.json"),
            ),
            Self::new(
                "Login application",
                copy.join("login.json"),
                copy.join("login-descriptions.json"),
            ),
            Self::new(
                "SMS notifications",
                data_dir.join("notification.json"),
                copy.join("notification-descriptions.json"),
            ),
        ]
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, TranslationError> {
    let raw = std::fs::read_to_string(path).map_err(|source| TranslationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| TranslationError::Catalogue {
        path: path.to_path_buf(),
        source,
    })
}

/// The rows of one worksheet: `id, description, <lang>...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Keys appear in first-seen order across languages, languages in catalogue
/// order. A message missing in one language leaves its cell blank.
pub fn read_sheet(source: &CopySource) -> Result<CopySheet, TranslationError> {
    let catalogue: Catalogue = read_json(&source.messages)?;
    let descriptions: Descriptions = read_json(&source.descriptions)?;

    let mut seen = BTreeSet::new();
    let mut keys: Vec<&str> = Vec::new();
    for copy in &catalogue.data {
        for key in copy.messages.keys() {
            if seen.insert(key.as_str()) {
                keys.push(key);
            }
        }
    }

    let mut header = vec!["id".to_string(), "description".to_string()];
    header.extend(catalogue.data.iter().map(|copy| copy.lang.clone()));

    let rows = keys
        .iter()
        .map(|key| {
            let mut row = vec![
                key.to_string(),
                descriptions.data.get(*key).cloned().unwrap_or_default(),
            ];
            row.extend(
                catalogue
                    .data
                    .iter()
                    .map(|copy| copy.messages.get(*key).cloned().unwrap_or_default()),
            );
            row
        })
        .collect();

    Ok(CopySheet {
        name: source.sheet.clone(),
        header,
        rows,
    })
}

/// Writes `Translations.xlsx` under `output_dir` with one worksheet per
/// source and returns its path.
pub fn export_copy(sources: &[CopySource], output_dir: &Path) -> Result<PathBuf, TranslationError> {
    std::fs::create_dir_all(output_dir).map_err(|source| TranslationError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();
    for source in sources {
        let sheet = read_sheet(source)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in (0u16..).zip(&sheet.header) {
            worksheet.write_string_with_format(0, col, title, &bold)?;
        }
        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                worksheet.write_string(row, col, cell)?;
            }
        }

        info!(sheet = %sheet.name, rows = sheet.rows.len(), "exported copy sheet");
    }

    let path = output_dir.join(TRANSLATIONS_WORKBOOK);
    workbook.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use std::io::Write;

    fn json_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(contents.as_bytes()).expect("write file");
        path
    }

    #[test]
    fn keys_keep_first_seen_order_across_languages() {
        let dir = tempfile::tempdir().expect("temp dir");
        let messages = json_file(
            dir.path(),
            "client.json",
            r#"{"data":[
                {"lang":"en","messages":{"b.title":"Title","a.next":"Next"}},
                {"lang":"fr","messages":{"a.next":"Suivant","c.only":"Seulement"}}
            ]}"#,
        );
        let descriptions = json_file(
            dir.path(),
            "client-descriptions.json",
            r#"{"data":{"a.next":"Button label"}}"#,
        );

        let sheet = read_sheet(&CopySource::new("Client application", messages, descriptions))
            .expect("sheet reads");

        assert_eq!(sheet.header, vec!["id", "description", "en", "fr"]);
        let ids: Vec<&str> = sheet.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(ids, vec!["a.next", "b.title", "c.only"]);
        assert_eq!(sheet.rows[0], vec!["a.next", "Button label", "Next", "Suivant"]);
        assert_eq!(sheet.rows[2], vec!["c.only", "", "", "Seulement"]);
    }

    #[test]
    fn bundled_catalogues_export_to_one_workbook() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sources = CopySource::bundled(&DataConfig::bundled_dir());

        let path = export_copy(&sources, dir.path()).expect("export succeeds");

        assert_eq!(path, dir.path().join(TRANSLATIONS_WORKBOOK));
        let bytes = std::fs::read(&path).expect("workbook written");
        assert!(bytes.starts_with(b"PK\x03\x04"));
        assert_eq!(
            std::fs::read_dir(dir.path()).expect("list output").count(),
            1
        );

        let sms = read_sheet(&sources[2]).expect("sms sheet");
        assert_eq!(sms.name, "SMS notifications");
        assert_eq!(sms.header[..4], ["id", "description", "en", "fr"]);
        assert!(sms.rows.iter().any(|row| row[0] == "authenticationCodeNotification"));
    }

    #[test]
    fn invalid_sheet_name_is_a_workbook_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data = DataConfig::bundled_dir();
        let mut sources = CopySource::bundled(&data);
        sources[0].sheet = "Client [application]".to_string();

        let err = export_copy(&sources, dir.path()).expect_err("brackets are not allowed");

        assert!(matches!(err, TranslationError::Workbook(_)));
    }
}
