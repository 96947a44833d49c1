use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use super::NotificationError;

pub const NOTIFICATION_TEMPLATES_JSON: &str = "notification.json";
pub const FALLBACK_LOCALE: &str = "en";

/// Templates sent to informants about their own declarations.
pub const INFORMANT_TEMPLATES: &[&str] = &[
    "birthInProgressNotification",
    "birthDeclarationNotification",
    "birthRegistrationNotification",
    "birthRejectionNotification",
    "deathInProgressNotification",
    "deathDeclarationNotification",
    "deathRegistrationNotification",
    "deathRejectionNotification",
];

/// Templates sent to system users.
pub const USER_TEMPLATES: &[&str] = &[
    "authenticationCodeNotification",
    "userCredentialsNotification",
    "retieveUserNameNotification",
    "updateUserNameNotification",
    "resetUserPasswordNotification",
];

pub fn is_informant_template(name: &str) -> bool {
    INFORMANT_TEMPLATES.contains(&name)
}

#[derive(Debug, Clone, Deserialize)]
struct LanguageTemplates {
    lang: String,
    messages: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    data: Vec<LanguageTemplates>,
}

/// SMS bodies per locale, keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct NotificationTemplates {
    languages: BTreeMap<String, LanguageTemplates>,
}

impl NotificationTemplates {
    pub fn from_json(raw: &str) -> Result<Self, NotificationError> {
        let file: TemplateFile = serde_json::from_str(raw)?;
        Ok(Self {
            languages: file
                .data
                .into_iter()
                .map(|language| (language.lang.clone(), language))
                .collect(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, NotificationError> {
        let raw = std::fs::read_to_string(path).map_err(|source| NotificationError::Templates {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Renders `template` for `locale`, falling back to English when the
    /// locale has no catalogue. Unknown placeholders render as empty text.
    pub fn render(
        &self,
        template: &str,
        locale: &str,
        variables: &Map<String, Value>,
    ) -> Result<String, NotificationError> {
        let language = self
            .languages
            .get(locale)
            .or_else(|| self.languages.get(FALLBACK_LOCALE))
            .ok_or_else(|| NotificationError::UnknownLocale(locale.to_string()))?;
        let body = language
            .messages
            .get(template)
            .ok_or_else(|| NotificationError::UnknownTemplate(template.to_string()))?;

        Ok(render_placeholders(body, variables))
    }
}

/// Replaces `{{name}}` placeholders; unknown names render as empty text.
pub(crate) fn render_placeholders(body: &str, variables: &Map<String, Value>) -> String {
    placeholder_pattern()
        .replace_all(body, |captures: &Captures<'_>| {
            variables
                .get(&captures[1])
                .map(display_value)
                .unwrap_or_default()
        })
        .into_owned()
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern compiles")
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
