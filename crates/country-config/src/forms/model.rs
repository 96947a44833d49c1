use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::expression::Expression;

/// In-progress values of a form, keyed by field name (or by section id at the
/// top level of a declaration).
pub type FormValues = serde_json::Map<String, Value>;

/// Vital event a form declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Birth,
    Death,
    Marriage,
}

impl Event {
    pub const ALL: [Event; 3] = [Event::Birth, Event::Death, Event::Marriage];

    pub fn as_str(self) -> &'static str {
        match self {
            Event::Birth => "birth",
            Event::Death => "death",
            Event::Marriage => "marriage",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event '{0}'")]
pub struct UnknownEvent(pub String);

impl FromStr for Event {
    type Err = UnknownEvent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "birth" => Ok(Event::Birth),
            "death" => Ok(Event::Death),
            "marriage" => Ok(Event::Marriage),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// Localizable message reference resolved by the client's translation catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub id: String,
    pub default_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MessageDescriptor {
    pub fn new(id: &str, default_message: &str) -> Self {
        Self {
            id: id.to_string(),
            default_message: default_message.to_string(),
            description: None,
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Tel,
    Date,
    SelectWithOptions,
    RadioGroup,
    CheckboxGroup,
    DocumentUploaderWithOption,
    Signature,
    Paragraph,
    Subsection,
}

/// Named validation operation with its ordered parameters, e.g.
/// `checkMarriageDate` with `[18]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
}

impl ValidationRule {
    pub fn new(operation: &str, parameters: Vec<Value>) -> Self {
        Self {
            operation: operation.to_string(),
            parameters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalAction {
    Show,
    Hide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConditional {
    pub action: ConditionalAction,
    pub expression: Expression,
}

/// Reference to a transform the hosting application applies when moving a
/// value between the form and the registration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRef {
    pub operation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
}

impl TransformRef {
    pub fn new(operation: &str, parameters: Vec<Value>) -> Self {
        Self {
            operation: operation.to_string(),
            parameters,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutation: Option<TransformRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<TransformRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TransformRef>,
}

impl FieldMapping {
    pub fn transforms(&self) -> impl Iterator<Item = &TransformRef> {
        [&self.mutation, &self.query, &self.template]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: MessageDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: MessageDescriptor,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
    #[serde(default)]
    pub validator: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditionals: Vec<DisplayConditional>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<FieldMapping>,
}

impl FormField {
    pub fn new(name: &str, field_type: FieldType, label: MessageDescriptor) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            label,
            required: false,
            initial_value: None,
            validator: Vec::new(),
            conditionals: Vec::new(),
            options: Vec::new(),
            mapping: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn initial_value(mut self, value: Value) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn validate_with(mut self, operation: &str, parameters: Vec<Value>) -> Self {
        self.validator.push(ValidationRule::new(operation, parameters));
        self
    }

    pub fn hide_when(mut self, expression: Expression) -> Self {
        self.conditionals.push(DisplayConditional {
            action: ConditionalAction::Hide,
            expression,
        });
        self
    }

    pub fn show_when(mut self, expression: Expression) -> Self {
        self.conditionals.push(DisplayConditional {
            action: ConditionalAction::Show,
            expression,
        });
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormPage {
    pub id: String,
    pub title: MessageDescriptor,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub id: String,
    pub pages: Vec<FormPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventForm {
    pub event: Event,
    pub sections: Vec<FormSection>,
}

impl EventForm {
    pub fn fields(&self) -> impl Iterator<Item = (&FormSection, &FormPage, &FormField)> {
        self.sections.iter().flat_map(|section| {
            section.pages.iter().flat_map(move |page| {
                page.fields.iter().map(move |field| (section, page, field))
            })
        })
    }
}
