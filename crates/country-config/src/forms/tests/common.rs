use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::forms::model::{
    Event, EventForm, FieldType, FormField, FormSection, FormValues, MessageDescriptor,
};
use crate::forms::{FormPage, LoadedForm, TransformCatalog, ValidatorRegistry};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn values(value: Value) -> FormValues {
    value.as_object().cloned().expect("object payload")
}

pub(super) fn text_field(name: &str) -> FormField {
    FormField::new(name, FieldType::Text, MessageDescriptor::new(name, name))
}

/// Single-section, single-page form holding the given fields.
pub(super) fn single_page_form(fields: Vec<FormField>) -> EventForm {
    EventForm {
        event: Event::Birth,
        sections: vec![FormSection {
            id: "child".to_string(),
            pages: vec![FormPage {
                id: "child-view-group".to_string(),
                title: MessageDescriptor::new("form.section.child.title", "Child"),
                fields,
            }],
        }],
    }
}

pub(super) fn load(fields: Vec<FormField>) -> LoadedForm {
    LoadedForm::load(
        single_page_form(fields),
        &ValidatorRegistry::standard(),
        &TransformCatalog::standard(),
    )
    .expect("form loads")
    .as_of(today())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
