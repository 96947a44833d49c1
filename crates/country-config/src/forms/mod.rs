pub mod birth;
pub mod certificate;
mod common;
pub mod conditionals;
pub mod death;
pub mod engine;
pub mod expression;
pub mod marriage;
pub mod model;
pub mod transforms;
pub mod validators;

#[cfg(test)]
mod tests;

pub use engine::{FieldError, FieldOutcome, FormConfigError, FormReport, LoadedForm};
pub use expression::{Expression, ValueScope};
pub use model::{
    ConditionalAction, DisplayConditional, Event, EventForm, FieldMapping, FieldType, FormField,
    FormPage, FormSection, FormValues, MessageDescriptor, SelectOption, TransformRef,
    UnknownEvent, ValidationRule,
};
pub use transforms::TransformCatalog;
pub use validators::{Arity, OperationSummary, ParamKind, ValidatorRegistry};

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AppError;

pub fn all_forms() -> Vec<EventForm> {
    vec![
        birth::birth_form(),
        death::death_form(),
        marriage::marriage_form(),
    ]
}

/// The event forms after load-time checking, plus the registry they were
/// checked against.
#[derive(Debug, Clone)]
pub struct FormCatalog {
    forms: Vec<LoadedForm>,
    registry: ValidatorRegistry,
}

impl FormCatalog {
    pub fn load(
        forms: Vec<EventForm>,
        registry: ValidatorRegistry,
        transforms: &TransformCatalog,
    ) -> Result<Self, FormConfigError> {
        let forms = forms
            .into_iter()
            .map(|form| LoadedForm::load(form, &registry, transforms))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { forms, registry })
    }

    pub fn standard() -> Result<Self, FormConfigError> {
        Self::load(
            all_forms(),
            ValidatorRegistry::standard(),
            &TransformCatalog::standard(),
        )
    }

    pub fn get(&self, event: Event) -> Option<&LoadedForm> {
        self.forms.iter().find(|loaded| loaded.form().event == event)
    }

    pub fn forms(&self) -> impl Iterator<Item = &LoadedForm> {
        self.forms.iter()
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }
}

pub fn form_router(catalog: Arc<FormCatalog>) -> Router {
    Router::new()
        .route("/forms", get(forms_handler))
        .route("/forms/:event", get(form_handler))
        .route("/forms/:event/validate", post(validate_handler))
        .route("/validators", get(validators_handler))
        .route("/conditionals", get(conditionals_handler))
        .with_state(catalog)
}

async fn forms_handler(State(catalog): State<Arc<FormCatalog>>) -> Json<Vec<EventForm>> {
    Json(catalog.forms().map(|loaded| loaded.form().clone()).collect())
}

fn lookup<'a>(catalog: &'a FormCatalog, event: &str) -> Result<&'a LoadedForm, AppError> {
    let event: Event = event.parse()?;
    catalog.get(event).ok_or(AppError::FormNotFound(event))
}

async fn form_handler(
    State(catalog): State<Arc<FormCatalog>>,
    Path(event): Path<String>,
) -> Result<Json<EventForm>, AppError> {
    Ok(Json(lookup(&catalog, &event)?.form().clone()))
}

async fn validate_handler(
    State(catalog): State<Arc<FormCatalog>>,
    Path(event): Path<String>,
    Json(declaration): Json<Value>,
) -> Result<Json<FormReport>, AppError> {
    let form = lookup(&catalog, &event)?;
    let Value::Object(declaration) = declaration else {
        return Err(AppError::BadRequest(
            "declaration must be a JSON object keyed by section".to_string(),
        ));
    };
    Ok(Json(form.validate(&declaration)))
}

async fn validators_handler(State(catalog): State<Arc<FormCatalog>>) -> Json<Vec<OperationSummary>> {
    Json(catalog.registry().summaries())
}

async fn conditionals_handler() -> Json<BTreeMap<&'static str, DisplayConditional>> {
    Json(conditionals::conditional_catalog())
}
