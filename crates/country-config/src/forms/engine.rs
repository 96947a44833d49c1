use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use super::expression::{is_empty_value, ValueScope};
use super::model::{ConditionalAction, EventForm, FormField, FormValues, MessageDescriptor};
use super::transforms::TransformCatalog;
use super::validators::{Arity, ParamKind, ValidationContext, ValidatorFn, ValidatorRegistry};

/// Definition problems caught when a form is loaded, never during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormConfigError {
    #[error("field '{field}' appears more than once on page '{page}'")]
    DuplicateField { page: String, field: String },
    #[error("field '{field}' uses unknown validation operation '{operation}'")]
    UnknownOperation { field: String, operation: String },
    #[error("field '{field}' passes {found} parameter(s) to '{operation}' (expected {expected:?})")]
    InvalidArity {
        field: String,
        operation: String,
        expected: Arity,
        found: usize,
    },
    #[error("field '{field}' passes a parameter of the wrong type to '{operation}' at position {index} (expected {expected:?})")]
    InvalidParameter {
        field: String,
        operation: String,
        index: usize,
        expected: ParamKind,
    },
    #[error("field '{field}' maps through unknown transform '{transform}'")]
    UnknownTransform { field: String, transform: String },
}

/// Result of evaluating one field's validator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FieldOutcome {
    Valid,
    Invalid { message: MessageDescriptor },
}

impl FieldOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldOutcome::Valid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub section: String,
    pub field: String,
    pub message: MessageDescriptor,
}

/// Outcome of evaluating a whole declaration against a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    pub errors: Vec<FieldError>,
    pub missing_required: Vec<String>,
    pub hidden: Vec<String>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

#[derive(Clone)]
struct LoadedField {
    field: FormField,
    checks: Vec<ValidatorFn>,
}

impl std::fmt::Debug for LoadedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedField")
            .field("field", &self.field.name)
            .field("checks", &self.checks.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct LoadedSection {
    id: String,
    fields: Vec<LoadedField>,
}

/// A form whose rule references have all been resolved.
#[derive(Debug, Clone)]
pub struct LoadedForm {
    form: EventForm,
    sections: Vec<LoadedSection>,
    reference_date: Option<NaiveDate>,
}

impl LoadedForm {
    pub fn load(
        form: EventForm,
        registry: &ValidatorRegistry,
        catalog: &TransformCatalog,
    ) -> Result<Self, FormConfigError> {
        let mut sections = Vec::with_capacity(form.sections.len());

        for section in &form.sections {
            let mut fields = Vec::new();
            for page in &section.pages {
                let mut seen = HashSet::new();
                for field in &page.fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(FormConfigError::DuplicateField {
                            page: page.id.clone(),
                            field: field.name.clone(),
                        });
                    }
                    fields.push(resolve_field(field, registry, catalog)?);
                }
            }
            sections.push(LoadedSection {
                id: section.id.clone(),
                fields,
            });
        }

        Ok(Self {
            form,
            sections,
            reference_date: None,
        })
    }

    /// Pins "today" for date rules instead of reading the local clock.
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.reference_date = Some(today);
        self
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn find(&self, section_id: &str, name: &str) -> Option<&LoadedField> {
        self.sections
            .iter()
            .find(|section| section.id == section_id)?
            .fields
            .iter()
            .find(|loaded| loaded.field.name == name)
    }

    /// Evaluates a field's validator list in order; the first failing rule
    /// supplies the reported message. Returns `None` for unknown fields.
    pub fn validate_field(
        &self,
        section_id: &str,
        name: &str,
        values: &FormValues,
    ) -> Option<FieldOutcome> {
        let loaded = self.find(section_id, name)?;
        Some(self.run_checks(loaded, ValueScope::flat(values)))
    }

    /// A field is hidden when any `hide` conditional holds or any `show`
    /// conditional does not.
    pub fn is_visible(&self, section_id: &str, name: &str, values: &FormValues) -> Option<bool> {
        let loaded = self.find(section_id, name)?;
        Some(field_visible(&loaded.field, ValueScope::flat(values)))
    }

    /// Evaluates a declaration shaped `{ "<section>": { "<field>": value } }`.
    /// Hidden fields are neither validated nor counted as missing.
    pub fn validate(&self, declaration: &FormValues) -> FormReport {
        let empty = FormValues::new();
        let mut report = FormReport::default();

        for section in &self.sections {
            let section_values = declaration
                .get(&section.id)
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            let scope = ValueScope::new(section_values, declaration);

            for loaded in &section.fields {
                let key = format!("{}.{}", section.id, loaded.field.name);
                if !field_visible(&loaded.field, scope) {
                    report.hidden.push(key);
                    continue;
                }
                if loaded.field.required && is_empty_value(section_values.get(&loaded.field.name))
                {
                    report.missing_required.push(key);
                    continue;
                }
                if let FieldOutcome::Invalid { message } = self.run_checks(loaded, scope) {
                    report.errors.push(FieldError {
                        section: section.id.clone(),
                        field: loaded.field.name.clone(),
                        message,
                    });
                }
            }
        }

        report
    }

    fn run_checks(&self, loaded: &LoadedField, scope: ValueScope<'_>) -> FieldOutcome {
        let today = self.today();
        let value = scope.get(&loaded.field.name);

        for (rule, check) in loaded.field.validator.iter().zip(&loaded.checks) {
            let ctx = ValidationContext {
                value,
                parameters: &rule.parameters,
                scope,
                today,
            };
            if let Err(message) = check(&ctx) {
                return FieldOutcome::Invalid { message };
            }
        }

        FieldOutcome::Valid
    }
}

fn field_visible(field: &FormField, scope: ValueScope<'_>) -> bool {
    field.conditionals.iter().all(|conditional| {
        let holds = conditional.expression.evaluate(&scope);
        match conditional.action {
            ConditionalAction::Hide => !holds,
            ConditionalAction::Show => holds,
        }
    })
}

fn resolve_field(
    field: &FormField,
    registry: &ValidatorRegistry,
    catalog: &TransformCatalog,
) -> Result<LoadedField, FormConfigError> {
    let mut checks = Vec::with_capacity(field.validator.len());
    for rule in &field.validator {
        let operation =
            registry
                .get(&rule.operation)
                .ok_or_else(|| FormConfigError::UnknownOperation {
                    field: field.name.clone(),
                    operation: rule.operation.clone(),
                })?;
        if !operation.arity.accepts(rule.parameters.len()) {
            return Err(FormConfigError::InvalidArity {
                field: field.name.clone(),
                operation: rule.operation.clone(),
                expected: operation.arity,
                found: rule.parameters.len(),
            });
        }
        if let Some((index, expected)) = operation.mistyped_parameter(&rule.parameters) {
            return Err(FormConfigError::InvalidParameter {
                field: field.name.clone(),
                operation: rule.operation.clone(),
                index,
                expected,
            });
        }
        checks.push(operation.check);
    }

    if let Some(mapping) = &field.mapping {
        if let Some(unknown) = mapping
            .transforms()
            .find(|transform| !catalog.contains(&transform.operation))
        {
            return Err(FormConfigError::UnknownTransform {
                field: field.name.clone(),
                transform: unknown.operation.clone(),
            });
        }
    }

    Ok(LoadedField {
        field: field.clone(),
        checks,
    })
}
