use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::FormValues;

/// Prefix addressing a value outside the current section, e.g.
/// `$form.child.childBirthDate`.
pub const FORM_ROOT_PREFIX: &str = "$form.";

/// Boolean expression over the in-progress form values.
///
/// Field references are resolved against the section being evaluated; a
/// reference to a value that does not exist behaves like an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Expression {
    Always,
    Never,
    Not { expression: Box<Expression> },
    And { all: Vec<Expression> },
    Or { any: Vec<Expression> },
    IsEmpty { field: String },
    IsTruthy { field: String },
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    OneOf { field: String, values: Vec<Value> },
}

impl Expression {
    pub fn not(expression: Expression) -> Self {
        Self::Not {
            expression: Box::new(expression),
        }
    }

    pub fn and(all: Vec<Expression>) -> Self {
        Self::And { all }
    }

    pub fn or(any: Vec<Expression>) -> Self {
        Self::Or { any }
    }

    pub fn is_empty(field: &str) -> Self {
        Self::IsEmpty {
            field: field.to_string(),
        }
    }

    pub fn is_truthy(field: &str) -> Self {
        Self::IsTruthy {
            field: field.to_string(),
        }
    }

    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn not_equals(field: &str, value: impl Into<Value>) -> Self {
        Self::NotEquals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn one_of(field: &str, values: &[&str]) -> Self {
        Self::OneOf {
            field: field.to_string(),
            values: values.iter().map(|value| Value::from(*value)).collect(),
        }
    }

    pub fn evaluate(&self, scope: &ValueScope<'_>) -> bool {
        match self {
            Expression::Always => true,
            Expression::Never => false,
            Expression::Not { expression } => !expression.evaluate(scope),
            Expression::And { all } => all.iter().all(|expression| expression.evaluate(scope)),
            Expression::Or { any } => any.iter().any(|expression| expression.evaluate(scope)),
            Expression::IsEmpty { field } => is_empty_value(scope.get(field)),
            Expression::IsTruthy { field } => is_truthy(scope.get(field)),
            Expression::Equals { field, value } => {
                scope.get(field).unwrap_or(&Value::Null) == value
            }
            Expression::NotEquals { field, value } => {
                scope.get(field).unwrap_or(&Value::Null) != value
            }
            Expression::OneOf { field, values } => scope
                .get(field)
                .map(|current| values.contains(current))
                .unwrap_or(false),
        }
    }

    /// Field references made by this expression, used when describing the
    /// conditional catalogue.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, into: &mut Vec<&'a str>) {
        match self {
            Expression::Always | Expression::Never => {}
            Expression::Not { expression } => expression.collect_fields(into),
            Expression::And { all } => all.iter().for_each(|e| e.collect_fields(into)),
            Expression::Or { any } => any.iter().for_each(|e| e.collect_fields(into)),
            Expression::IsEmpty { field }
            | Expression::IsTruthy { field }
            | Expression::Equals { field, .. }
            | Expression::NotEquals { field, .. }
            | Expression::OneOf { field, .. } => {
                if !into.contains(&field.as_str()) {
                    into.push(field.as_str());
                }
            }
        }
    }
}

/// Values visible to a field while it is being evaluated: its own section
/// plus the whole declaration for `$form.` references.
#[derive(Debug, Clone, Copy)]
pub struct ValueScope<'a> {
    section: &'a FormValues,
    root: &'a FormValues,
}

impl<'a> ValueScope<'a> {
    pub fn new(section: &'a FormValues, root: &'a FormValues) -> Self {
        Self { section, root }
    }

    /// Scope for a single flat set of values.
    pub fn flat(values: &'a FormValues) -> Self {
        Self::new(values, values)
    }

    pub fn get(&self, path: &str) -> Option<&'a Value> {
        match path.strip_prefix(FORM_ROOT_PREFIX) {
            Some(rest) => lookup(self.root, rest),
            None => lookup(self.section, path),
        }
    }
}

fn lookup<'a>(values: &'a FormValues, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = values.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

pub(crate) fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        other => !is_empty_value(other),
    }
}
