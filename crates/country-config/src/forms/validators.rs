use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::expression::{is_empty_value, ValueScope};
use super::model::MessageDescriptor;
use crate::application::default_application_config;

/// Inputs available to a validation operation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub value: Option<&'a Value>,
    pub parameters: &'a [Value],
    pub scope: ValueScope<'a>,
    pub today: NaiveDate,
}

pub type ValidatorFn = fn(&ValidationContext<'_>) -> Result<(), MessageDescriptor>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Arity {
    Exact(usize),
    AtMost(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => count == expected,
            Arity::AtMost(limit) => count <= limit,
        }
    }
}

/// Type a rule parameter must have for its operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    /// Non-negative whole number.
    Count,
    Number,
    Text,
}

impl ParamKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Count => value.as_u64().is_some(),
            ParamKind::Number => value.as_f64().is_some(),
            ParamKind::Text => value.is_string(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct ValidationOperation {
    pub name: &'static str,
    pub arity: Arity,
    pub parameters: &'static [ParamKind],
    pub check: ValidatorFn,
}

impl ValidationOperation {
    /// Index and expected kind of the first parameter with the wrong type.
    pub fn mistyped_parameter(&self, parameters: &[Value]) -> Option<(usize, ParamKind)> {
        parameters
            .iter()
            .zip(self.parameters)
            .enumerate()
            .find(|(_, (value, kind))| !kind.accepts(value))
            .map(|(index, (_, kind))| (index, *kind))
    }
}

impl std::fmt::Debug for ValidationOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationOperation")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationSummary {
    pub operation: &'static str,
    pub arity: Arity,
    pub parameters: &'static [ParamKind],
}

/// Validation operations a form definition may name. Definitions are checked
/// against the registry when a form is loaded.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    operations: BTreeMap<&'static str, ValidationOperation>,
}

impl ValidatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        use ParamKind::{Count, Number, Text};

        let mut registry = Self::empty();
        registry.register("required", &[], required);
        registry.register("maxLength", &[Count], max_length);
        registry.register("range", &[Number, Number], range);
        registry.register("numeric", &[], numeric);
        registry.register("dateFormatIsCorrect", &[], date_format_is_correct);
        registry.register("dateInPast", &[], date_in_past);
        registry.register("isValidBirthDate", &[], is_valid_birth_date);
        registry.register("isValidParentsBirthDate", &[Count], is_valid_parents_birth_date);
        registry.register("checkMarriageDate", &[Count], check_marriage_date);
        registry.register("englishOnlyNameFormat", &[], english_only_name_format);
        registry.register("validIDNumber", &[Text], valid_id_number);
        registry.register("phoneNumberFormat", &[], phone_number_format);
        registry.register("duplicateIDNumber", &[Text], duplicate_id_number);
        registry
    }

    /// Registers an operation taking exactly the listed parameters.
    pub fn register(&mut self, name: &'static str, parameters: &'static [ParamKind], check: ValidatorFn) {
        self.register_with_arity(name, Arity::Exact(parameters.len()), parameters, check);
    }

    /// Registers an operation whose trailing parameters may be omitted.
    pub fn register_with_arity(
        &mut self,
        name: &'static str,
        arity: Arity,
        parameters: &'static [ParamKind],
        check: ValidatorFn,
    ) {
        self.operations.insert(
            name,
            ValidationOperation {
                name,
                arity,
                parameters,
                check,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ValidationOperation> {
        self.operations.get(name)
    }

    pub fn summaries(&self) -> Vec<OperationSummary> {
        self.operations
            .values()
            .map(|operation| OperationSummary {
                operation: operation.name,
                arity: operation.arity,
                parameters: operation.parameters,
            })
            .collect()
    }
}

mod messages {
    use super::MessageDescriptor;

    pub fn required() -> MessageDescriptor {
        MessageDescriptor::new("validations.required", "Required for registration")
    }

    pub fn max_length(limit: u64) -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.maxLength",
            &format!("Must not be more than {limit} characters"),
        )
    }

    pub fn range(min: f64, max: f64) -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.range",
            &format!("Must be within {min} and {max}"),
        )
    }

    pub fn numeric() -> MessageDescriptor {
        MessageDescriptor::new("validations.numberRequired", "Must be a number")
    }

    pub fn date_format() -> MessageDescriptor {
        MessageDescriptor::new("validations.dateFormat", "Must be a valid date")
    }

    pub fn date_in_future() -> MessageDescriptor {
        MessageDescriptor::new("validations.isDateNotAfterToday", "Date must be in the past")
    }

    pub fn parent_birth_date(min_age: i64) -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.isValidParentsBirthDate",
            &format!("Parent must be at least {min_age} years older than the child"),
        )
    }

    pub fn marriage_date(min_age: i64) -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.checkMarriageDate",
            &format!("Both spouses must be at least {min_age} years old on the date of marriage"),
        )
    }

    pub fn english_name() -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.englishOnlyNameFormat",
            "Must contain only English letters, with no numbers",
        )
    }

    pub fn id_number(kind: &str) -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.validNationalId",
            &format!("The {kind} number is not valid"),
        )
    }

    pub fn phone_number() -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.phoneNumberFormat",
            "Must be a valid mobile number",
        )
    }

    pub fn duplicate_id() -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.duplicateIDNumber",
            "ID number must be different from the other identities on this declaration",
        )
    }

    pub fn parameter() -> MessageDescriptor {
        MessageDescriptor::new(
            "validations.invalidParameter",
            "Validation is misconfigured for this field",
        )
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    text(value).and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok())
}

fn integer_parameter(ctx: &ValidationContext<'_>, index: usize) -> Result<i64, MessageDescriptor> {
    ctx.parameters
        .get(index)
        .and_then(Value::as_i64)
        .ok_or_else(messages::parameter)
}

/// Whole years between two dates, counting a year only once its anniversary has passed.
fn years_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    let mut years = i64::from(later.year() - earlier.year());
    if (later.month(), later.day()) < (earlier.month(), earlier.day()) {
        years -= 1;
    }
    years
}

fn required(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    if is_empty_value(ctx.value) {
        Err(messages::required())
    } else {
        Ok(())
    }
}

fn max_length(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let limit = ctx
        .parameters
        .first()
        .and_then(Value::as_u64)
        .ok_or_else(messages::parameter)?;
    match text(ctx.value) {
        Some(value) if value.chars().count() as u64 > limit => Err(messages::max_length(limit)),
        _ => Ok(()),
    }
}

fn range(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let bounds = (
        ctx.parameters.first().and_then(Value::as_f64),
        ctx.parameters.get(1).and_then(Value::as_f64),
    );
    let (Some(min), Some(max)) = bounds else {
        return Err(messages::parameter());
    };
    let Some(raw) = text(ctx.value).filter(|value| !value.is_empty()) else {
        return Ok(());
    };
    match raw.parse::<f64>() {
        Ok(number) if number >= min && number <= max => Ok(()),
        _ => Err(messages::range(min, max)),
    }
}

fn numeric(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    match text(ctx.value) {
        Some(value) if !value.chars().all(|c| c.is_ascii_digit()) => Err(messages::numeric()),
        _ => Ok(()),
    }
}

fn date_format_is_correct(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    if is_empty_value(ctx.value) || parse_date(ctx.value).is_some() {
        Ok(())
    } else {
        Err(messages::date_format())
    }
}

fn date_in_past(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    if is_empty_value(ctx.value) {
        return Ok(());
    }
    match parse_date(ctx.value) {
        Some(date) if date <= ctx.today => Ok(()),
        Some(_) => Err(messages::date_in_future()),
        None => Err(messages::date_format()),
    }
}

fn is_valid_birth_date(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    date_in_past(ctx)
}

fn is_valid_parents_birth_date(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let min_age = integer_parameter(ctx, 0)?;
    if is_empty_value(ctx.value) {
        return Ok(());
    }
    let Some(parent_birth) = parse_date(ctx.value) else {
        return Err(messages::date_format());
    };
    if parent_birth > ctx.today {
        return Err(messages::date_in_future());
    }
    let reference = parse_date(ctx.scope.get("$form.child.childBirthDate")).unwrap_or(ctx.today);
    if years_between(parent_birth, reference) < min_age {
        return Err(messages::parent_birth_date(min_age));
    }
    Ok(())
}

fn check_marriage_date(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let min_age = integer_parameter(ctx, 0)?;
    if is_empty_value(ctx.value) {
        return Ok(());
    }
    let Some(marriage_date) = parse_date(ctx.value) else {
        return Err(messages::date_format());
    };
    if marriage_date > ctx.today {
        return Err(messages::date_in_future());
    }
    for spouse in ["$form.bride.brideBirthDate", "$form.groom.groomBirthDate"] {
        if let Some(birth_date) = parse_date(ctx.scope.get(spouse)) {
            if years_between(birth_date, marriage_date) < min_age {
                return Err(messages::marriage_date(min_age));
            }
        }
    }
    Ok(())
}

fn english_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z'. \-]*$").expect("name pattern compiles"))
}

fn english_only_name_format(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    match text(ctx.value) {
        Some(value) if !english_name_pattern().is_match(&value) => Err(messages::english_name()),
        _ => Ok(()),
    }
}

fn id_pattern(kind: &str) -> Option<&'static Regex> {
    static NATIONAL_ID: OnceLock<Regex> = OnceLock::new();
    static PASSPORT: OnceLock<Regex> = OnceLock::new();
    static REGISTRATION_NUMBER: OnceLock<Regex> = OnceLock::new();

    match kind {
        "NATIONAL_ID" => Some(NATIONAL_ID.get_or_init(|| {
            Regex::new(default_application_config().nid_number_pattern)
                .expect("national id pattern compiles")
        })),
        "PASSPORT" => Some(
            PASSPORT.get_or_init(|| Regex::new(r"^[A-Z0-9]{9}$").expect("passport pattern compiles")),
        ),
        "BIRTH_REGISTRATION_NUMBER" | "DEATH_REGISTRATION_NUMBER" => {
            Some(REGISTRATION_NUMBER.get_or_init(|| {
                Regex::new(r"^[a-zA-Z0-9]{10,12}$").expect("registration pattern compiles")
            }))
        }
        _ => None,
    }
}

fn valid_id_number(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let kind = ctx
        .parameters
        .first()
        .and_then(Value::as_str)
        .ok_or_else(messages::parameter)?;
    let Some(value) = text(ctx.value).filter(|value| !value.is_empty()) else {
        return Ok(());
    };
    let valid = match id_pattern(kind) {
        Some(pattern) => pattern.is_match(&value),
        None => value.chars().all(|c| c.is_ascii_alphanumeric()),
    };
    if valid {
        Ok(())
    } else {
        Err(messages::id_number(&kind.to_ascii_lowercase().replace('_', " ")))
    }
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(default_application_config().phone_number_pattern)
            .expect("phone pattern compiles")
    })
}

fn phone_number_format(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    match text(ctx.value) {
        Some(value) if !value.is_empty() && !phone_pattern().is_match(&value) => {
            Err(messages::phone_number())
        }
        _ => Ok(()),
    }
}

fn duplicate_id_number(ctx: &ValidationContext<'_>) -> Result<(), MessageDescriptor> {
    let sibling = ctx
        .parameters
        .first()
        .and_then(Value::as_str)
        .ok_or_else(messages::parameter)?;
    let Some(value) = text(ctx.value).filter(|value| !value.is_empty()) else {
        return Ok(());
    };
    match text(ctx.scope.get(sibling)) {
        Some(other) if other == value => Err(messages::duplicate_id()),
        _ => Ok(()),
    }
}
