//! Field builders shared by the birth, death and marriage forms.

use serde_json::json;

use super::expression::Expression;
use super::model::{
    FieldMapping, FieldType, FormField, FormPage, MessageDescriptor, SelectOption, TransformRef,
};

pub const MAX_NAME_LENGTH: u64 = 32;

pub fn message(id: &str, default_message: &str) -> MessageDescriptor {
    MessageDescriptor::new(id, default_message)
}

pub fn option(value: &str, id: &str, default_message: &str) -> SelectOption {
    SelectOption {
        value: value.to_string(),
        label: message(id, default_message),
    }
}

pub fn page(id: &str, title: MessageDescriptor, fields: Vec<FormField>) -> FormPage {
    FormPage {
        id: id.to_string(),
        title,
        fields,
    }
}

fn mapping(mutation: TransformRef, query: TransformRef) -> FieldMapping {
    FieldMapping {
        mutation: Some(mutation),
        query: Some(query),
        template: None,
    }
}

pub fn plain_mapping() -> FieldMapping {
    FieldMapping::default()
}

pub fn select_mapping(certificate_key: &str) -> FieldMapping {
    FieldMapping {
        template: Some(TransformRef::new(
            "selectTransformer",
            vec![json!(certificate_key)],
        )),
        ..FieldMapping::default()
    }
}

fn name_mapping(property: &str) -> FieldMapping {
    mapping(
        TransformRef::new("fieldToNameTransformer", vec![json!("en"), json!(property)]),
        TransformRef::new("nameToFieldTransformer", vec![json!("en"), json!(property)]),
    )
}

pub fn first_names(name: &str) -> FormField {
    FormField::new(name, FieldType::Text, message("form.field.label.firstNames", "First name(s)"))
        .required()
        .initial_value(json!(""))
        .validate_with("englishOnlyNameFormat", vec![])
        .validate_with("maxLength", vec![json!(MAX_NAME_LENGTH)])
        .mapping(name_mapping("given"))
}

pub fn family_name(name: &str) -> FormField {
    FormField::new(name, FieldType::Text, message("form.field.label.familyName", "Last name"))
        .required()
        .initial_value(json!(""))
        .validate_with("englishOnlyNameFormat", vec![])
        .validate_with("maxLength", vec![json!(MAX_NAME_LENGTH)])
        .mapping(name_mapping("family"))
}

pub fn gender(name: &str) -> FormField {
    FormField::new(name, FieldType::SelectWithOptions, message("form.field.label.sex", "Sex"))
        .required()
        .options(vec![
            option("male", "form.field.label.sexMale", "Male"),
            option("female", "form.field.label.sexFemale", "Female"),
            option("unknown", "form.field.label.sexUnknown", "Unknown"),
        ])
        .mapping(select_mapping("gender"))
}

pub fn birth_date(name: &str, rule: (&str, Vec<serde_json::Value>)) -> FormField {
    let (operation, parameters) = rule;
    FormField::new(name, FieldType::Date, message("form.field.label.dateOfBirth", "Date of birth"))
        .required()
        .validate_with("dateFormatIsCorrect", vec![])
        .validate_with(operation, parameters)
        .mapping(mapping(
            TransformRef::new("longDateTransformer", vec![json!("birthDate")]),
            TransformRef::new("fieldValueTransformer", vec![json!("birthDate")]),
        ))
}

pub fn nationality(name: &str) -> FormField {
    FormField::new(
        name,
        FieldType::SelectWithOptions,
        message("form.field.label.nationality", "Nationality"),
    )
    .required()
    .initial_value(json!("FAR"))
    .options(vec![option("FAR", "countries.FAR", "Farajaland")])
    .mapping(FieldMapping {
        template: Some(TransformRef::new("nationalityTransformer", vec![])),
        ..FieldMapping::default()
    })
}

pub fn id_type(name: &str) -> FormField {
    FormField::new(name, FieldType::SelectWithOptions, message("form.field.label.iDType", "Type of ID"))
        .required()
        .options(vec![
            option("NATIONAL_ID", "form.field.label.iDTypeNationalID", "National ID"),
            option("PASSPORT", "form.field.label.iDTypePassport", "Passport"),
            option(
                "BIRTH_REGISTRATION_NUMBER",
                "form.field.label.iDTypeBRN",
                "Birth Registration Number",
            ),
            option("NONE", "form.field.label.iDTypeNone", "None"),
        ])
        .mapping(select_mapping("iDType"))
}

/// National ID input, shown only while the sibling ID type field selects a national ID.
pub fn national_id(name: &str, type_field: &str, duplicate_of: Option<&str>) -> FormField {
    let mut field = FormField::new(name, FieldType::Text, message("form.field.label.NID", "National ID"))
        .required()
        .validate_with("validIDNumber", vec![json!("NATIONAL_ID")])
        .show_when(Expression::equals(type_field, "NATIONAL_ID"))
        .mapping(mapping(
            TransformRef::new("fieldToIdentityTransformer", vec![json!("id"), json!("NATIONAL_ID")]),
            TransformRef::new("identityToFieldTransformer", vec![json!("id"), json!("NATIONAL_ID")]),
        ));
    if let Some(sibling) = duplicate_of {
        field = field.validate_with("duplicateIDNumber", vec![json!(sibling)]);
    }
    field
}

pub fn phone_number(name: &str) -> FormField {
    FormField::new(name, FieldType::Tel, message("form.field.label.phoneNumber", "Phone number"))
        .validate_with("phoneNumberFormat", vec![])
        .mapping(plain_mapping())
}

pub fn document_uploader(name: &str, label: MessageDescriptor, options: Vec<SelectOption>) -> FormField {
    FormField::new(name, FieldType::DocumentUploaderWithOption, label)
        .options(options)
        .mapping(mapping(
            TransformRef::new("eventFieldToAttachmentTransformer", vec![]),
            TransformRef::new("eventAttachmentToFieldTransformer", vec![]),
        ))
}

pub fn signature(name: &str, label: MessageDescriptor) -> FormField {
    FormField::new(name, FieldType::Signature, label)
}
