use super::common::*;
use serde_json::json;

use crate::forms::engine::{FieldOutcome, FormConfigError};
use crate::forms::expression::Expression;
use crate::forms::model::{FieldMapping, TransformRef};
use crate::forms::validators::{Arity, ParamKind};
use crate::forms::{LoadedForm, TransformCatalog, ValidatorRegistry};

#[test]
fn empty_validator_list_always_passes() {
    let form = load(vec![text_field("nickname")]);

    for value in [json!(null), json!(""), json!("anything"), json!(42), json!(["a"])] {
        let outcome = form
            .validate_field("child", "nickname", &values(json!({ "nickname": value })))
            .expect("known field");
        assert_eq!(outcome, FieldOutcome::Valid);
    }
}

#[test]
fn first_failing_rule_supplies_the_message() {
    let form = load(vec![text_field("firstNamesEng")
        .validate_with("englishOnlyNameFormat", vec![])
        .validate_with("maxLength", vec![json!(3)])]);

    let outcome = form
        .validate_field("child", "firstNamesEng", &values(json!({ "firstNamesEng": "R2D2 Long" })))
        .expect("known field");

    match outcome {
        FieldOutcome::Invalid { message } => {
            assert_eq!(message.id, "validations.englishOnlyNameFormat")
        }
        FieldOutcome::Valid => panic!("expected a failure"),
    }
}

#[test]
fn unknown_fields_yield_none() {
    let form = load(vec![text_field("nickname")]);
    assert!(form.validate_field("child", "missing", &values(json!({}))).is_none());
    assert!(form.is_visible("mother", "nickname", &values(json!({}))).is_none());
}

#[test]
fn unknown_operation_is_rejected_at_load_time() {
    let form = single_page_form(vec![text_field("nickname").validate_with("isPalindrome", vec![])]);

    let err = LoadedForm::load(form, &ValidatorRegistry::standard(), &TransformCatalog::standard())
        .expect_err("unknown operation");

    assert_eq!(
        err,
        FormConfigError::UnknownOperation {
            field: "nickname".to_string(),
            operation: "isPalindrome".to_string(),
        }
    );
}

#[test]
fn wrong_parameter_count_is_rejected_at_load_time() {
    let form = single_page_form(vec![text_field("nickname").validate_with("maxLength", vec![])]);

    let err = LoadedForm::load(form, &ValidatorRegistry::standard(), &TransformCatalog::standard())
        .expect_err("arity mismatch");

    assert_eq!(
        err,
        FormConfigError::InvalidArity {
            field: "nickname".to_string(),
            operation: "maxLength".to_string(),
            expected: Arity::Exact(1),
            found: 0,
        }
    );
}

#[test]
fn mistyped_parameters_are_rejected_at_load_time() {
    let cases = [
        ("maxLength", vec![json!("thirty-two")], 0, ParamKind::Count),
        ("validIDNumber", vec![json!(7)], 0, ParamKind::Text),
        ("range", vec![json!(0), json!("six")], 1, ParamKind::Number),
        ("checkMarriageDate", vec![json!(-18)], 0, ParamKind::Count),
    ];

    for (operation, parameters, index, expected) in cases {
        let form = single_page_form(vec![text_field("nickname").validate_with(operation, parameters)]);

        let err = LoadedForm::load(form, &ValidatorRegistry::standard(), &TransformCatalog::standard())
            .expect_err("mistyped parameter");

        assert_eq!(
            err,
            FormConfigError::InvalidParameter {
                field: "nickname".to_string(),
                operation: operation.to_string(),
                index,
                expected,
            }
        );
    }
}

#[test]
fn duplicate_names_on_a_page_are_rejected() {
    let form = single_page_form(vec![text_field("nickname"), text_field("nickname")]);

    let err = LoadedForm::load(form, &ValidatorRegistry::standard(), &TransformCatalog::standard())
        .expect_err("duplicate field");

    assert!(matches!(err, FormConfigError::DuplicateField { ref field, .. } if field == "nickname"));
}

#[test]
fn unknown_transform_is_rejected_at_load_time() {
    let field = text_field("nickname").mapping(FieldMapping {
        mutation: Some(TransformRef::new("shoutingTransformer", vec![])),
        ..FieldMapping::default()
    });

    let err = LoadedForm::load(
        single_page_form(vec![field.clone()]),
        &ValidatorRegistry::standard(),
        &TransformCatalog::standard(),
    )
    .expect_err("unknown transform");
    assert!(matches!(err, FormConfigError::UnknownTransform { .. }));

    let extended = TransformCatalog::standard().with("shoutingTransformer");
    assert!(LoadedForm::load(
        single_page_form(vec![field]),
        &ValidatorRegistry::standard(),
        &extended
    )
    .is_ok());
}

#[test]
fn undefined_sibling_is_treated_as_falsy() {
    let form = load(vec![
        text_field("otherInformantType").hide_when(Expression::not_equals("informantType", "OTHER")),
        text_field("informantName").show_when(Expression::is_truthy("informantType")),
    ]);
    let empty = values(json!({}));

    assert_eq!(form.is_visible("child", "otherInformantType", &empty), Some(false));
    assert_eq!(form.is_visible("child", "informantName", &empty), Some(false));
}

#[test]
fn any_hide_conditional_wins() {
    let form = load(vec![text_field("birthLocation")
        .show_when(Expression::Always)
        .hide_when(Expression::Never)
        .hide_when(Expression::equals("placeOfBirth", "PRIVATE_HOME"))]);

    let home = values(json!({ "placeOfBirth": "PRIVATE_HOME" }));
    let facility = values(json!({ "placeOfBirth": "HEALTH_FACILITY" }));

    assert_eq!(form.is_visible("child", "birthLocation", &home), Some(false));
    assert_eq!(form.is_visible("child", "birthLocation", &facility), Some(true));
}

#[test]
fn hidden_fields_are_never_validated() {
    let form = load(vec![
        text_field("placeOfBirth"),
        text_field("birthLocation")
            .required()
            .validate_with("maxLength", vec![json!(2)])
            .hide_when(Expression::not_equals("placeOfBirth", "HEALTH_FACILITY")),
    ]);

    let report = form.validate(&values(json!({
        "child": { "placeOfBirth": "PRIVATE_HOME", "birthLocation": "far too long" }
    })));

    assert!(report.is_valid());
    assert!(report.is_complete());
    assert_eq!(report.hidden, vec!["child.birthLocation".to_string()]);
}

#[test]
fn required_fields_left_empty_are_reported_separately() {
    let form = load(vec![
        text_field("firstNamesEng").required(),
        text_field("familyNameEng").validate_with("maxLength", vec![json!(3)]),
    ]);

    let report = form.validate(&values(json!({
        "child": { "firstNamesEng": "  ", "familyNameEng": "Smith" }
    })));

    assert_eq!(report.missing_required, vec!["child.firstNamesEng".to_string()]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].field, "familyNameEng");
    assert_eq!(report.errors[0].message.id, "validations.maxLength");
}

#[test]
fn missing_section_behaves_like_empty_values() {
    let form = load(vec![text_field("nickname").validate_with("maxLength", vec![json!(3)])]);

    let report = form.validate(&values(json!({ "mother": { "nickname": "ignored" } })));

    assert!(report.is_valid());
}
