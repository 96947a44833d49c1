use serde_json::json;

use super::common::{
    birth_date, document_uploader, family_name, first_names, gender, id_type, message,
    national_id, nationality, option, page, phone_number, select_mapping, signature,
};
use super::conditionals::hide_if_id_type_not_other;
use super::expression::Expression;
use super::model::{Event, EventForm, FieldType, FormField, FormSection};

pub fn birth_form() -> EventForm {
    EventForm {
        event: Event::Birth,
        sections: vec![
            child_section(),
            informant_section(),
            mother_section(),
            documents_section(),
        ],
    }
}

fn child_section() -> FormSection {
    let place_of_birth = FormField::new(
        "placeOfBirth",
        FieldType::SelectWithOptions,
        message("form.field.label.placeOfBirth", "Place of delivery"),
    )
    .required()
    .options(vec![
        option("HEALTH_FACILITY", "form.field.label.healthInstitution", "Health Institution"),
        option("PRIVATE_HOME", "form.field.label.privateHome", "Residential address"),
        option("OTHER", "form.field.label.otherInstitution", "Other"),
    ])
    .mapping(select_mapping("placeOfBirth"));

    let birth_location = FormField::new(
        "birthLocation",
        FieldType::SelectWithOptions,
        message("form.field.label.healthInstitution", "Health institution"),
    )
    .required()
    .hide_when(Expression::not_equals("placeOfBirth", "HEALTH_FACILITY"))
    .mapping(select_mapping("placeOfBirth"));

    let weight = FormField::new(
        "weightAtBirth",
        FieldType::Number,
        message("form.field.label.weightAtBirth", "Weight at birth"),
    )
    .validate_with("range", vec![json!(0), json!(6)]);

    FormSection {
        id: "child".to_string(),
        pages: vec![page(
            "child-view-group",
            message("form.section.child.title", "Child's details"),
            vec![
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                gender("gender"),
                birth_date("childBirthDate", ("isValidBirthDate", vec![])),
                place_of_birth,
                birth_location,
                weight,
            ],
        )],
    }
}

fn informant_section() -> FormSection {
    let informant_type = FormField::new(
        "informantType",
        FieldType::SelectWithOptions,
        message("form.field.label.informantTitle", "Informant type"),
    )
    .required()
    .initial_value(json!(""))
    .options(vec![
        option("MOTHER", "form.field.label.informantRelation.mother", "Mother"),
        option("FATHER", "form.field.label.informantRelation.father", "Father"),
        option("GRANDFATHER", "form.field.label.informantRelation.grandfather", "Grandfather"),
        option("OTHER", "form.field.label.informantRelation.others", "Someone else"),
    ])
    .mapping(select_mapping("informantType"));

    let other_relationship = FormField::new(
        "otherInformantType",
        FieldType::Text,
        message("form.field.label.informantsRelationWithChild", "Relationship to child"),
    )
    .required()
    .validate_with("maxLength", vec![json!(32)])
    .hide_when(Expression::not_equals("informantType", "OTHER"));

    let informant_name_hidden = Expression::one_of("informantType", &["MOTHER", "FATHER"]);

    FormSection {
        id: "informant".to_string(),
        pages: vec![page(
            "informant-view-group",
            message("form.section.informant.title", "Informant's details"),
            vec![
                informant_type,
                other_relationship,
                first_names("firstNamesEng").hide_when(informant_name_hidden.clone()),
                family_name("familyNameEng").hide_when(informant_name_hidden),
                phone_number("registrationPhone"),
            ],
        )],
    }
}

fn mother_section() -> FormSection {
    let id_type_other = FormField::new(
        "iDTypeOther",
        FieldType::Text,
        message("form.field.label.iDTypeOther", "Other type of ID"),
    )
    .required()
    .hide_when(hide_if_id_type_not_other("iDType"));

    FormSection {
        id: "mother".to_string(),
        pages: vec![page(
            "mother-view-group",
            message("form.section.mother.title", "Mother's details"),
            vec![
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                birth_date("motherBirthDate", ("isValidParentsBirthDate", vec![json!(5)])),
                nationality("nationality"),
                id_type("iDType"),
                national_id("iD", "iDType", None),
                id_type_other,
            ],
        )],
    }
}

fn documents_section() -> FormSection {
    FormSection {
        id: "documents".to_string(),
        pages: vec![page(
            "documents-view-group",
            message("form.section.documents.title", "Supporting documents"),
            vec![
                document_uploader(
                    "uploadDocForChildDOB",
                    message("form.field.label.proofOfBirth", "Proof of birth"),
                    vec![option(
                        "NOTIFICATION_OF_BIRTH",
                        "form.field.label.docTypeChildBirthProof",
                        "Notification of birth",
                    )],
                ),
                document_uploader(
                    "uploadDocForMother",
                    message("form.field.label.proofOfMothersID", "Mother's identity"),
                    vec![
                        option("NATIONAL_ID", "form.field.label.docTypeNID", "National ID"),
                        option("PASSPORT", "form.field.label.docTypePassport", "Passport"),
                    ],
                )
                .hide_when(Expression::is_empty("$form.mother.firstNamesEng")),
                signature(
                    "informantSignature",
                    message("form.field.label.informantSignature", "Signature of informant"),
                ),
            ],
        )],
    }
}
