use serde_json::json;

use super::common::{
    birth_date, document_uploader, family_name, first_names, message, national_id, nationality,
    option, page, select_mapping, signature,
};
use super::expression::Expression;
use super::model::{Event, EventForm, FieldMapping, FieldType, FormField, FormSection, TransformRef};

/// Minimum age of both spouses on the date of marriage.
pub const MINIMUM_MARRIAGE_AGE: u64 = 18;

pub fn marriage_form() -> EventForm {
    EventForm {
        event: Event::Marriage,
        sections: vec![
            spouse_section("groom", "Groom's details"),
            spouse_section("bride", "Bride's details"),
            event_section(),
            witness_section("witnessOne", "Witness 1 details"),
            witness_section("witnessTwo", "Witness 2 details"),
            documents_section(),
        ],
    }
}

fn spouse_section(spouse: &str, title: &str) -> FormSection {
    let national_id_type = FormField::new(
        "iDType",
        FieldType::SelectWithOptions,
        message("form.field.label.iDType", "Type of ID"),
    )
    .required()
    .initial_value(json!("NATIONAL_ID"))
    .options(vec![
        option("NATIONAL_ID", "form.field.label.iDTypeNationalID", "National ID"),
        option("NONE", "form.field.label.iDTypeNone", "None"),
    ])
    .mapping(select_mapping("iDType"));

    let other_spouse = if spouse == "bride" { "groom" } else { "bride" };
    let duplicate_of = format!("$form.{other_spouse}.{other_spouse}NationalId");

    FormSection {
        id: spouse.to_string(),
        pages: vec![page(
            &format!("{spouse}-view-group"),
            message(&format!("form.section.{spouse}.title"), title),
            vec![
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                birth_date(&format!("{spouse}BirthDate"), ("dateInPast", vec![])),
                nationality("nationality"),
                national_id_type,
                national_id(&format!("{spouse}NationalId"), "iDType", Some(duplicate_of.as_str())),
            ],
        )],
    }
}

fn event_section() -> FormSection {
    let marriage_date = FormField::new(
        "marriageDate",
        FieldType::Date,
        message("form.field.label.dateOfMarriage", "Date of marriage"),
    )
    .required()
    .validate_with("dateFormatIsCorrect", vec![])
    .validate_with("checkMarriageDate", vec![json!(MINIMUM_MARRIAGE_AGE)])
    .mapping(FieldMapping {
        mutation: Some(TransformRef::new("fieldValueTransformer", vec![json!("date")])),
        template: Some(TransformRef::new("longDateTransformer", vec![json!("marriageDate")])),
        ..FieldMapping::default()
    });

    let marriage_type = FormField::new(
        "typeOfMarriage",
        FieldType::SelectWithOptions,
        message("form.field.label.typeOfMarriage", "Type of marriage"),
    )
    .options(vec![
        option("MONOGAMY", "form.field.label.monogamy", "Monogamous"),
        option("POLYGAMY", "form.field.label.polygamy", "Polygamous"),
    ])
    .mapping(select_mapping("typeOfMarriage"));

    FormSection {
        id: "marriageEvent".to_string(),
        pages: vec![page(
            "marriage-event-details",
            message("form.section.marriageEvent.title", "Marriage details"),
            vec![marriage_date, marriage_type],
        )],
    }
}

fn witness_section(witness: &str, title: &str) -> FormSection {
    let relationship = FormField::new(
        "relationship",
        FieldType::SelectWithOptions,
        message("form.field.label.relationshipToSpouses", "Relationship to spouses"),
    )
    .required()
    .options(vec![
        option("headOfGroomFamily", "form.field.label.headOfGroomFamily", "Head of groom's family"),
        option("OTHER", "form.field.label.other", "Other"),
    ])
    .mapping(select_mapping("relationship"));

    let other_relationship = FormField::new(
        "otherRelationship",
        FieldType::Text,
        message("form.field.label.someoneElse", "Relationship"),
    )
    .required()
    .validate_with("maxLength", vec![json!(32)])
    .hide_when(Expression::not_equals("relationship", "OTHER"));

    FormSection {
        id: witness.to_string(),
        pages: vec![page(
            &format!("{witness}-view-group"),
            message(&format!("form.section.{witness}.title"), title),
            vec![
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                relationship,
                other_relationship,
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
                    "uploadDocForMarriageProof",
                    message("form.field.label.proofOfMarriageNotice", "Notice of intention to marriage"),
                    vec![option(
                        "MARRIAGE_NOTICE",
                        "form.field.label.docTypeMarriageNotice",
                        "Notice of marriage",
                    )],
                ),
                signature(
                    "groomSignature",
                    message("form.field.label.groomSignature", "Signature of groom"),
                ),
                signature(
                    "brideSignature",
                    message("form.field.label.brideSignature", "Signature of bride"),
                ),
            ],
        )],
    }
}
