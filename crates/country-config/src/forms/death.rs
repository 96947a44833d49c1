use serde_json::json;

use super::common::{
    birth_date, document_uploader, family_name, first_names, gender, id_type, message,
    national_id, nationality, option, page, phone_number, plain_mapping, select_mapping,
};
use super::conditionals::hide_if_id_type_not_other;
use super::expression::Expression;
use super::model::{Event, EventForm, FieldMapping, FieldType, FormField, FormSection, TransformRef};

pub fn death_form() -> EventForm {
    EventForm {
        event: Event::Death,
        sections: vec![deceased_section(), event_section(), informant_section(), documents_section()],
    }
}

fn deceased_section() -> FormSection {
    let id_type_other = FormField::new(
        "iDTypeOther",
        FieldType::Text,
        message("form.field.label.iDTypeOther", "Other type of ID"),
    )
    .required()
    .hide_when(hide_if_id_type_not_other("iDType"));

    let marital_status = FormField::new(
        "maritalStatus",
        FieldType::SelectWithOptions,
        message("form.field.label.maritalStatus", "Marital status"),
    )
    .options(vec![
        option("SINGLE", "form.field.label.maritalStatusSingle", "Single"),
        option("MARRIED", "form.field.label.maritalStatusMarried", "Married"),
        option("WIDOWED", "form.field.label.maritalStatusWidowed", "Widowed"),
        option("DIVORCED", "form.field.label.maritalStatusDivorced", "Divorced"),
        option("NOT_STATED", "form.field.label.maritalStatusNotStated", "Not stated"),
    ])
    .mapping(select_mapping("maritalStatus"));

    FormSection {
        id: "deceased".to_string(),
        pages: vec![page(
            "deceased-view-group",
            message("form.section.deceased.title", "Deceased details"),
            vec![
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                gender("gender"),
                birth_date("deceasedBirthDate", ("dateInPast", vec![])),
                nationality("nationality"),
                id_type("iDType"),
                national_id("deceasedID", "iDType", None),
                id_type_other,
                marital_status,
            ],
        )],
    }
}

fn event_section() -> FormSection {
    let death_date = FormField::new(
        "deathDate",
        FieldType::Date,
        message("form.field.label.deathDate", "Date of death"),
    )
    .required()
    .validate_with("dateFormatIsCorrect", vec![])
    .validate_with("dateInPast", vec![])
    .mapping(FieldMapping {
        mutation: Some(TransformRef::new("fieldValueTransformer", vec![json!("deathDate")])),
        template: Some(TransformRef::new("longDateTransformer", vec![json!("deathDate")])),
        ..FieldMapping::default()
    });

    let cause_established = FormField::new(
        "causeOfDeathEstablished",
        FieldType::RadioGroup,
        message("form.field.label.causeOfDeathEstablished", "Cause of death has been established"),
    )
    .required()
    .initial_value(json!("false"))
    .options(vec![
        option("true", "form.field.label.confirm", "Yes"),
        option("false", "form.field.label.deny", "No"),
    ])
    .mapping(plain_mapping());

    let method = FormField::new(
        "causeOfDeathMethod",
        FieldType::SelectWithOptions,
        message("form.field.label.causeOfDeathMethod", "Source of cause of death"),
    )
    .required()
    .show_when(Expression::equals("causeOfDeathEstablished", "true"))
    .options(vec![
        option("PHYSICIAN", "form.field.label.physician", "Physician"),
        option("LAY_REPORTED", "form.field.label.layReported", "Lay reported"),
        option("VERBAL_AUTOPSY", "form.field.label.verbalAutopsy", "Verbal autopsy"),
        option("MEDICALLY_CERTIFIED", "form.field.label.medicallyCertified", "Medically Certified Cause of Death"),
    ])
    .mapping(select_mapping("causeOfDeathMethod"));

    let description = FormField::new(
        "deathDescription",
        FieldType::Textarea,
        message("form.field.label.deathDescription", "Description"),
    )
    .required()
    .validate_with("maxLength", vec![json!(500)])
    .show_when(Expression::and(vec![
        Expression::equals("causeOfDeathEstablished", "true"),
        Expression::one_of("causeOfDeathMethod", &["LAY_REPORTED", "VERBAL_AUTOPSY"]),
    ]));

    let place_of_death = FormField::new(
        "placeOfDeath",
        FieldType::SelectWithOptions,
        message("form.field.label.placeOfDeath", "Where did the death occur?"),
    )
    .required()
    .options(vec![
        option("HEALTH_FACILITY", "form.field.label.healthInstitution", "Health Institution"),
        option("DECEASED_USUAL_RESIDENCE", "form.field.label.placeOfDeathSameAsPrimary", "Deceased's usual place of residence"),
        option("OTHER", "form.field.label.otherInstitution", "Other"),
    ])
    .mapping(select_mapping("placeOfDeath"));

    let death_location = FormField::new(
        "deathLocation",
        FieldType::SelectWithOptions,
        message("form.field.label.healthInstitution", "Health institution"),
    )
    .required()
    .hide_when(Expression::not_equals("placeOfDeath", "HEALTH_FACILITY"))
    .mapping(select_mapping("placeOfDeath"));

    FormSection {
        id: "deathEvent".to_string(),
        pages: vec![page(
            "death-event-details",
            message("form.section.deathEvent.title", "Death details"),
            vec![
                death_date,
                cause_established,
                method,
                description,
                place_of_death,
                death_location,
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
        option("SPOUSE", "form.field.label.informantRelation.spouse", "Spouse"),
        option("SON", "form.field.label.informantRelation.son", "Son"),
        option("DAUGHTER", "form.field.label.informantRelation.daughter", "Daughter"),
        option("OTHER", "form.field.label.informantRelation.others", "Someone else"),
    ])
    .mapping(select_mapping("informantType"));

    let other_relationship = FormField::new(
        "otherInformantType",
        FieldType::Text,
        message("form.field.label.relationshipToDeceased", "Relationship to deceased"),
    )
    .required()
    .validate_with("maxLength", vec![json!(32)])
    .hide_when(Expression::not_equals("informantType", "OTHER"));

    FormSection {
        id: "informant".to_string(),
        pages: vec![page(
            "informant-view-group",
            message("form.section.informant.title", "Informant's details"),
            vec![
                informant_type,
                other_relationship,
                first_names("firstNamesEng"),
                family_name("familyNameEng"),
                birth_date("informantBirthDate", ("dateInPast", vec![])),
                id_type("informantIdType"),
                national_id(
                    "informantID",
                    "informantIdType",
                    Some("$form.deceased.deceasedID"),
                ),
                phone_number("registrationPhone"),
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
                    "uploadDocForDeceased",
                    message("form.field.label.proofOfDeceasedID", "Proof of deceased's ID"),
                    vec![
                        option("NATIONAL_ID", "form.field.label.docTypeNID", "National ID"),
                        option("BIRTH_CERTIFICATE", "form.field.label.docTypeBirthCert", "Birth certificate"),
                    ],
                ),
                document_uploader(
                    "uploadDocForCauseOfDeath",
                    message("form.field.label.proofOfCauseOfDeath", "Proof of cause of death"),
                    vec![option(
                        "MEDICALLY_CERTIFIED_CAUSE_OF_DEATH",
                        "form.field.label.medicallyCertified",
                        "Medically Certified Cause of Death",
                    )],
                )
                .show_when(Expression::equals("$form.deathEvent.causeOfDeathEstablished", "true")),
            ],
        )],
    }
}
