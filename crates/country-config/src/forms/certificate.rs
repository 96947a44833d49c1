//! Collector selection shown when a certificate is printed.

use serde_json::json;

use super::common::{family_name, first_names, message, option, page};
use super::expression::Expression;
use super::model::{FieldType, FormField, FormSection};

/// Options offered to the registration agent for who is collecting the
/// certificate. Printing in advance is handled by the core application and is
/// never one of these options.
pub fn print_certificate_collectors() -> FormSection {
    let collector = FormField::new(
        "type",
        FieldType::RadioGroup,
        message("print.certificate.collector.whoToCollect", "Certificate collector"),
    )
    .required()
    .initial_value(json!(""))
    .options(vec![
        option("INFORMANT", "form.field.label.informantName", "Informant"),
        option("OTHER", "form.field.label.someoneElseCollector", "Someone else"),
    ]);

    let relationship = FormField::new(
        "relationship",
        FieldType::Text,
        message("form.field.label.applicantsRelationWithChild", "Relationship to the person"),
    )
    .required()
    .validate_with("maxLength", vec![json!(32)]);

    let other_collector = |field: FormField| field.show_when(Expression::equals("type", "OTHER"));

    FormSection {
        id: "registrationCertificateCollector".to_string(),
        pages: vec![
            page(
                "certCollector",
                message("print.certificate.section.title", "Certify record"),
                vec![collector],
            ),
            page(
                "otherCertCollectorDetails",
                message("print.certificate.collector.other", "Collector's details"),
                vec![
                    other_collector(first_names("firstName")),
                    other_collector(family_name("lastName")),
                    other_collector(relationship),
                ],
            ),
        ],
    }
}
