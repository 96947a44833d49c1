//! Named conditionals the client may reference in addition to the ones it ships with.

use std::collections::BTreeMap;

use super::expression::Expression;
use super::model::{ConditionalAction, DisplayConditional};

pub fn hide_if_id_type_not_other(type_field: &str) -> Expression {
    Expression::or(vec![
        Expression::is_empty(type_field),
        Expression::not_equals(type_field, "OTHER"),
    ])
}

/// True while the national ID system integration lacks any OpenID setting.
pub fn nid_integration_disabled() -> Expression {
    let prefix = "$form.integrations.nationalIdSystem";
    Expression::or(vec![
        Expression::is_empty(prefix),
        Expression::is_empty(&format!("{prefix}.openIdProviderBaseUrl")),
        Expression::is_empty(&format!("{prefix}.openIdProviderClientId")),
        Expression::is_empty(&format!("{prefix}.openIdProviderClaims")),
    ])
}

pub fn conditional_catalog() -> BTreeMap<&'static str, DisplayConditional> {
    BTreeMap::from([
        (
            "iDType",
            DisplayConditional {
                action: ConditionalAction::Hide,
                expression: hide_if_id_type_not_other("iDType"),
            },
        ),
        (
            "hideIfNidIntegrationDisabled",
            DisplayConditional {
                action: ConditionalAction::Hide,
                expression: nid_integration_disabled(),
            },
        ),
    ])
}
