use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use super::{read_source, SeedingError, SeedingState, ROLES_CSV};
use crate::error::AppError;

const SYSTEM_ROLE: &str = "systemRole";
const SCOPES: &str = "scopes";
const DEMO_SCOPE: &str = "demo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLabel {
    pub lang: String,
    pub label: String,
}

/// One CSV row: the labels of a role in every configured language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub labels: Vec<RoleLabel>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Rows grouped by `systemRole`, in file order within each group.
pub type RoleMap = BTreeMap<String, Vec<RoleEntry>>;

/// Any column other than `systemRole` and `scopes` is a language code.
pub fn compose_roles<R: Read>(reader: R) -> Result<RoleMap, SeedingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let role_column = headers
        .iter()
        .position(|header| header == SYSTEM_ROLE)
        .ok_or(SeedingError::MissingColumn(SYSTEM_ROLE))?;
    let scopes_column = headers.iter().position(|header| header == SCOPES);
    let languages: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != role_column && Some(*index) != scopes_column)
        .collect();

    let mut roles = RoleMap::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 1;

        let system_role = super::required_cell(
            record.get(role_column).map(str::to_string),
            row,
            SYSTEM_ROLE,
        )?;

        let labels = languages
            .iter()
            .filter_map(|(column, lang)| {
                let label = record.get(*column)?.trim();
                (!label.is_empty()).then(|| RoleLabel {
                    lang: lang.to_string(),
                    label: label.to_string(),
                })
            })
            .collect();

        let scopes = scopes_column
            .and_then(|column| record.get(column))
            .map(|cell| cell.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        roles
            .entry(system_role)
            .or_default()
            .push(RoleEntry { labels, scopes });
    }

    Ok(roles)
}

/// Grants the `demo` scope to every role entry that lacks it.
pub fn with_demo_scope(mut roles: RoleMap) -> RoleMap {
    for entry in roles.values_mut().flatten() {
        if !entry.scopes.iter().any(|scope| scope == DEMO_SCOPE) {
            entry.scopes.push(DEMO_SCOPE.to_string());
        }
    }
    roles
}

pub(crate) async fn roles_handler(
    State(state): State<Arc<SeedingState>>,
) -> Result<Json<RoleMap>, AppError> {
    let source = read_source(&state.data.path(ROLES_CSV)).await?;
    let roles = compose_roles(source.as_slice())?;
    if state.environment.is_production() {
        Ok(Json(roles))
    } else {
        Ok(Json(with_demo_scope(roles)))
    }
}
