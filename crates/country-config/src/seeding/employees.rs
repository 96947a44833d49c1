use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use super::roles::{compose_roles, RoleMap};
use super::{optional_cell, read_source, required_cell, SeedingError, SeedingState, ROLES_CSV};
use crate::error::AppError;

pub const EMPLOYEES_CSV: &str = "employees.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemRole {
    FieldAgent,
    RegistrationAgent,
    LocalRegistrar,
    LocalSystemAdmin,
    NationalSystemAdmin,
    PerformanceManagement,
    NationalRegistrar,
}

impl SystemRole {
    pub const ALL: [SystemRole; 7] = [
        SystemRole::FieldAgent,
        SystemRole::RegistrationAgent,
        SystemRole::LocalRegistrar,
        SystemRole::LocalSystemAdmin,
        SystemRole::NationalSystemAdmin,
        SystemRole::PerformanceManagement,
        SystemRole::NationalRegistrar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemRole::FieldAgent => "FIELD_AGENT",
            SystemRole::RegistrationAgent => "REGISTRATION_AGENT",
            SystemRole::LocalRegistrar => "LOCAL_REGISTRAR",
            SystemRole::LocalSystemAdmin => "LOCAL_SYSTEM_ADMIN",
            SystemRole::NationalSystemAdmin => "NATIONAL_SYSTEM_ADMIN",
            SystemRole::PerformanceManagement => "PERFORMANCE_MANAGEMENT",
            SystemRole::NationalRegistrar => "NATIONAL_REGISTRAR",
        }
    }
}

impl FromStr for SystemRole {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or(())
    }
}

/// A default user seeded into the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub facility_id: String,
    pub username: String,
    pub given_names: String,
    pub family_name: String,
    pub role: SystemRole,
    /// Job title in any configured language.
    #[serde(rename = "type")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmployeeRow {
    #[serde(rename = "facilityId", default)]
    facility_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(rename = "givenNames", default)]
    given_names: Option<String>,
    #[serde(rename = "familyName", default)]
    family_name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(rename = "type", default)]
    title: Option<String>,
    #[serde(default)]
    mobile: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

fn has_title(roles: &RoleMap, role: SystemRole, title: &str) -> bool {
    roles
        .get(role.as_str())
        .into_iter()
        .flatten()
        .flat_map(|entry| &entry.labels)
        .any(|label| label.label == title)
}

/// Reads the employee CSV. `role` must be a known system role and `type` one
/// of that role's labels in `roles`; usernames are unique.
pub fn read_employees<R: Read>(reader: R, roles: &RoleMap) -> Result<Vec<Employee>, SeedingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut usernames = BTreeSet::new();
    let mut employees = Vec::new();
    for (index, record) in csv_reader.deserialize::<EmployeeRow>().enumerate() {
        let record = record?;
        let row = index + 1;

        let raw_role = required_cell(record.role, row, "role")?;
        let role = raw_role.parse::<SystemRole>().map_err(|()| SeedingError::InvalidValue {
            row,
            column: "role",
            value: raw_role.clone(),
        })?;
        let title = required_cell(record.title, row, "type")?;
        if !has_title(roles, role, &title) {
            return Err(SeedingError::InvalidValue {
                row,
                column: "type",
                value: format!("{title} is not a {raw_role} label"),
            });
        }
        let username = required_cell(record.username, row, "username")?;
        if !usernames.insert(username.clone()) {
            return Err(SeedingError::InvalidValue {
                row,
                column: "username",
                value: username,
            });
        }

        employees.push(Employee {
            facility_id: required_cell(record.facility_id, row, "facilityId")?,
            username,
            given_names: required_cell(record.given_names, row, "givenNames")?,
            family_name: required_cell(record.family_name, row, "familyName")?,
            role,
            title,
            mobile: optional_cell(record.mobile),
            email: optional_cell(record.email),
        });
    }
    Ok(employees)
}

pub(crate) async fn employees_handler(
    State(state): State<Arc<SeedingState>>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let roles = compose_roles(read_source(&state.data.path(ROLES_CSV)).await?.as_slice())?;
    let source = read_source(&state.data.path(EMPLOYEES_CSV)).await?;
    Ok(Json(read_employees(source.as_slice(), &roles)?))
}
