//! Reference data read from the bundled CSV and SVG sources.
//!
//! Every reader is fail-fast: the first malformed row aborts the whole
//! operation and nothing is handed on to the gateway.

pub mod certificates;
pub mod employees;
pub mod facilities;
pub mod fhir;
pub mod gateway;
pub mod locations;
pub mod roles;

pub use certificates::{certificate_path, Certificate};
pub use employees::{read_employees, Employee, SystemRole, EMPLOYEES_CSV};
pub use facilities::compose_facilities;
pub use gateway::{LocationGateway, LocationPushReport};
pub use locations::{compose_locations, Location, LocationType};
pub use roles::{compose_roles, RoleEntry, RoleLabel, RoleMap};

use axum::routing::get;
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{AppEnvironment, DataConfig};

pub const ROLES_CSV: &str = "roles.csv";
pub const LOCATIONS_CSV: &str = "locations.csv";
pub const CRVS_OFFICES_CSV: &str = "crvs-facilities.csv";
pub const HEALTH_FACILITIES_CSV: &str = "health-facilities.csv";

#[derive(Debug)]
pub enum SeedingError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    MissingColumn(&'static str),
    MissingValue { row: usize, column: &'static str },
    InvalidValue { row: usize, column: &'static str, value: String },
    CertificateNotFound(PathBuf),
    InvalidUrl(url::ParseError),
    Transport(reqwest::Error),
    Upstream { status: u16, body: String },
}

impl std::fmt::Display for SeedingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedingError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            SeedingError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            SeedingError::MissingColumn(column) => write!(f, "CSV is missing the '{}' column", column),
            SeedingError::MissingValue { row, column } => {
                write!(f, "row {} has no value for '{}'", row, column)
            }
            SeedingError::InvalidValue { row, column, value } => {
                write!(f, "row {} has an invalid '{}' value: {}", row, column, value)
            }
            SeedingError::CertificateNotFound(path) => {
                write!(f, "certificate template {} does not exist", path.display())
            }
            SeedingError::InvalidUrl(err) => write!(f, "invalid gateway url: {}", err),
            SeedingError::Transport(err) => write!(f, "gateway request failed: {}", err),
            SeedingError::Upstream { status, body } => write!(
                f,
                "Error posting the locations to core (status {}): {}",
                status, body
            ),
        }
    }
}

impl std::error::Error for SeedingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedingError::Io { source, .. } => Some(source),
            SeedingError::Csv(err) => Some(err),
            SeedingError::InvalidUrl(err) => Some(err),
            SeedingError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for SeedingError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<reqwest::Error> for SeedingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<url::ParseError> for SeedingError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err)
    }
}

/// Reads a whole source file without blocking the runtime.
pub(crate) async fn read_source(path: &Path) -> Result<Vec<u8>, SeedingError> {
    tokio::fs::read(path).await.map_err(|source| SeedingError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the trimmed cell, failing on a blank one. `row` is the 1-based data row.
pub(crate) fn required_cell(
    value: Option<String>,
    row: usize,
    column: &'static str,
) -> Result<String, SeedingError> {
    value
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .ok_or(SeedingError::MissingValue { row, column })
}

pub(crate) fn optional_cell(value: Option<String>) -> Option<String> {
    value
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
}

/// What the seeding handlers need to locate their sources.
#[derive(Debug, Clone)]
pub struct SeedingState {
    pub data: DataConfig,
    pub environment: AppEnvironment,
}

pub fn seeding_router(state: Arc<SeedingState>) -> Router {
    Router::new()
        .route("/roles", get(roles::roles_handler))
        .route("/users", get(employees::employees_handler))
        .route("/locations", get(locations::locations_handler))
        .route("/certificates", get(certificates::certificates_handler))
        .route("/certificates/:event", get(certificates::certificate_handler))
        .with_state(state)
}
