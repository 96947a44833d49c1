use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::{
    optional_cell, read_source, required_cell, SeedingError, SeedingState, CRVS_OFFICES_CSV,
    HEALTH_FACILITIES_CSV, LOCATIONS_CSV,
};
use crate::error::AppError;

/// Root of the administrative hierarchy.
pub const ROOT_LOCATION: &str = "Location/0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    AdminStructure,
    CrvsOffice,
    HealthFacility,
}

impl FromStr for LocationType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN_STRUCTURE" => Ok(Self::AdminStructure),
            "CRVS_OFFICE" => Ok(Self::CrvsOffice),
            "HEALTH_FACILITY" => Ok(Self::HealthFacility),
            _ => Err(()),
        }
    }
}

/// A location or facility in the shape the core gateway stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub part_of: String,
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationRow {
    #[serde(rename = "statisticalID", default)]
    pub(crate) statistical_id: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) alias: Option<String>,
    #[serde(rename = "partOf", default)]
    pub(crate) part_of: Option<String>,
    #[serde(rename = "locationType", default)]
    pub(crate) location_type: Option<String>,
    #[serde(rename = "jurisdictionType", default)]
    pub(crate) jurisdiction_type: Option<String>,
}

impl LocationRow {
    pub(crate) fn into_location(self, row: usize) -> Result<Location, SeedingError> {
        let id = required_cell(self.statistical_id, row, "statisticalID")?;
        let name = required_cell(self.name, row, "name")?;
        let raw_type = required_cell(self.location_type, row, "locationType")?;
        let location_type = raw_type
            .parse()
            .map_err(|_| SeedingError::InvalidValue {
                row,
                column: "locationType",
                value: raw_type.clone(),
            })?;

        Ok(Location {
            id,
            name,
            alias: optional_cell(self.alias),
            part_of: optional_cell(self.part_of).unwrap_or_else(|| ROOT_LOCATION.to_string()),
            location_type,
            jurisdiction_type: optional_cell(self.jurisdiction_type),
        })
    }
}

/// Reads one locations CSV, aborting on the first malformed row.
pub fn read_locations<R: Read>(reader: R) -> Result<Vec<Location>, SeedingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut locations = Vec::new();
    for (index, record) in csv_reader.deserialize::<LocationRow>().enumerate() {
        locations.push(record?.into_location(index + 1)?);
    }
    Ok(locations)
}

pub async fn read_locations_from_path(path: &Path) -> Result<Vec<Location>, SeedingError> {
    read_locations(read_source(path).await?.as_slice())
}

/// Administrative areas followed by CRVS offices and health facilities.
pub async fn compose_locations(data_dir: &Path) -> Result<Vec<Location>, SeedingError> {
    let mut locations = read_locations_from_path(&data_dir.join(LOCATIONS_CSV)).await?;
    locations.extend(
        super::compose_facilities(
            &data_dir.join(CRVS_OFFICES_CSV),
            &data_dir.join(HEALTH_FACILITIES_CSV),
        )
        .await?,
    );
    Ok(locations)
}

pub(crate) async fn locations_handler(
    State(state): State<Arc<SeedingState>>,
) -> Result<Json<Vec<Location>>, AppError> {
    Ok(Json(compose_locations(&state.data.dir).await?))
}
