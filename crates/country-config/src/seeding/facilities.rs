use std::path::Path;

use super::locations::{read_locations_from_path, Location, LocationType};
use super::SeedingError;

/// Reads the CRVS office and health facility CSVs. Each file may only hold its
/// own kind of facility.
pub async fn compose_facilities(
    crvs_offices: &Path,
    health_facilities: &Path,
) -> Result<Vec<Location>, SeedingError> {
    let mut facilities = read_kind(crvs_offices, LocationType::CrvsOffice).await?;
    facilities.extend(read_kind(health_facilities, LocationType::HealthFacility).await?);
    Ok(facilities)
}

async fn read_kind(path: &Path, expected: LocationType) -> Result<Vec<Location>, SeedingError> {
    let facilities = read_locations_from_path(path).await?;
    if let Some((index, facility)) = facilities
        .iter()
        .enumerate()
        .find(|(_, facility)| facility.location_type != expected)
    {
        return Err(SeedingError::InvalidValue {
            row: index + 1,
            column: "locationType",
            value: format!("{:?} in {}", facility.location_type, path.display()),
        });
    }
    tracing::debug!(path = %path.display(), count = facilities.len(), "read facilities");
    Ok(facilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[tokio::test]
    async fn offices_then_health_facilities() {
        let offices = csv_file(
            "statisticalID,name,partOf,locationType\nJWMRGwDBXK,HQ Office,Location/oEBf29y8JP8,CRVS_OFFICE\n",
        );
        let health = csv_file(
            "statisticalID,name,partOf,locationType\nJWMRGwDBXA,Chikobo Rural Health Centre,Location/oEBf29y8JP8,HEALTH_FACILITY\n",
        );

        let facilities = compose_facilities(offices.path(), health.path())
            .await
            .expect("facilities compose");

        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].location_type, LocationType::CrvsOffice);
        assert_eq!(facilities[1].name, "Chikobo Rural Health Centre");
    }

    #[tokio::test]
    async fn mismatched_kind_is_rejected() {
        let offices = csv_file(
            "statisticalID,name,partOf,locationType\nJWMRGwDBXA,Clinic,Location/0,HEALTH_FACILITY\n",
        );
        let health = csv_file("statisticalID,name,partOf,locationType\n");

        let err = compose_facilities(offices.path(), health.path())
            .await
            .expect_err("wrong kind");

        assert!(matches!(err, SeedingError::InvalidValue { row: 1, .. }));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let health = csv_file("statisticalID,name,partOf,locationType\n");
        let err = compose_facilities(Path::new("/nonexistent/offices.csv"), health.path())
            .await
            .expect_err("missing file");
        assert!(matches!(err, SeedingError::Io { .. }));
    }
}
