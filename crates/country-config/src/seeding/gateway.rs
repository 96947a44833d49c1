use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use super::fhir::Bundle;
use super::locations::{Location, LocationType};
use super::SeedingError;
use crate::config::{require_env, ConfigError, GatewayConfig};

const FHIR_JSON: &str = "application/fhir+json";

/// Outcome of a batch update. Entries the gateway already applied stay
/// applied even when others in the same batch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPushReport {
    pub bundle: Bundle,
    pub failed: Vec<String>,
}

impl LocationPushReport {
    pub fn updated(&self) -> usize {
        self.bundle.entry.len() - self.failed.len().min(self.bundle.entry.len())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationResource<'a> {
    #[serde(rename = "statisticalID")]
    statistical_id: &'a str,
    code: LocationType,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<&'a str>,
    part_of: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    jurisdiction_type: Option<&'a str>,
}

impl<'a> From<&'a Location> for LocationResource<'a> {
    fn from(location: &'a Location) -> Self {
        Self {
            statistical_id: &location.id,
            code: location.location_type,
            name: &location.name,
            alias: location.alias.as_deref(),
            part_of: &location.part_of,
            jurisdiction_type: location.jurisdiction_type.as_deref(),
        }
    }
}

/// Pushes locations to the core gateway in one batch.
#[derive(Debug, Clone)]
pub struct LocationGateway {
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl LocationGateway {
    pub fn new(client: reqwest::Client, gateway_url: &str, token: String) -> Result<Self, SeedingError> {
        let endpoint = Url::parse(&format!("{}/locations", gateway_url.trim_end_matches('/')))?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// Reads the admin token from `TOKEN`. Callers resolve this before
    /// touching any CSV so a missing token fails without side effects.
    pub fn token_from_env() -> Result<String, ConfigError> {
        require_env("TOKEN")
    }

    pub fn for_gateway(config: &GatewayConfig, token: String) -> Result<Self, SeedingError> {
        Self::new(reqwest::Client::new(), &config.url, token)
    }

    pub async fn put_locations(&self, locations: &[Location]) -> Result<LocationPushReport, SeedingError> {
        let resources: Vec<LocationResource<'_>> = locations.iter().map(Into::into).collect();

        let response = self
            .client
            .put(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            // set before `json` so the FHIR media type is kept
            .header(CONTENT_TYPE, FHIR_JSON)
            .json(&resources)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "location update rejected by gateway");
            return Err(SeedingError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bundle: Bundle = response.json().await?;
        let mut failed = Vec::new();
        for (index, entry) in bundle.entry.iter().enumerate() {
            if entry.succeeded() {
                continue;
            }
            let name = locations
                .get(index)
                .map(|location| location.name.clone())
                .unwrap_or_else(|| format!("entry {index}"));
            error!("Failed to update location resource for: \"{}\"", name);
            failed.push(name);
        }

        info!(
            entries = bundle.entry.len(),
            failed = failed.len(),
            "location batch applied"
        );
        Ok(LocationPushReport { bundle, failed })
    }
}
