use axum::extract::{Path as UrlPath, State};
use axum::Json;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{SeedingError, SeedingState};
use crate::error::AppError;
use crate::forms::Event;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub event: Event,
    pub file_name: String,
    pub svg_code: String,
}

fn template_name(event: Event) -> &'static str {
    match event {
        Event::Birth => "BirthCertificate.svg",
        Event::Death => "DeathCertificate.svg",
        Event::Marriage => "MarriageCertificate.svg",
    }
}

pub fn certificate_path(data_dir: &Path, event: Event) -> PathBuf {
    data_dir.join("certificates").join(template_name(event))
}

pub async fn read_certificate(data_dir: &Path, event: Event) -> Result<String, SeedingError> {
    let path = certificate_path(data_dir, event);
    match tokio::fs::read_to_string(&path).await {
        Ok(svg) => Ok(svg),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(SeedingError::CertificateNotFound(path))
        }
        Err(source) => Err(SeedingError::Io { path, source }),
    }
}

pub async fn load_certificates(data_dir: &Path) -> Result<Vec<Certificate>, SeedingError> {
    let mut certificates = Vec::with_capacity(Event::ALL.len());
    for event in Event::ALL {
        certificates.push(Certificate {
            event,
            file_name: format!("farajaland-{event}-certificate-v1.svg"),
            svg_code: read_certificate(data_dir, event).await?,
        });
    }
    Ok(certificates)
}

pub(crate) async fn certificates_handler(
    State(state): State<Arc<SeedingState>>,
) -> Result<Json<Vec<Certificate>>, AppError> {
    Ok(Json(load_certificates(&state.data.dir).await?))
}

/// Returns the SVG markup as a JSON string.
pub(crate) async fn certificate_handler(
    State(state): State<Arc<SeedingState>>,
    UrlPath(event): UrlPath<String>,
) -> Result<Json<String>, AppError> {
    let event: Event = event.parse()?;
    Ok(Json(read_certificate(&state.data.dir, event).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;

    #[tokio::test]
    async fn bundled_certificates_are_svg() {
        let certificates = load_certificates(&DataConfig::bundled_dir())
            .await
            .expect("certificates load");

        assert_eq!(certificates.len(), 3);
        assert_eq!(certificates[1].file_name, "farajaland-death-certificate-v1.svg");
        assert!(certificates
            .iter()
            .all(|certificate| certificate.svg_code.contains("<svg")));
    }

    #[tokio::test]
    async fn missing_template_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_certificate(dir.path(), Event::Marriage)
            .await
            .expect_err("no template");
        assert!(matches!(err, SeedingError::CertificateNotFound(_)));
    }
}
