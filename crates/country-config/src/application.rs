//! Default application settings handed to the hosting application at startup.

use axum::Json;
use serde::Serialize;

/// Deaths per 1000 population per year, used for completeness estimates.
pub const COUNTRY_WIDE_CRUDE_DEATH_RATE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudeDeathRate {
    pub crude_death_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ApplicationConfig {
    pub application_name: &'static str,
    pub field_agent_audit_locations: &'static str,
    pub declaration_audit_locations: &'static str,
    pub external_validation_workqueue: bool,
    pub birth: BirthSettings,
    pub currency: Currency,
    pub death: EventSettings,
    pub phone_number_pattern: &'static str,
    pub nid_number_pattern: &'static str,
    pub login_background: LoginBackground,
    pub marriage: EventSettings,
    pub marriage_registration: bool,
    pub date_of_birth_unknown: bool,
    pub informant_signature: bool,
    pub informant_signature_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BirthSettings {
    pub registration_target: u32,
    pub late_registration_target: u32,
    pub fee: BirthFees,
    pub print_in_advance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BirthFees {
    pub on_time: f64,
    pub late: f64,
    pub delayed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EventSettings {
    pub registration_target: u32,
    pub fee: EventFees,
    pub print_in_advance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EventFees {
    pub on_time: f64,
    pub delayed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub languages_and_country: Vec<&'static str>,
    pub iso_code: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBackground {
    pub background_color: &'static str,
}

pub fn default_application_config() -> ApplicationConfig {
    ApplicationConfig {
        application_name: "Farajaland CRS",
        field_agent_audit_locations: "DISTRICT",
        declaration_audit_locations: "DISTRICT",
        external_validation_workqueue: false,
        birth: BirthSettings {
            registration_target: 30,
            late_registration_target: 365,
            fee: BirthFees {
                on_time: 0.0,
                late: 5.5,
                delayed: 15.0,
            },
            print_in_advance: true,
        },
        currency: Currency {
            languages_and_country: vec!["en-US"],
            iso_code: "USD",
        },
        death: EventSettings {
            registration_target: 45,
            fee: EventFees {
                on_time: 0.0,
                delayed: 0.0,
            },
            print_in_advance: true,
        },
        phone_number_pattern: "^0(7|9)[0-9]{8}$",
        nid_number_pattern: "^[0-9]{10}$",
        login_background: LoginBackground {
            background_color: "36304E",
        },
        marriage: EventSettings {
            registration_target: 45,
            fee: EventFees {
                on_time: 10.0,
                delayed: 45.0,
            },
            print_in_advance: true,
        },
        marriage_registration: false,
        date_of_birth_unknown: false,
        informant_signature: true,
        informant_signature_required: true,
    }
}

pub async fn application_config_handler() -> Json<ApplicationConfig> {
    Json(default_application_config())
}

pub async fn crude_death_rate_handler() -> Json<CrudeDeathRate> {
    Json(CrudeDeathRate {
        crude_death_rate: COUNTRY_WIDE_CRUDE_DEATH_RATE,
    })
}
