//! SD-JWT VC payload issued for a registered birth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sex as an ISO/IEC 5218 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Sex {
    NotKnown,
    Male,
    Female,
    NotApplicable,
}

impl From<Sex> for u8 {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::NotKnown => 0,
            Sex::Male => 1,
            Sex::Female => 2,
            Sex::NotApplicable => 9,
        }
    }
}

impl TryFrom<u8> for Sex {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Sex::NotKnown),
            1 => Ok(Sex::Male),
            2 => Ok(Sex::Female),
            9 => Ok(Sex::NotApplicable),
            other => Err(format!("{other} is not an ISO/IEC 5218 sex code")),
        }
    }
}

impl Sex {
    /// Maps the form's gender option; anything unrecognised is "not known".
    pub fn from_gender(gender: &str) -> Self {
        match gender {
            "male" => Sex::Male,
            "female" => Sex::Female,
            _ => Sex::NotKnown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOfBirth {
    pub name: String,
    /// ISO 3166-1 alpha-3.
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub nationalities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthCredentialData {
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub family_name: String,
    pub birthdate: NaiveDate,
    pub place_of_birth: PlaceOfBirth,
    pub nationalities: Vec<String>,
    pub sex: Sex,
    /// Mother first, then father.
    pub parents: Vec<Parent>,
}
