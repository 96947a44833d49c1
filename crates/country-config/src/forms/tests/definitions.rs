use super::common::*;
use serde_json::json;
use std::collections::HashSet;

use crate::forms::model::Event;
use crate::forms::{all_forms, FormCatalog};

fn catalog() -> FormCatalog {
    FormCatalog::standard().expect("bundled forms load")
}

#[test]
fn bundled_forms_load_under_the_standard_registry() {
    let catalog = catalog();
    for event in Event::ALL {
        assert!(catalog.get(event).is_some(), "missing {event} form");
    }
}

#[test]
fn field_names_are_unique_per_page() {
    for form in all_forms() {
        for section in &form.sections {
            for page in &section.pages {
                let mut seen = HashSet::new();
                for field in &page.fields {
                    assert!(seen.insert(&field.name), "duplicate {} on {}", field.name, page.id);
                }
            }
        }
    }
}

#[test]
fn birth_location_follows_place_of_birth() {
    let catalog = catalog();
    let birth = catalog.get(Event::Birth).expect("birth form");

    let facility = values(json!({ "placeOfBirth": "HEALTH_FACILITY" }));
    let home = values(json!({ "placeOfBirth": "PRIVATE_HOME" }));

    assert_eq!(birth.is_visible("child", "birthLocation", &facility), Some(true));
    assert_eq!(birth.is_visible("child", "birthLocation", &home), Some(false));
    assert_eq!(birth.is_visible("child", "birthLocation", &values(json!({}))), Some(false));
}

#[test]
fn mother_must_be_old_enough() {
    let catalog = catalog();
    let birth = catalog.get(Event::Birth).expect("birth form").clone().as_of(today());

    let report = birth.validate(&values(json!({
        "child": { "childBirthDate": "2024-01-01" },
        "mother": { "motherBirthDate": "2021-01-01" }
    })));

    assert!(report
        .errors
        .iter()
        .any(|error| error.field == "motherBirthDate"
            && error.message.id == "validations.isValidParentsBirthDate"));
}

#[test]
fn other_id_type_is_only_asked_for_other() {
    let catalog = catalog();
    let birth = catalog.get(Event::Birth).expect("birth form");

    let other = values(json!({ "iDType": "OTHER" }));
    let national = values(json!({ "iDType": "NATIONAL_ID" }));

    assert_eq!(birth.is_visible("mother", "iDTypeOther", &other), Some(true));
    assert_eq!(birth.is_visible("mother", "iDTypeOther", &national), Some(false));
    assert_eq!(birth.is_visible("mother", "iD", &national), Some(true));
}

#[test]
fn death_date_must_be_in_the_past() {
    let catalog = catalog();
    let death = catalog.get(Event::Death).expect("death form").clone().as_of(today());

    let outcome = death
        .validate_field("deathEvent", "deathDate", &values(json!({ "deathDate": "2030-01-01" })))
        .expect("known field");

    assert!(!outcome.is_valid());
}

#[test]
fn cause_of_death_details_follow_the_established_flag() {
    let catalog = catalog();
    let death = catalog.get(Event::Death).expect("death form");

    let established = values(json!({ "causeOfDeathEstablished": "true" }));
    let unknown = values(json!({ "causeOfDeathEstablished": "false" }));

    assert_eq!(death.is_visible("deathEvent", "causeOfDeathMethod", &established), Some(true));
    assert_eq!(death.is_visible("deathEvent", "causeOfDeathMethod", &unknown), Some(false));
}

#[test]
fn informant_id_must_differ_from_deceased_id() {
    let catalog = catalog();
    let death = catalog.get(Event::Death).expect("death form").clone().as_of(today());

    let report = death.validate(&values(json!({
        "deceased": { "iDType": "NATIONAL_ID", "deceasedID": "1234567890" },
        "informant": { "informantIdType": "NATIONAL_ID", "informantID": "1234567890" }
    })));

    assert!(report
        .errors
        .iter()
        .any(|error| error.field == "informantID"
            && error.message.id == "validations.duplicateIDNumber"));
}

#[test]
fn spouses_must_be_of_age_on_the_marriage_date() {
    let catalog = catalog();
    let marriage = catalog.get(Event::Marriage).expect("marriage form").clone().as_of(today());

    let declaration = values(json!({
        "bride": { "brideBirthDate": "2008-01-01" },
        "groom": { "groomBirthDate": "1990-01-01" },
        "marriageEvent": { "marriageDate": "2024-01-01" }
    }));
    let report = marriage.validate(&declaration);

    assert!(report
        .errors
        .iter()
        .any(|error| error.field == "marriageDate"
            && error.message.id == "validations.checkMarriageDate"));
}

#[test]
fn witness_other_relationship_is_hidden_unless_other() {
    let catalog = catalog();
    let marriage = catalog.get(Event::Marriage).expect("marriage form");

    let head = values(json!({ "relationship": "headOfGroomFamily" }));
    let other = values(json!({ "relationship": "OTHER" }));

    assert_eq!(marriage.is_visible("witnessOne", "otherRelationship", &head), Some(false));
    assert_eq!(marriage.is_visible("witnessOne", "otherRelationship", &other), Some(true));
}
