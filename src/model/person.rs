use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::location::LocationRecord;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HairColor {
    White,
    Brown,
    Black,
    Blonde,
    Red,
}

/// The write-side shape of a person. Carries the secrets (`password`,
/// `payment_card_number`) that must never appear on a read, so it is only
/// ever deserialized from request bodies and projected before echoing back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub hair_color: Option<HairColor>,
    pub is_married: Option<bool>,
    pub email: Option<String>,
    pub website_url: Option<String>,
    pub password: String,
    pub payment_card_number: Option<String>,
}

/// Externally visible projection of a person record. Structurally a
/// `PersonRecord` minus the sensitive fields, nothing else changes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonPublicView {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub hair_color: Option<HairColor>,
    pub is_married: Option<bool>,
    pub email: Option<String>,
    pub website_url: Option<String>,
}

impl PersonPublicView {
    pub fn from_record(record: &PersonRecord) -> Self {
        PersonPublicView {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            age: record.age,
            hair_color: record.hair_color,
            is_married: record.is_married,
            email: record.email.clone(),
            website_url: record.website_url.clone(),
        }
    }
}

/// Union of a full person record and a location, as returned by an update.
/// Carries every field from both inputs, secrets included; the update route
/// answers 204 so this shape never serializes onto an HTTP response. The two
/// key sets are disjoint so flattening cannot collide.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MergedPerson {
    #[serde(flatten)]
    pub person: PersonRecord,
    #[serde(flatten)]
    pub location: Option<LocationRecord>,
}

#[cfg(test)]
impl PersonRecord {
    pub fn new_test() -> Self {
        PersonRecord {
            first_name: "Michelle".to_string(),
            last_name: "Duque".to_string(),
            age: 27,
            hair_color: Some(HairColor::Black),
            is_married: Some(false),
            email: Some("michelle@gmail.com".to_string()),
            website_url: Some("https://twitter.com/home".to_string()),
            password: "hunter2hunter2".to_string(),
            payment_card_number: Some("4539148803436467".to_string()),
        }
    }
}
