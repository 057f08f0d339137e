use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocationRecord {
    pub city: String,
    pub state: String,
    pub country: String,
}

#[cfg(test)]
impl LocationRecord {
    pub fn new_test() -> Self {
        LocationRecord {
            city: "Medellin".to_string(),
            state: "Antioquia".to_string(),
            country: "Colombia".to_string(),
        }
    }
}
