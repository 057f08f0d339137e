use std::fmt;

use serde::{Deserialize, Serialize};

// Field constraint bounds, shared between the models and the rule engine
pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 50;
pub const AGE_UPPER_BOUND: i64 = 115;
pub const LOCATION_FIELD_MAX_CHARS: usize = 115;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const CONTACT_MESSAGE_MIN_CHARS: usize = 20;

/// The fixed set of person ids the directory recognises. Stands in for a
/// datastore, existence checks succeed only for these ids.
pub const KNOWN_PERSON_IDS: [i64; 5] = [1, 2, 3, 4, 5];

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd)]
pub struct PersonId(pub i64);

impl PersonId {
    pub fn to_number(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub enum PersonIdRangeError {
    NegativeOrZero(i64),
}

impl TryFrom<i64> for PersonId {
    type Error = PersonIdRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(PersonIdRangeError::NegativeOrZero(value));
        }

        Ok(PersonId(value))
    }
}
