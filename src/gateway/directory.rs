use std::collections::HashSet;

use crate::consts::consts::{PersonId, KNOWN_PERSON_IDS};

/// Read-only lookup collaborator used for existence checks. Injected into the
/// gateway so identity checks are testable without global state.
pub trait PersonDirectory: Send + Sync {
    fn contains(&self, id: PersonId) -> bool;
}

/// Directory backed by a fixed id set, simulating "existing records".
pub struct FixedPersonDirectory {
    ids: HashSet<i64>,
}

impl FixedPersonDirectory {
    pub fn with_known_ids() -> Self {
        FixedPersonDirectory {
            ids: KNOWN_PERSON_IDS.into_iter().collect(),
        }
    }

    #[cfg(test)]
    pub fn with_ids(ids: &[i64]) -> Self {
        FixedPersonDirectory {
            ids: ids.iter().copied().collect(),
        }
    }
}

impl PersonDirectory for FixedPersonDirectory {
    fn contains(&self, id: PersonId) -> bool {
        self.ids.contains(&id.to_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_are_one_through_five() {
        let directory = FixedPersonDirectory::with_known_ids();

        for id in 1..=5 {
            assert!(directory.contains(PersonId(id)));
        }

        assert!(!directory.contains(PersonId(6)));
        assert!(!directory.contains(PersonId(99)));
    }
}
