//! Per-user liked-band sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{BandName, UserId};

/// The set of band names a user has liked.
///
/// One record exists per user; it is created on the first like. Names are
/// kept in a sorted set so persisted documents are stable, but order carries
/// no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub bands: BTreeSet<BandName>,
}

impl LikeRecord {
    /// An empty record for `user_id`.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            bands: BTreeSet::new(),
        }
    }

    /// Whether `name` is in the liked set.
    pub fn contains(&self, name: &BandName) -> bool {
        self.bands.contains(name)
    }

    /// Flip membership of `name`. Returns `true` when the band is now liked.
    pub fn toggle(&mut self, name: &BandName) -> bool {
        if self.bands.remove(name) {
            false
        } else {
            self.bands.insert(name.clone());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn toggle_twice_restores_record() {
        let mut record = LikeRecord::empty(UserId::random());
        let original = record.clone();
        let abba = BandName::new("ABBA").expect("valid");

        assert!(record.toggle(&abba));
        assert!(record.contains(&abba));
        assert!(!record.toggle(&abba));
        assert_eq!(record, original);
    }

    #[rstest]
    fn deserialises_without_bands_field() {
        let id = UserId::random();
        let record: LikeRecord =
            serde_json::from_value(serde_json::json!({ "userId": id.to_string() }))
                .expect("deserialise");
        assert!(record.bands.is_empty());
    }
}
