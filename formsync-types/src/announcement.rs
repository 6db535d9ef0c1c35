//! The message exchanged between contexts after a record is saved.

use crate::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// "Entity `id` was updated at `ts`."
///
/// Serialized as `{"id": <int>, "ts": <int>}` with no envelope or version
/// field, so any two builds that agree on the channel name interoperate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpdateAnnouncement {
    pub id: EntityId,
    pub ts: Timestamp,
}

impl UpdateAnnouncement {
    /// Creates an announcement stamped with the current time.
    #[must_use]
    pub fn now(id: EntityId) -> Self {
        Self {
            id,
            ts: Timestamp::now(),
        }
    }

    #[must_use]
    pub const fn new(id: EntityId, ts: Timestamp) -> Self {
        Self { id, ts }
    }

    /// Whether this announcement concerns `entity`.
    #[must_use]
    pub fn is_for(&self, entity: EntityId) -> bool {
        self.id == entity
    }

    /// Encodes to the JSON wire form.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes from the JSON wire form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
