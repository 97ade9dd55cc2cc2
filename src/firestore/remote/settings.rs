use serde::Deserialize;

use crate::firestore::constants::DEFAULT_LISTEN_TARGET_ID;
use crate::firestore::core::{OrderBy, OrderDirection, OrderSpec};
use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::model::FieldPath;

/// One `orderBy` entry as it appears in a structured query.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OrderByConfig {
    pub field: String,
    #[serde(default)]
    pub direction: OrderDirection,
}

/// Options for a [`QueryListener`](crate::firestore::remote::QueryListener).
///
/// Deserializes from camelCase JSON; missing keys take their defaults:
///
/// ```json
/// { "targetId": 66, "snapshotOnNoChange": true,
///   "orderBy": [{ "field": "population", "direction": "DESCENDING" }] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryListenerSettings {
    /// Target id sent when (re)opening the listen target.
    pub target_id: i32,
    /// Emit a snapshot on a `NO_CHANGE` target change when documents are staged.
    pub snapshot_on_no_change: bool,
    pub order_by: Vec<OrderByConfig>,
}

impl Default for QueryListenerSettings {
    fn default() -> Self {
        Self {
            target_id: DEFAULT_LISTEN_TARGET_ID,
            snapshot_on_no_change: true,
            order_by: Vec::new(),
        }
    }
}

impl QueryListenerSettings {
    pub fn from_json_str(json: &str) -> FirestoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| invalid_argument(format!("Invalid listener settings: {err}")))
    }

    /// Validated ordering built from `order_by`.
    pub fn order_spec(&self) -> FirestoreResult<OrderSpec> {
        let clauses = self
            .order_by
            .iter()
            .map(|entry| {
                Ok(OrderBy::new(
                    FieldPath::from_dot_separated(&entry.field)?,
                    entry.direction,
                ))
            })
            .collect::<FirestoreResult<Vec<_>>>()?;
        OrderSpec::new(clauses)
    }
}
