use serde::{Deserialize, Serialize};

/// A physical stop location as published by the points catalog. Two stops
/// can share a `name` while representing opposite travel directions at the
/// same platform; `id` and `direction` are what actually distinguish them.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub direction: String,
    pub is_live: bool,
}

impl Stop {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
