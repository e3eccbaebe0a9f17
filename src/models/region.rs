use serde::{Deserialize, Serialize};

/// Administrative subdivision that scopes every analytics query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub region_id: String,
    pub name: String,
}
