//! Collection records.

use serde::{Deserialize, Serialize};

use atelier_core::CollectionId;

/// A named grouping of products shown on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
