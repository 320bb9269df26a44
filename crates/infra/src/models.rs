use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// Records compare and hash by `id` alone. Two rows with the same id are the
// same record even when their other fields differ.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: i64,
    #[serde(alias = "parent_offering_name")]
    pub category_name: Option<String>,
    #[serde(alias = "offering_description")]
    pub description: Option<String>,
    #[serde(alias = "image_file")]
    pub image: Option<String>,
    #[serde(alias = "offering_name")]
    pub name: Option<String>,
    #[serde(alias = "parent_id")]
    pub parent_id: Option<i64>,
    /// Populated only when the caller selected details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ProductDetailRow>>,
}

impl PartialEq for ProductRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProductRow {}

impl Hash for ProductRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailRow {
    pub id: i64,
    pub description: Option<String>,
    pub display: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub link_caption: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub card: bool,
}

impl PartialEq for ProductDetailRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProductDetailRow {}

impl Hash for ProductDetailRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInstanceRow {
    pub id: i64,
    pub request_id: Option<i64>,
    pub product_id: Option<i64>,
    pub note: Option<String>,
    pub name: Option<String>,
    pub subscribed_date: Option<String>,
}

impl PartialEq for ProductInstanceRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProductInstanceRow {}

impl Hash for ProductInstanceRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
