//! Salon Info Model (singleton)

use super::serde_thing;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

/// Salon information (singleton document)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalonInfo {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    /// Logo URL returned by the upload endpoint
    pub logo_url: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
}

/// Update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SalonInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}
