//! Serde helpers for model fields
//!
//! Older documents written by the mobile app may carry `null` where a
//! boolean is expected; these deserializers pick the documented default.

use serde::{Deserialize, Deserializer};

/// Deserialize a bool, treating missing/null as `true`
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Deserialize a bool, treating missing/null as `false`
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
