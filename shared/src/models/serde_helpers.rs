//! Common serde helpers
//!
//! Partial updates must keep "field absent" and "field: null" distinct:
//! absent leaves the stored value unchanged, null clears it. A plain
//! `Option<T>` collapses both into `None`, so update payloads use
//! `Option<Option<T>>` with [`double_option`] — `None` = absent,
//! `Some(None)` = explicit null, `Some(Some(v))` = new value.

use serde::{Deserialize, Deserializer};

/// Deserializer for `Option<Option<T>>` patch fields.
///
/// Must be combined with `#[serde(default)]` so an absent key stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize bool that treats null as true
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}
