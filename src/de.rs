use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing field. Discourse sends `null` for a
/// handful of boolean and string fields depending on site settings and plugins.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
