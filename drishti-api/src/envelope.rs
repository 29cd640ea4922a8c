//! Unwrapping of `{ "<key>": payload }` response bodies.

use drishti_core::CoreError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Takes `key` out of a response object and decodes it.
pub(crate) fn take<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, CoreError> {
    let payload = body
        .get_mut(key)
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| CoreError::InvalidData(format!("response missing `{key}`")))?;
    Ok(serde_json::from_value(payload)?)
}
