//! Pluggable encode/decode hooks.
//!
//! A [`Codec`] is the pair of functions applied around every filesystem
//! write and read. It is fixed at construction time; callers needing a
//! custom on-disk representation pass their own pair via [`Codec::new`].

use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::error::Result;

type EncodeFn = dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync;
type DecodeFn = dyn Fn(&[u8]) -> Result<Value> + Send + Sync;

/// Encode/decode function pair converting between in-memory values and
/// on-disk bytes.
pub struct Codec {
    encode: Box<EncodeFn>,
    decode: Box<DecodeFn>,
}

impl Codec {
    /// Build a codec from caller-supplied hooks.
    pub fn new(
        encode: impl Fn(&Value) -> Result<Vec<u8>> + Send + Sync + 'static,
        decode: impl Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            encode: Box::new(encode),
            decode: Box::new(decode),
        }
    }

    /// The default JSON codec.
    ///
    /// Decoding is lenient: content that fails to parse is logged and
    /// returned as a string value holding the raw file contents, so a read
    /// never fails on malformed data. Use [`Codec::strict_json`] to surface
    /// such failures instead.
    #[must_use]
    pub fn json() -> Self {
        Self::new(
            |value| Ok(serde_json::to_vec(value)?),
            |raw| match serde_json::from_slice(raw) {
                Ok(value) => Ok(value),
                Err(error) => {
                    warn!(error = %error, "Failed to decode stored value, returning raw contents");
                    Ok(Value::String(String::from_utf8_lossy(raw).into_owned()))
                }
            },
        )
    }

    /// JSON codec that fails the whole read when stored content is
    /// malformed.
    #[must_use]
    pub fn strict_json() -> Self {
        Self::new(
            |value| Ok(serde_json::to_vec(value)?),
            |raw| Ok(serde_json::from_slice(raw)?),
        )
    }

    /// Apply the encode hook.
    ///
    /// # Errors
    /// Returns whatever error the configured hook reports.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        (self.encode)(value)
    }

    /// Apply the decode hook.
    ///
    /// # Errors
    /// Returns whatever error the configured hook reports; the default
    /// lenient codec never errors.
    pub fn decode(&self, raw: &[u8]) -> Result<Value> {
        (self.decode)(raw)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::json()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let codec = Codec::json();
        let value = json!({"total": 42, "tags": ["a", "b"]});

        let raw = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&raw).unwrap(), value);
    }

    #[test]
    fn test_lenient_decode_passes_raw_through() {
        let codec = Codec::json();

        let decoded = codec.decode(b"not json at all").unwrap();
        assert_eq!(decoded, Value::String("not json at all".to_string()));
    }

    #[test]
    fn test_strict_decode_fails_on_malformed_content() {
        let codec = Codec::strict_json();

        let result = codec.decode(b"not json at all");
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn test_custom_hooks() {
        // Tag the payload so the pair only round-trips through itself.
        let codec = Codec::new(
            |value| {
                let mut raw = b"v1:".to_vec();
                raw.extend(serde_json::to_vec(value)?);
                Ok(raw)
            },
            |raw| {
                let payload = raw
                    .strip_prefix(b"v1:")
                    .ok_or_else(|| StoreError::Codec("missing v1 header".to_string()))?;
                Ok(serde_json::from_slice(payload)?)
            },
        );

        let value = json!(["x", "y"]);
        let raw = codec.encode(&value).unwrap();
        assert!(raw.starts_with(b"v1:"));
        assert_eq!(codec.decode(&raw).unwrap(), value);

        let result = codec.decode(b"{}");
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }
}
