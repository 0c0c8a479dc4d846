//! Serializer Module
//!
//! The encoding boundary between in-memory values and the bytes both tiers
//! store. The codec never interprets those bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

// == Serializer Trait ==
/// Turns values into bytes and back.
///
/// Implementations must round-trip: `decode(encode(v))` reproduces `v`. An
/// encoding must never be empty for a real value, since zero-length bytes mark
/// a cached "no value".
pub trait Serializer: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, Self::Error>
    where
        T: Serialize + ?Sized;

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, Self::Error>
    where
        T: DeserializeOwned;
}

// == JSON Serializer ==
/// Default serializer backed by serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    type Error = serde_json::Error;

    fn encode<T>(&self, value: &T) -> Result<Vec<u8>, Self::Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_vec(value)
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, Self::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Object {
        text: String,
        num: i64,
    }

    #[test]
    fn test_json_round_trip() {
        let obj = Object {
            text: "mystring".to_string(),
            num: 42,
        };

        let bytes = JsonSerializer.encode(&obj).unwrap();
        let decoded: Object = JsonSerializer.decode(&bytes).unwrap();

        assert_eq!(decoded, obj);
    }

    #[test]
    fn test_json_never_encodes_empty() {
        assert!(!JsonSerializer.encode(&()).unwrap().is_empty());
        assert!(!JsonSerializer.encode("").unwrap().is_empty());
    }

    #[test]
    fn test_json_decode_garbage_fails() {
        let result: Result<Object, _> = JsonSerializer.decode(b"\xff\x00not json");
        assert!(result.is_err());
    }
}
