//! Serde implementations for tideline-types.
//!
//! Addresses serialize as their Bech32m display string so JSON payloads stay
//! human-readable and re-parseable.

use crate::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_serde_roundtrip() {
        let addr = Address::from_bytes([0x11u8; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.contains("tide1"));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn test_address_deserialize_hex() {
        let addr: Address = serde_json::from_str("\"0x0101010101010101010101010101010101010101\"").unwrap();
        assert_eq!(addr, Address::from_bytes([1u8; 20]));
    }
}
