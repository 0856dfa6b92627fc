//! Wire representation of 128-bit amounts
//!
//! JSON numbers cannot carry the full u128 range without precision loss,
//! so amounts cross the call boundary as decimal strings (`U128`).

pub use near_sdk::json_types::U128;

/// `#[serde(with = "u128_dec_format")]` for plain `u128` fields, encoded like `U128`
pub mod u128_dec_format {
    use super::U128;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        U128(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        U128::deserialize(deserializer).map(|v| v.0)
    }
}
