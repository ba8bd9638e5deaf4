use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Length in bytes of every block digest.
pub const DIGEST_LEN: usize = 32;

/// Fixed-length digest committing to a block's canonical encoding.
///
/// Serialized as 64 lowercase hex characters so that snapshot files and the
/// canonical encoding stay human-readable. The all-zero value is reserved as
/// the genesis sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; DIGEST_LEN]);

impl BlockHash {
    /// The genesis sentinel (all zeros).
    pub const ZERO: Self = Self([0u8; DIGEST_LEN]);

    /// Wrap a pre-computed digest.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns `true` if this is the genesis sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Leading `chars` hex characters, clamped to the full digest width.
    pub fn preview(&self, chars: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(chars.min(DIGEST_LEN * 2));
        hex
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s.trim()).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Default for BlockHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.short_hex())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for BlockHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; DIGEST_LEN]> for BlockHash {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_sentinel() {
        assert!(BlockHash::ZERO.is_zero());
        assert_eq!(BlockHash::default(), BlockHash::ZERO);
        assert!(!BlockHash::from_bytes([1; 32]).is_zero());
    }

    #[test]
    fn hex_roundtrip() {
        let hash = BlockHash::from_bytes([0xab; 32]);
        let parsed: BlockHash = hash.to_hex().parse().unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = BlockHash::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            BlockHash::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn preview_is_clamped() {
        let hash = BlockHash::from_bytes([0x12; 32]);
        assert_eq!(hash.preview(16), "1212121212121212");
        assert_eq!(hash.preview(500).len(), 64);
        assert_eq!(hash.short_hex(), "12121212");
    }

    #[test]
    fn serializes_as_hex_string() {
        let hash = BlockHash::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let parsed: BlockHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn debug_is_short() {
        let hash = BlockHash::from_bytes([0xff; 32]);
        assert_eq!(format!("{hash:?}"), "BlockHash(ffffffff)");
    }
}
