use chainlink_types::BlockHash;

/// Domain-separated BLAKE3 hasher for block encodings.
///
/// The domain tag is prepended, followed by `:`, to every input. Changing the
/// canonical encoding means bumping the tag version.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for block canonical encodings.
    pub const BLOCK: Self = Self {
        domain: "chainlink-block-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> BlockHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        BlockHash::from_bytes(*hasher.finalize().as_bytes())
    }
}

/// Errors from producing the bytes to hash.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
