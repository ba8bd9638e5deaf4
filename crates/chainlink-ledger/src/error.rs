/// Errors produced by ledger operations.
///
/// These are argument and I/O errors only. A tampered chain is reported by
/// verification, never through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid payload: missing required field `{field}`")]
    InvalidPayload { field: &'static str },

    #[error("index {index} out of range for chain of length {len}")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("unknown block field `{0}`")]
    UnknownField(String),

    #[error("invalid value for field `{field}`: {reason}")]
    InvalidTamperValue { field: String, reason: String },

    #[error("chain has no blocks; a genesis block is required")]
    EmptyChain,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<chainlink_crypto::HasherError> for LedgerError {
    fn from(err: chainlink_crypto::HasherError) -> Self {
        match err {
            chainlink_crypto::HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
