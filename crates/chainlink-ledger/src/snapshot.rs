//! Chain snapshot files.
//!
//! A snapshot is a pretty-printed JSON array of blocks, each in canonical field
//! order followed by its stored `hash`. Loading restores blocks exactly as
//! written; call [`Chain::verify`] to check them.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::block::Block;
use crate::chain::Chain;
use crate::error::LedgerError;

/// Write `chain` to `path`, replacing any existing file atomically.
pub fn save(path: &Path, chain: &Chain) -> Result<(), LedgerError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(chain.blocks())
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(path).map_err(|e| LedgerError::Io(e.error.to_string()))?;

    debug!(path = %path.display(), blocks = chain.len(), "chain saved");
    Ok(())
}

/// Read a chain from `path`. Hashes are taken as stored.
pub fn load(path: &Path) -> Result<Chain, LedgerError> {
    let data = fs::read_to_string(path)?;
    let blocks: Vec<Block> =
        serde_json::from_str(&data).map_err(|e| LedgerError::Serialization(e.to_string()))?;
    let chain = Chain::from_blocks(blocks)?;
    info!(path = %path.display(), blocks = chain.len(), "chain loaded");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use chainlink_crypto::FailureReason;
    use chainlink_types::OrderEvent;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::tamper::BlockField;

    fn chain() -> Chain {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut chain = Chain::initialize_at(t0);
        chain
            .append(
                OrderEvent::new("12345", "Warehouse A", "alice", "received")
                    .at(t0)
                    .with_detail("customer", "Ana"),
            )
            .unwrap();
        chain
            .append(OrderEvent::new("12345", "Warehouse B", "bob", "shipped"))
            .unwrap();
        chain
    }

    #[test]
    fn save_then_load_preserves_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chain.json");
        let original = chain();

        save(&path, &original).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, original);
        assert!(loaded.is_valid());
    }

    #[test]
    fn tampering_survives_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let mut tampered = chain();
        tampered.tamper(1, BlockField::Location, "Warehouse X").unwrap();

        save(&path, &tampered).unwrap();
        let report = load(&path).unwrap().report();
        assert_eq!(report.first_failure, Some(1));
        assert_eq!(report.checks[2].reason, Some(FailureReason::LinkMismatch));
    }

    #[test]
    fn editing_the_file_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        save(&path, &chain()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("Warehouse B", "Warehouse Z")).unwrap();

        let report = load(&path).unwrap().report();
        assert_eq!(report.first_failure, Some(2));
    }

    #[test]
    fn empty_array_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, "[]").unwrap();
        assert_eq!(load(&path).unwrap_err(), LedgerError::EmptyChain);
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path), Err(LedgerError::Serialization(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("absent.json")),
            Err(LedgerError::Io(_))
        ));
    }
}
