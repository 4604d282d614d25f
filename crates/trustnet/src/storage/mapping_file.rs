//! Trust mapping persistence.
//!
//! Stores the whole mapping plus the current identity as one JSON
//! file. Identities are serialized as an ordered list of records, not
//! a JSON object, so that per-set insertion order survives a
//! round-trip regardless of how the JSON library orders object keys.
//!
//! File format:
//! ```json
//! {
//!     "version": 1,
//!     "current_identity": "<public key>",
//!     "identities": [
//!         { "identity": "<public key>", "trusted": [ { "name": "...", "public_key": "..." } ] }
//!     ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};
use crate::identity::{Identity, TrustedEntry};
use crate::store::TrustSnapshot;

// ── File format constants ─────────────────────────────────────────────────────

const MAPPING_FILE_VERSION: u32 = 1;
const MAPPING_FILE_NAME: &str = "trust_mapping.json";

// ── On-disk structures ────────────────────────────────────────────────────────

/// Top-level structure written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct TrustMappingFile {
    /// Format version number.
    version: u32,
    /// The identity that was current when the file was written.
    current_identity: Identity,
    /// One record per known identity.
    identities: Vec<IdentityRecord>,
}

/// One identity's trust set, in insertion order.
#[derive(Debug, Serialize, Deserialize)]
struct IdentityRecord {
    identity: Identity,
    trusted: Vec<TrustedEntry>,
}

/// Mapping state reloaded from disk, ready to seed a
/// [`TrustStore`](crate::store::TrustStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMapping {
    /// The identity to restore as current.
    pub current: Identity,
    /// Every identity's trust set.
    pub mapping: BTreeMap<Identity, Vec<TrustedEntry>>,
}

// ── MappingStore ──────────────────────────────────────────────────────────────

/// Filesystem-backed store for the trust mapping.
pub struct MappingStore {
    base_dir: PathBuf,
}

impl MappingStore {
    /// Create a `MappingStore` rooted at `base_dir`, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` if the directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Whether a mapping file exists.
    pub fn exists(&self) -> bool {
        self.file_path().exists()
    }

    /// Persist a snapshot's mapping and current identity.
    ///
    /// The file is written atomically: serialized JSON goes to a
    /// temporary file in the same directory and is then renamed, so a
    /// concurrent reader never sees a partial write.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::SerializationError` if serialization
    /// fails, or `TrustError::Io` for filesystem errors.
    pub fn save(&self, snapshot: &TrustSnapshot) -> Result<()> {
        let file = TrustMappingFile {
            version: MAPPING_FILE_VERSION,
            current_identity: snapshot.current.clone(),
            identities: snapshot
                .mapping
                .iter()
                .map(|(identity, trusted)| IdentityRecord {
                    identity: identity.clone(),
                    trusted: trusted.clone(),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| TrustError::SerializationError(e.to_string()))?;

        let path = self.file_path();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes())?;
        std::fs::rename(&tmp, &path)?;

        log::debug!(
            "persisted trust mapping at version {} ({} identities)",
            snapshot.version,
            snapshot.mapping.len()
        );
        Ok(())
    }

    /// Load the persisted mapping.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::NotFound` if no mapping file exists,
    /// `TrustError::InvalidFileFormat` for malformed or
    /// wrong-version files, or `TrustError::Io` for filesystem errors.
    pub fn load(&self) -> Result<PersistedMapping> {
        let path = self.file_path();

        if !path.exists() {
            return Err(TrustError::NotFound(format!(
                "no trust mapping file at {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(&path)?;
        let file: TrustMappingFile = serde_json::from_slice(&bytes).map_err(|e| {
            TrustError::InvalidFileFormat(format!(
                "failed to parse trust mapping file {}: {e}",
                path.display()
            ))
        })?;

        if file.version != MAPPING_FILE_VERSION {
            return Err(TrustError::InvalidFileFormat(format!(
                "unsupported trust mapping version {}",
                file.version
            )));
        }

        let mut mapping = BTreeMap::new();
        for record in file.identities {
            // Duplicate identity records would silently merge; the last
            // record wins, matching write behaviour (one record each).
            mapping.insert(record.identity, record.trusted);
        }

        Ok(PersistedMapping {
            current: file.current_identity,
            mapping,
        })
    }

    /// Build the mapping file path: `{base_dir}/trust_mapping.json`.
    fn file_path(&self) -> PathBuf {
        self.base_dir.join(MAPPING_FILE_NAME)
    }
}
