//! Encrypted on-disk snapshot of the token inventory.
//!
//! The cache file holds authenticated-encrypted JSON in the same
//! `base64(iv):base64(ciphertext)` format as the credential blobs. Losing or
//! corrupting it is non-fatal: the synchronizer starts cold and rebuilds the
//! file on the next successful sync.

use crate::crypto;
use crate::inventory::TokenRecord;
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CacheStore {
    path: PathBuf,
    key: SecretString,
}

impl CacheStore {
    #[must_use]
    pub fn new(path: PathBuf, key: SecretString) -> Self {
        Self { path, key }
    }

    /// Serialize, encrypt, and atomically overwrite the cache file: the new
    /// content lands in a sibling temp file first, then renames over the
    /// target so readers never see a partial write.
    ///
    /// # Errors
    /// Returns an error if serialization, encryption, or the file write fails.
    pub fn persist(&self, records: &[TokenRecord]) -> Result<()> {
        let json = serde_json::to_string(records).context("Error serializing token records")?;
        let encrypted = crypto::encrypt(self.key.expose_secret(), &json)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encrypted)
            .with_context(|| format!("Error writing cache file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Error replacing cache file {}", self.path.display()))?;

        debug!(
            "Persisted {} token record(s) to {}",
            records.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Load the cached records, if a readable cache exists. Decryption and
    /// format failures are logged and reported as "no cache" so startup can
    /// proceed cold instead of crashing.
    #[must_use]
    pub fn load(&self) -> Option<Vec<TokenRecord>> {
        let encoded = match fs::read_to_string(&self.path) {
            Ok(encoded) => encoded,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {}", self.path.display());
                return None;
            }
            Err(err) => {
                warn!("Error reading cache file {}: {err}", self.path.display());
                return None;
            }
        };

        let json = match crypto::decrypt(self.key.expose_secret(), encoded.trim()) {
            Ok(json) => json,
            Err(err) => {
                warn!(
                    "Error decrypting cache file {}: {err}. Starting cold.",
                    self.path.display()
                );
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(records) => Some(records),
            Err(err) => {
                warn!(
                    "Error deserializing cache file {}: {err}. Starting cold.",
                    self.path.display()
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("path", &self.path)
            .field("key", &"***")
            .finish()
    }
}
