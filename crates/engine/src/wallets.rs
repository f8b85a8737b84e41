//! Known-wallet labels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};
use witwhalert_core::Address;

#[derive(Error, Debug)]
pub enum WalletTableError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Address -> label table, read from a JSON object on first lookup.
///
/// A missing or unreadable source only disables enrichment.
#[derive(Debug, Default)]
pub struct KnownWalletTable {
    source: Option<PathBuf>,
    labels: OnceLock<HashMap<Address, String>>,
}

impl KnownWalletTable {
    /// Table backed by a JSON file, loaded lazily.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            labels: OnceLock::new(),
        }
    }

    /// Table with no source; never matches.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Table with labels already in memory.
    pub fn from_labels(labels: HashMap<Address, String>) -> Self {
        let table = Self::default();
        let _ = table.labels.set(labels);
        table
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some() || self.labels.get().is_some()
    }

    /// Label for `address`, if known.
    pub fn label(&self, address: &Address) -> Option<&str> {
        self.labels().get(address).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    fn labels(&self) -> &HashMap<Address, String> {
        self.labels.get_or_init(|| match &self.source {
            None => HashMap::new(),
            Some(path) => match load_labels(path) {
                Ok(labels) => {
                    info!(path = %path.display(), count = labels.len(), "Known wallets loaded");
                    labels
                }
                Err(e) => {
                    warn!(error = %e, "Known wallets unavailable, enrichment disabled");
                    HashMap::new()
                }
            },
        })
    }
}

/// Read a JSON object of address -> label.
pub fn load_labels(path: &Path) -> Result<HashMap<Address, String>, WalletTableError> {
    let raw = std::fs::read_to_string(path).map_err(|source| WalletTableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| WalletTableError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
