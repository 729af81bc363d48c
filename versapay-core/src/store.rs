//! Key-value persistence for the ledger.
//!
//! # Key namespace
//!
//! ```text
//! versaPayDB          organization directory   { organizations: [...] }
//! org_<orgId>         one dataset per org      { employees, settings, payrollHistory }
//! versaPaySession     active session pointer   bare organization id
//! ```
//!
//! # Storage layout ([`FileStorage`])
//!
//! ```text
//! ~/.versapay/
//!   store/
//!     versaPayDB        (mode 0600)
//!     org_org_<ms>      (mode 0600)
//!     versaPaySession   (mode 0600)
//! ```
//!
//! Every filesystem entry point has an `_at(home: &Path)` form; tests must use
//! it with a `TempDir` and never the no-arg wrappers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{io_err, StoreError};
use crate::types::{Directory, OrganizationDataset, OrganizationId};

pub const DIRECTORY_KEY: &str = "versaPayDB";
pub const SESSION_KEY: &str = "versaPaySession";

/// Key under which an organization's dataset is stored.
pub fn dataset_key(org: &OrganizationId) -> String {
    format!("org_{}", org.0)
}

// ---------------------------------------------------------------------------
// 1. Storage backends
// ---------------------------------------------------------------------------

/// Raw string key-value storage. Last write wins; there are no transactions.
pub trait Storage {
    /// Returns `None` when the key has never been written or was removed.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage, for tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under `<home>/.versapay/store/`.
///
/// Write flow: value → `<key>.tmp` sibling → `chmod 0600` → `rename`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating with mode `0700` if needed) the store rooted at `home`.
    pub fn open_at(home: &Path) -> Result<Self, StoreError> {
        let dir = store_dir_at(home);
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
            set_dir_permissions(&dir)?;
        }
        Ok(Self { dir })
    }

    /// `open_at` convenience wrapper using `dirs::home_dir()`.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(&home()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| io_err(&path, e))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_file_name(format!("{key}.tmp"));
        std::fs::write(&tmp_path, value).map_err(|e| io_err(&tmp_path, e))?;
        set_file_permissions(&tmp_path)?;
        std::fs::rename(&tmp_path, &path).map_err(|e| io_err(&path, e))?;
        tracing::debug!(key, "stored");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.versapay/`
pub fn versapay_root(home: &Path) -> PathBuf {
    home.join(".versapay")
}

/// `<home>/.versapay/store/`
pub fn store_dir_at(home: &Path) -> PathBuf {
    versapay_root(home).join("store")
}

/// `<home>/.versapay/templates/`, where payslip template overrides live.
pub fn templates_dir_at(home: &Path) -> PathBuf {
    versapay_root(home).join("templates")
}

/// Resolves the user's home directory.
pub fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// 3. Typed store
// ---------------------------------------------------------------------------

/// Typed access to the three record kinds over any [`Storage`].
///
/// Absent or malformed directory and dataset records load as empty/default
/// values; the corruption is logged and never surfaced.
#[derive(Debug)]
pub struct Store<S> {
    storage: S,
}

impl<S: Storage> Store<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    pub fn load_directory(&self) -> Result<Directory, StoreError> {
        let Some(raw) = self.storage.load(DIRECTORY_KEY)? else {
            return Ok(Directory::default());
        };
        match serde_json::from_str(&raw) {
            Ok(dir) => Ok(dir),
            Err(err) => {
                tracing::warn!(key = DIRECTORY_KEY, error = %err, "malformed directory, starting empty");
                Ok(Directory::default())
            }
        }
    }

    pub fn save_directory(&mut self, directory: &Directory) -> Result<(), StoreError> {
        let json = serde_json::to_string(directory)?;
        self.storage.save(DIRECTORY_KEY, &json)
    }

    pub fn load_dataset(&self, org: &OrganizationId) -> Result<OrganizationDataset, StoreError> {
        let key = dataset_key(org);
        let Some(raw) = self.storage.load(&key)? else {
            tracing::warn!(key = %key, "dataset missing, using defaults");
            return Ok(OrganizationDataset::default());
        };
        match serde_json::from_str(&raw) {
            Ok(dataset) => Ok(dataset),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "malformed dataset, using defaults");
                Ok(OrganizationDataset::default())
            }
        }
    }

    pub fn save_dataset(
        &mut self,
        org: &OrganizationId,
        dataset: &OrganizationDataset,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(dataset)?;
        self.storage.save(&dataset_key(org), &json)
    }

    /// The organization id of the active session, if any.
    pub fn session_pointer(&self) -> Result<Option<OrganizationId>, StoreError> {
        Ok(self
            .storage
            .load(SESSION_KEY)?
            .map(|raw| raw.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(OrganizationId::from))
    }

    pub fn set_session_pointer(&mut self, org: &OrganizationId) -> Result<(), StoreError> {
        self.storage.save(SESSION_KEY, org.as_str())
    }

    pub fn clear_session_pointer(&mut self) -> Result<(), StoreError> {
        self.storage.remove(SESSION_KEY)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
