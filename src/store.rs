//! JSON persistence for the contact list.
//!
//! The canonical file lives at `<data_dir>/contacts.json`. Loading it is
//! forgiving so the app always starts; saving, importing and exporting are
//! user actions and report every failure.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Config, CONTACTS_FILE_NAME};
use crate::core::contact::Contact;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid contacts file {}: {source}", path.display())]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What `ContactFile::load` found on disk.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Contact>),
    /// Nothing saved yet.
    Missing,
    /// The file could not be read or parsed; treated as empty.
    Recovered(StoreError),
}

impl LoadOutcome {
    pub fn contacts(&self) -> &[Contact] {
        match self {
            Self::Loaded(contacts) => contacts,
            Self::Missing | Self::Recovered(_) => &[],
        }
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        match self {
            Self::Loaded(contacts) => contacts,
            Self::Missing | Self::Recovered(_) => Vec::new(),
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Gateway to the canonical contacts file and to import/export files.
#[derive(Debug, Clone)]
pub struct ContactFile {
    data_dir: PathBuf,
}

impl ContactFile {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.data_directory.clone())
    }

    /// Path of the canonical file. Creates the data directory if needed.
    pub fn resolve_canonical_path(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(self.data_dir.join(CONTACTS_FILE_NAME))
    }

    pub fn load(&self) -> LoadOutcome {
        let path = match self.resolve_canonical_path() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Cannot prepare data directory {}: {}", self.data_dir.display(), e);
                return LoadOutcome::Recovered(StoreError::io(&self.data_dir, e));
            }
        };

        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                log::info!("No contacts file at {}, starting empty", path.display());
                return LoadOutcome::Missing;
            }
            Err(e) => {
                log::warn!("Cannot check contacts file {}: {}", path.display(), e);
                return LoadOutcome::Recovered(StoreError::io(&path, e));
            }
        }

        match read_contacts(&path) {
            Ok(contacts) => {
                log::info!("Loaded {} contacts from {}", contacts.len(), path.display());
                LoadOutcome::Loaded(contacts)
            }
            Err(e) => {
                log::warn!("Ignoring unreadable contacts file: {}", e);
                LoadOutcome::Recovered(e)
            }
        }
    }

    pub fn save(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let path = self
            .resolve_canonical_path()
            .map_err(|e| StoreError::io(&self.data_dir, e))?;
        write_contacts(&path, contacts)?;
        log::info!("Saved {} contacts to {}", contacts.len(), path.display());
        Ok(())
    }

    pub fn import_from(&self, path: &Path) -> Result<Vec<Contact>, StoreError> {
        if !path.try_exists().map_err(|e| StoreError::io(path, e))? {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contacts = read_contacts(path)?;
        log::info!("Read {} contacts from {}", contacts.len(), path.display());
        Ok(contacts)
    }

    pub fn export_to(&self, path: &Path, contacts: &[Contact]) -> Result<(), StoreError> {
        write_contacts(path, contacts)?;
        log::info!("Exported {} contacts to {}", contacts.len(), path.display());
        Ok(())
    }
}

fn read_contacts(path: &Path) -> Result<Vec<Contact>, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    // A bare `null` document is an empty list.
    let contacts: Option<Vec<Contact>> =
        serde_json::from_str(&content).map_err(|source| StoreError::InvalidFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contacts.unwrap_or_default())
}

fn write_contacts(path: &Path, contacts: &[Contact]) -> Result<(), StoreError> {
    let mut json =
        serde_json::to_string_pretty(contacts).map_err(|source| StoreError::InvalidFormat {
            path: path.to_path_buf(),
            source,
        })?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| StoreError::io(path, e))
}
