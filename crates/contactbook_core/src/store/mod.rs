//! Contact persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract used by record operations.
//! - Keep on-disk representation details out of the service layer.
//!
//! # Invariants
//! - `load` returns records already passed through [`migration`].
//! - `save` always rewrites the full collection.

use crate::model::contact::Contact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
pub mod migration;

pub use json_file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error for contact load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Filesystem read/write failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File exists but is not a well-formed contact list.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Collection could not be encoded.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "contact file `{}` i/o failure: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "contact file `{}` is malformed: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode contacts: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Full-collection storage for contacts.
pub trait ContactStore {
    /// Loads every stored contact in insertion order.
    ///
    /// Missing storage is an empty collection, not an error.
    fn load(&self) -> StoreResult<Vec<Contact>>;
    /// Overwrites storage with `contacts`.
    fn save(&self, contacts: &[Contact]) -> StoreResult<()>;
}
