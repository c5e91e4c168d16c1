//! JSON file contact store.
//!
//! # Responsibility
//! - Read and rewrite one JSON array file holding the contact collection.
//! - Apply load-time migration before records reach callers.
//!
//! # Invariants
//! - A missing file loads as an empty collection.
//! - A malformed file is a hard error; nothing is partially recovered.
//! - Saves are full rewrites with no atomicity guarantee.

use super::migration::{migrate_records, StoredContact};
use super::{ContactStore, StoreError, StoreResult};
use crate::model::contact::Contact;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const JSON_INDENT: &[u8] = b"    ";

/// Contact store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for `path`. The file is not touched until load/save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ContactStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<Contact>> {
        let started_at = Instant::now();

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=contacts_load module=store status=ok source=missing count=0 duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=contacts_load module=store status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let records: Vec<StoredContact> = serde_json::from_str(&raw).map_err(|source| {
            error!(
                "event=contacts_load module=store status=error error_code=malformed line={} column={}",
                source.line(),
                source.column()
            );
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        let migrated = migrate_records(records);
        if migrated.defaulted_categories > 0 {
            warn!(
                "event=contacts_migrate module=store status=ok defaulted_category={}",
                migrated.defaulted_categories
            );
        }
        info!(
            "event=contacts_load module=store status=ok source=file count={} duration_ms={}",
            migrated.contacts.len(),
            started_at.elapsed().as_millis()
        );

        Ok(migrated.contacts)
    }

    fn save(&self, contacts: &[Contact]) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded = encode_contacts(contacts)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        if let Err(err) = std::fs::write(&self.path, encoded) {
            error!(
                "event=contacts_save module=store status=error error_code=write_failed count={} error={}",
                contacts.len(),
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=contacts_save module=store status=ok count={} duration_ms={}",
            contacts.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn encode_contacts(contacts: &[Contact]) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    contacts
        .serialize(&mut serializer)
        .map_err(StoreError::Encode)?;
    buffer.push(b'\n');
    Ok(buffer)
}
