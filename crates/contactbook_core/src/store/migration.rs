//! Load-time normalization of stored contact records.
//!
//! # Responsibility
//! - Turn the tolerant on-disk record shape into a canonical `Contact`.
//!
//! # Invariants
//! - The only default fill is `category = unknown` when the key is absent.
//! - Every other field, including unrecognized keys, is carried unchanged.

use crate::model::contact::{Category, Contact};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Category assigned to records stored without one.
pub const DEFAULT_CATEGORY: Category = Category::Unknown;

/// On-disk record shape accepted by `load`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Outcome of migrating one loaded collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedContacts {
    pub contacts: Vec<Contact>,
    /// Number of records that received `DEFAULT_CATEGORY`.
    pub defaulted_categories: usize,
}

/// Normalizes a single stored record.
///
/// Returns the contact and whether the category was defaulted.
pub fn migrate_record(record: StoredContact) -> (Contact, bool) {
    let defaulted = record.category.is_none();
    let contact = Contact {
        name: record.name,
        phone: record.phone,
        email: record.email,
        category: record.category.unwrap_or(DEFAULT_CATEGORY),
        extra: record.extra,
    };
    (contact, defaulted)
}

/// Normalizes every stored record, preserving order.
pub fn migrate_records(records: Vec<StoredContact>) -> MigratedContacts {
    let mut defaulted_categories = 0;
    let contacts = records
        .into_iter()
        .map(|record| {
            let (contact, defaulted) = migrate_record(record);
            if defaulted {
                defaulted_categories += 1;
            }
            contact
        })
        .collect();

    MigratedContacts {
        contacts,
        defaulted_categories,
    }
}
