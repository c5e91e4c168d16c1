//! Contact book use-case service.
//!
//! # Responsibility
//! - Hold the in-memory contact collection loaded from a store.
//! - Provide add/edit/delete/search entry points over that collection.
//! - Persist the full collection after every successful mutation.
//!
//! # Invariants
//! - Collection order is insertion order; positions are 1-based at this API.
//! - Out-of-range or unparsable positions never mutate state.
//! - Validation runs before any mutation; a failed save keeps the mutation
//!   in memory and reports the store error.

use crate::model::contact::{Contact, ContactEdit, ContactValidationError, NewContact};
use crate::store::{ContactStore, StoreError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BookResult<T> = Result<T, BookError>;

/// Service error for contact book operations.
#[derive(Debug)]
pub enum BookError {
    /// Selection input is not a number.
    InvalidInput(String),
    /// 1-based position does not address an existing contact.
    InvalidIndex { position: usize, len: usize },
    Validation(ContactValidationError),
    Store(StoreError),
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(value) => write!(f, "invalid contact number input: `{value}`"),
            Self::InvalidIndex { position, len } => write!(
                f,
                "contact number {position} is out of range (1..={len})"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for BookError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// In-memory contact collection bound to a store.
pub struct ContactBook<S: ContactStore> {
    store: S,
    contacts: Vec<Contact>,
}

impl<S: ContactStore> ContactBook<S> {
    /// Loads the collection from `store`.
    ///
    /// # Errors
    /// - Propagates store load failures (malformed file, i/o) unchanged.
    pub fn open(store: S) -> BookResult<Self> {
        let contacts = store.load()?;
        Ok(Self { store, contacts })
    }

    /// All contacts in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Returns the contact at 1-based `position`.
    pub fn get(&self, position: usize) -> BookResult<&Contact> {
        let index = resolve_position(position, self.contacts.len())?;
        Ok(&self.contacts[index])
    }

    /// Validates and appends a new contact, then persists.
    pub fn add(&mut self, input: NewContact) -> BookResult<&Contact> {
        let contact = Contact::from_new(input).inspect_err(|err| {
            info!(
                "event=contact_add module=service status=rejected error_code={}",
                validation_code(err)
            );
        })?;
        self.contacts.push(contact);
        self.persist("contact_add")?;

        info!(
            "event=contact_add module=service status=ok count={}",
            self.contacts.len()
        );
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Applies `edit` to the contact at 1-based `position`, then persists.
    ///
    /// An edit with every field `None` keeps the record unchanged but still
    /// requires its phone to be valid.
    pub fn edit(&mut self, position: usize, edit: ContactEdit) -> BookResult<&Contact> {
        let index = resolve_position(position, self.contacts.len())?;
        let noop = edit.is_noop();
        self.contacts[index].apply_edit(edit).inspect_err(|err| {
            info!(
                "event=contact_edit module=service status=rejected position={} error_code={}",
                position,
                validation_code(err)
            );
        })?;
        self.persist("contact_edit")?;

        info!(
            "event=contact_edit module=service status=ok position={} noop={}",
            position, noop
        );
        Ok(&self.contacts[index])
    }

    /// Removes the contact at 1-based `position`, then persists.
    ///
    /// Later contacts shift down by one position.
    pub fn delete(&mut self, position: usize) -> BookResult<Contact> {
        let index = resolve_position(position, self.contacts.len())?;
        let removed = self.contacts.remove(index);
        self.persist("contact_delete")?;

        info!(
            "event=contact_delete module=service status=ok position={} count={}",
            position,
            self.contacts.len()
        );
        Ok(removed)
    }

    /// Read-only search; see [`search_contacts`].
    pub fn search(&self, term: &str) -> Vec<&Contact> {
        let hits = search_contacts(&self.contacts, term);
        info!(
            "event=contact_search module=service status=ok scanned={} hits={}",
            self.contacts.len(),
            hits.len()
        );
        hits
    }

    fn persist(&self, event: &str) -> BookResult<()> {
        self.store.save(&self.contacts).map_err(|err| {
            error!(
                "event={} module=service status=error error_code=save_failed error={}",
                event, err
            );
            BookError::Store(err)
        })
    }
}

/// Returns contacts whose name contains `term` case-insensitively, or whose
/// phone equals `term` exactly.
///
/// Results keep collection order.
pub fn search_contacts<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    let needle = term.to_lowercase();
    contacts
        .iter()
        .filter(|contact| {
            let name_hit = contact
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            name_hit || contact.phone.as_deref() == Some(term)
        })
        .collect()
}

/// Parses user selection text into a 1-based position.
///
/// Surrounding whitespace is ignored. Anything that is not a non-negative
/// integer is `InvalidInput`; range checks happen at the operation.
pub fn parse_position(raw: &str) -> BookResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| BookError::InvalidInput(raw.trim().to_string()))
}

/// Maps a 1-based position to a 0-based index.
pub fn resolve_position(position: usize, len: usize) -> BookResult<usize> {
    if position == 0 || position > len {
        return Err(BookError::InvalidIndex { position, len });
    }
    Ok(position - 1)
}

fn validation_code(err: &ContactValidationError) -> &'static str {
    match err {
        ContactValidationError::InvalidPhone(_) => "invalid_phone",
        ContactValidationError::InvalidCategory(_) => "invalid_category",
    }
}
