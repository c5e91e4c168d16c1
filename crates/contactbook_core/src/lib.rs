//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::contact::{
    parse_category, split_name, validate_phone, Category, Contact, ContactEdit,
    ContactValidationError, NewContact,
};
pub use service::contact_book::{
    parse_position, resolve_position, search_contacts, BookError, BookResult, ContactBook,
};
pub use store::{ContactStore, JsonFileStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
