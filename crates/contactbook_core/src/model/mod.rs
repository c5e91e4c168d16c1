//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact record shared by store, service and CLI layers.
//! - Keep input validation rules in one place.
//!
//! # Invariants
//! - Validation is applied on add/edit only, never retroactively on load.

pub mod contact;
