//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into contact book use-cases.
//! - Keep the interactive CLI decoupled from storage details.

pub mod contact_book;
pub mod listing;
