//! Text rendering for contact lists and search results.
//!
//! # Invariants
//! - Row numbers are 1-based and local to the rendered sequence.
//! - Missing fields render as placeholders instead of failing.

use crate::model::contact::Contact;

pub const EMPTY_LIST_MESSAGE: &str = "Contact list is empty.";
pub const NO_MATCHES_MESSAGE: &str = "No contacts found matching the search term.";
pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const UNKNOWN_PHONE: &str = "Unknown Phone";
pub const UNKNOWN_EMAIL: &str = "Unknown Email";

/// Formats one row as `<n>. <name> | <phone> | <email> | <Category>`.
pub fn format_row(position: usize, contact: &Contact) -> String {
    format!(
        "{position}. {} | {} | {} | {}",
        contact.name.as_deref().unwrap_or(UNKNOWN_NAME),
        contact.phone.as_deref().unwrap_or(UNKNOWN_PHONE),
        contact.email.as_deref().unwrap_or(UNKNOWN_EMAIL),
        contact.category.label()
    )
}

/// Renders the full collection, or the empty-state line.
pub fn render_contacts(contacts: &[Contact]) -> Vec<String> {
    if contacts.is_empty() {
        return vec![EMPTY_LIST_MESSAGE.to_string()];
    }
    number_rows(contacts.iter())
}

/// Renders search hits numbered within the result set, or the no-match line.
pub fn render_search_results(results: &[&Contact]) -> Vec<String> {
    if results.is_empty() {
        return vec![NO_MATCHES_MESSAGE.to_string()];
    }
    number_rows(results.iter().copied())
}

fn number_rows<'a>(contacts: impl Iterator<Item = &'a Contact>) -> Vec<String> {
    contacts
        .enumerate()
        .map(|(index, contact)| format_row(index + 1, contact))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{format_row, render_contacts, EMPTY_LIST_MESSAGE};
    use crate::model::contact::{Category, Contact};
    use std::collections::BTreeMap;

    #[test]
    fn missing_fields_render_placeholders() {
        let contact = Contact {
            name: None,
            phone: None,
            email: None,
            category: Category::Unknown,
            extra: BTreeMap::new(),
        };

        assert_eq!(
            format_row(3, &contact),
            "3. Unknown Name | Unknown Phone | Unknown Email | Unknown"
        );
    }

    #[test]
    fn empty_collection_renders_empty_state() {
        assert_eq!(render_contacts(&[]), vec![EMPTY_LIST_MESSAGE.to_string()]);
    }
}
