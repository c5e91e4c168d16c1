//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record persisted by the store.
//! - Own add/edit validation rules (phone format, assignable categories).
//!
//! # Invariants
//! - `phone` is exactly 10 ASCII digits whenever a contact is created or
//!   edited. Loaded records are not re-validated.
//! - `Category::Unknown` and `Category::Other` come only from storage;
//!   add/edit never assign them.
//! - Unrecognized stored keys survive a load/save cycle through `extra`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of digits a phone number must have.
pub const PHONE_DIGITS: usize = 10;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Contact grouping.
///
/// Stored text is kept verbatim: only the exact lowercase forms map to the
/// known variants, anything else loads as `Other` and saves back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Home,
    /// Assigned at load time to records saved without a category.
    Unknown,
    /// Stored value outside the known set. Displayed, never assignable.
    Other(String),
}

impl Category {
    /// Storage form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::Home => "home",
            Self::Unknown => "unknown",
            Self::Other(value) => value,
        }
    }

    /// Display form: first letter uppercased, the rest lowercased.
    pub fn label(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Whether add/edit flows may set this category.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Self::Work | Self::Home)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "work" => Self::Work,
            "home" => Self::Home,
            "unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// Validation errors raised by add/edit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    /// Phone is not exactly 10 decimal digits.
    InvalidPhone(String),
    /// Category is not one of the accepted values.
    InvalidCategory(String),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPhone(value) => write!(
                f,
                "invalid phone number `{value}`: expected exactly {PHONE_DIGITS} digits"
            ),
            Self::InvalidCategory(value) => {
                write!(f, "invalid category `{value}`: expected work|home")
            }
        }
    }
}

impl Error for ContactValidationError {}

/// Returns `true` iff `value` is exactly 10 ASCII decimal digits.
///
/// No country codes, separators or surrounding whitespace are accepted.
pub fn validate_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Parses user input into an assignable category.
///
/// Input is trimmed and matched case-insensitively against `work|home`.
/// `unknown` is rejected because it is never assignable.
pub fn parse_category(value: &str) -> Result<Category, ContactValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "work" => Ok(Category::Work),
        "home" => Ok(Category::Home),
        _ => Err(ContactValidationError::InvalidCategory(value.to_string())),
    }
}

/// Splits a stored full name into `(first, last)` at the first space.
///
/// A name without a space is treated as a first name only.
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_once(' ').unwrap_or((name, ""))
}

/// Canonical contact record.
///
/// `name`, `phone` and `email` are optional only to tolerate hand-edited
/// storage files; add/edit always set them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    /// Full name, `"first last"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form, never validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub category: Category,
    /// Stored keys this model does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Contact {
    /// Builds a validated contact from add-flow input.
    ///
    /// # Errors
    /// - `InvalidPhone` when `phone` fails [`validate_phone`].
    /// - `InvalidCategory` when `category` is not assignable.
    pub fn from_new(input: NewContact) -> Result<Self, ContactValidationError> {
        ensure_phone(&input.phone)?;
        ensure_assignable(&input.category)?;

        Ok(Self {
            name: Some(join_name(&input.first_name, &input.last_name)),
            phone: Some(input.phone),
            email: Some(input.email),
            category: input.category,
            extra: BTreeMap::new(),
        })
    }

    /// Applies an edit in place.
    ///
    /// `None` fields keep the current value. The effective phone must be
    /// valid even when kept, so a legacy malformed phone forces a new value.
    /// Nothing is mutated when validation fails.
    pub fn apply_edit(&mut self, edit: ContactEdit) -> Result<(), ContactValidationError> {
        let phone = match edit.phone {
            Some(phone) => phone,
            None => self.phone.clone().unwrap_or_default(),
        };
        ensure_phone(&phone)?;
        if let Some(category) = &edit.category {
            ensure_assignable(category)?;
        }

        if edit.first_name.is_some() || edit.last_name.is_some() {
            let current = self.name.as_deref().unwrap_or_default();
            let (current_first, current_last) = split_name(current);
            let first = edit.first_name.as_deref().unwrap_or(current_first);
            let last = edit.last_name.as_deref().unwrap_or(current_last);
            self.name = Some(join_name(first, last));
        }
        self.phone = Some(phone);
        if let Some(email) = edit.email {
            self.email = Some(email);
        }
        if let Some(category) = edit.category {
            self.category = category;
        }

        Ok(())
    }

    /// Current first name, or empty when the name is missing.
    pub fn first_name(&self) -> &str {
        split_name(self.name.as_deref().unwrap_or_default()).0
    }

    /// Current last name, or empty when the name has a single part.
    pub fn last_name(&self) -> &str {
        split_name(self.name.as_deref().unwrap_or_default()).1
    }
}

/// Add-flow input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub category: Category,
}

/// Edit-flow input. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub category: Option<Category>,
}

impl ContactEdit {
    /// Returns `true` when the edit keeps every field.
    pub fn is_noop(&self) -> bool {
        self == &Self::default()
    }
}

fn join_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

fn ensure_phone(phone: &str) -> Result<(), ContactValidationError> {
    if validate_phone(phone) {
        Ok(())
    } else {
        Err(ContactValidationError::InvalidPhone(phone.to_string()))
    }
}

fn ensure_assignable(category: &Category) -> Result<(), ContactValidationError> {
    if category.is_assignable() {
        Ok(())
    } else {
        Err(ContactValidationError::InvalidCategory(
            category.as_str().to_string(),
        ))
    }
}
