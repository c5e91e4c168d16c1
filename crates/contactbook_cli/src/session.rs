//! Interactive menu session.
//!
//! # Responsibility
//! - Render the six-action menu and dispatch to `ContactBook` operations.
//! - Own the re-prompt policy for phone and category input.
//!
//! # Invariants
//! - Phone and category prompts loop until valid; names and email do not.
//! - Edit/delete selection gets one attempt per invocation.
//! - End of input ends the session like the exit action.

use contactbook_core::service::listing::{render_contacts, render_search_results};
use contactbook_core::{
    parse_category, parse_position, validate_phone, BookError, Category, ContactBook, ContactEdit,
    ContactStore, NewContact,
};
use log::warn;
use std::io::{self, BufRead, Write};

const MENU: &str = "\nContact Manager
1. Add New Contact
2. View All Contacts
3. Edit Contact
4. Delete Contact
5. Search Contact
6. Exit";
const INVALID_PHONE: &str = "Invalid phone number. Please enter a valid 10-digit phone number.";
const INVALID_CATEGORY: &str = "Invalid category. Please enter work or home.";
const INVALID_NUMBER: &str = "Invalid contact number.";
const INVALID_SELECTION_INPUT: &str = "Invalid input. Please enter a contact number.";

/// Menu action selected by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Edit,
    Delete,
    Search,
    Exit,
}

impl MenuChoice {
    /// Parses the menu ordinal; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::View),
            "3" => Some(Self::Edit),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Search),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug)]
enum SessionError {
    Io(io::Error),
    EndOfInput,
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type SessionResult<T> = Result<T, SessionError>;

/// Menu loop bound to a contact book and a line-oriented terminal.
pub struct Session<'book, S: ContactStore, R: BufRead, W: Write> {
    book: &'book mut ContactBook<S>,
    input: R,
    output: W,
}

impl<'book, S: ContactStore, R: BufRead, W: Write> Session<'book, S, R, W> {
    pub fn new(book: &'book mut ContactBook<S>, input: R, output: W) -> Self {
        Self {
            book,
            input,
            output,
        }
    }

    /// Runs the menu until exit or end of input.
    ///
    /// # Errors
    /// - Terminal read/write failures.
    pub fn run(&mut self) -> io::Result<()> {
        match self.menu_loop() {
            Ok(()) | Err(SessionError::EndOfInput) => {
                writeln!(self.output, "Exiting Contact Manager.")?;
                self.output.flush()
            }
            Err(SessionError::Io(err)) => Err(err),
        }
    }

    fn menu_loop(&mut self) -> SessionResult<()> {
        loop {
            self.say(MENU)?;
            let choice = self.prompt("Enter your choice: ")?;
            match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => self.add_contact()?,
                Some(MenuChoice::View) => self.view_contacts()?,
                Some(MenuChoice::Edit) => self.edit_contact()?,
                Some(MenuChoice::Delete) => self.delete_contact()?,
                Some(MenuChoice::Search) => self.search_contacts()?,
                Some(MenuChoice::Exit) => return Ok(()),
                None => self.say("Invalid choice. Please try again.")?,
            }
        }
    }

    fn add_contact(&mut self) -> SessionResult<()> {
        let first_name = self.prompt("Enter contact's first name: ")?;
        let last_name = self.prompt("Enter contact's last name: ")?;
        let phone = self.prompt_phone("Enter phone number (10 digits): ", None)?;
        let email = self.prompt("Enter email address: ")?;
        let category = loop {
            let raw = self.prompt("Enter contact category (work/home): ")?;
            match parse_category(&raw) {
                Ok(category) => break category,
                Err(_) => self.say(INVALID_CATEGORY)?,
            }
        };

        let input = NewContact {
            first_name,
            last_name,
            phone,
            email,
            category,
        };
        match self.book.add(input) {
            Ok(contact) => {
                let message = format!(
                    "Contact {} ({}) added successfully.",
                    contact.name.as_deref().unwrap_or_default(),
                    contact.category
                );
                self.say(&message)
            }
            Err(err) => self.report(&err),
        }
    }

    fn view_contacts(&mut self) -> SessionResult<()> {
        for line in render_contacts(self.book.contacts()) {
            self.say(&line)?;
        }
        Ok(())
    }

    fn edit_contact(&mut self) -> SessionResult<()> {
        self.view_contacts()?;
        let Some(position) = self.select("Enter the number of the contact to edit: ")? else {
            return Ok(());
        };

        let current = match self.book.get(position) {
            Ok(contact) => contact.clone(),
            Err(err) => return self.report(&err),
        };
        let heading = format!("Editing {}", current.name.as_deref().unwrap_or_default());
        self.say(&heading)?;

        let first_name =
            self.prompt_optional(&format!("Enter new first name ({}): ", current.first_name()))?;
        let last_name =
            self.prompt_optional(&format!("Enter new last name ({}): ", current.last_name()))?;
        let current_phone = current.phone.as_deref().unwrap_or_default();
        let phone = self.prompt_phone(
            &format!("Enter new phone number ({current_phone}, 10 digits): "),
            Some(current_phone),
        )?;
        let email = self.prompt_optional(&format!(
            "Enter new email address ({}): ",
            current.email.as_deref().unwrap_or_default()
        ))?;
        let category = self.prompt_edit_category(&current.category)?;

        let edit = ContactEdit {
            first_name,
            last_name,
            phone: (Some(phone.as_str()) != current.phone.as_deref()).then_some(phone),
            email,
            category,
        };
        match self.book.edit(position, edit) {
            Ok(_) => self.say("Contact updated successfully."),
            Err(err) => self.report(&err),
        }
    }

    fn delete_contact(&mut self) -> SessionResult<()> {
        self.view_contacts()?;
        let Some(position) = self.select("Enter the number of the contact to delete: ")? else {
            return Ok(());
        };

        match self.book.delete(position) {
            Ok(contact) => {
                let message = format!(
                    "Contact {} deleted successfully.",
                    contact.name.as_deref().unwrap_or_default()
                );
                self.say(&message)
            }
            Err(err) => self.report(&err),
        }
    }

    fn search_contacts(&mut self) -> SessionResult<()> {
        let term = self.prompt("Enter the name or phone number to search for: ")?;
        let results = self.book.search(&term);
        let lines = render_search_results(&results);
        if !results.is_empty() {
            self.say("\nSearch Results:")?;
        }
        for line in lines {
            self.say(&line)?;
        }
        Ok(())
    }

    /// Reads a selection; prints the recovery message and returns `None` when
    /// the input is not a number.
    fn select(&mut self, label: &str) -> SessionResult<Option<usize>> {
        let raw = self.prompt(label)?;
        match parse_position(&raw) {
            Ok(position) => Ok(Some(position)),
            Err(_) => {
                self.say(INVALID_SELECTION_INPUT)?;
                Ok(None)
            }
        }
    }

    /// Loops until a valid phone is entered. With `current`, an empty
    /// response falls back to it.
    fn prompt_phone(&mut self, label: &str, current: Option<&str>) -> SessionResult<String> {
        loop {
            let raw = self.prompt(label)?;
            let phone = match current {
                Some(current) if raw.is_empty() => current.to_string(),
                _ => raw,
            };
            if validate_phone(&phone) {
                return Ok(phone);
            }
            self.say(INVALID_PHONE)?;
        }
    }

    fn prompt_edit_category(&mut self, current: &Category) -> SessionResult<Option<Category>> {
        let label = format!("Enter new contact category ({current}): ");
        loop {
            let raw = self.prompt(&label)?;
            if raw.is_empty() {
                return Ok(None);
            }
            match parse_category(&raw) {
                Ok(category) if category == *current => return Ok(None),
                Ok(category) => return Ok(Some(category)),
                Err(_) => self.say(INVALID_CATEGORY)?,
            }
        }
    }

    fn prompt_optional(&mut self, label: &str) -> SessionResult<Option<String>> {
        let raw = self.prompt(label)?;
        Ok((!raw.is_empty()).then_some(raw))
    }

    fn prompt(&mut self, label: &str) -> SessionResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::EndOfInput);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    fn say(&mut self, message: &str) -> SessionResult<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn report(&mut self, err: &BookError) -> SessionResult<()> {
        match err {
            BookError::InvalidIndex { .. } => self.say(INVALID_NUMBER),
            BookError::InvalidInput(_) => self.say(INVALID_SELECTION_INPUT),
            other => {
                let kind = match other {
                    BookError::Store(_) => "store",
                    _ => "validation",
                };
                warn!("event=session_action module=cli status=error error_kind={}", kind);
                self.say(&format!("Error: {other}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuChoice, Session};
    use contactbook_core::{Category, ContactBook, ContactStore, JsonFileStore};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(dir: &TempDir, script: &str) -> (ContactBook<JsonFileStore>, String) {
        let store = JsonFileStore::new(dir.path().join("contacts.json"));
        let mut book = ContactBook::open(store).unwrap();
        let mut output = Vec::new();
        Session::new(&mut book, Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        (book, String::from_utf8(output).unwrap())
    }

    const ADD_ALICE: &str = "1\nAlice\nSmith\n1234567890\nalice@example.com\nwork\n";

    #[test]
    fn menu_choice_parses_ordinals_only() {
        assert_eq!(MenuChoice::parse(" 3 "), Some(MenuChoice::Edit));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("add"), None);
    }

    #[test]
    fn add_reprompts_until_phone_and_category_are_valid() {
        let dir = tempfile::tempdir().unwrap();
        let script = "1\nAlice\nSmith\n12345\nabcdefghij\n1234567890\na@b.c\nother\n\nWORK\n6\n";
        let (book, output) = run_script(&dir, script);

        assert_eq!(output.matches("Invalid phone number.").count(), 2);
        assert_eq!(output.matches("Invalid category.").count(), 2);
        assert!(output.contains("Contact Alice Smith (work) added successfully."));
        assert_eq!(book.len(), 1);
        assert_eq!(book.contacts()[0].category, Category::Work);
    }

    #[test]
    fn view_lists_contacts_or_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let (_, empty) = run_script(&dir, "2\n6\n");
        assert!(empty.contains("Contact list is empty."));

        let script = format!("{ADD_ALICE}2\n6\n");
        let (_, output) = run_script(&dir, &script);
        assert!(output.contains("1. Alice Smith | 1234567890 | alice@example.com | Work"));
    }

    #[test]
    fn edit_with_empty_responses_keeps_contact() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("{ADD_ALICE}3\n1\n\n\n\n\n\n6\n");
        let (book, output) = run_script(&dir, &script);

        assert!(output.contains("Editing Alice Smith"));
        assert!(output.contains("Enter new first name (Alice): "));
        assert!(output.contains("Contact updated successfully."));
        let contact = &book.contacts()[0];
        assert_eq!(contact.name.as_deref(), Some("Alice Smith"));
        assert_eq!(contact.phone.as_deref(), Some("1234567890"));
        assert_eq!(contact.category, Category::Work);
    }

    #[test]
    fn edit_replaces_entered_fields() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("{ADD_ALICE}3\n1\nAlicia\n\n999\n9998887777\n\nbogus\nHome\n6\n");
        let (book, output) = run_script(&dir, &script);

        assert!(output.contains("Invalid phone number."));
        assert!(output.contains("Invalid category."));
        let contact = &book.contacts()[0];
        assert_eq!(contact.name.as_deref(), Some("Alicia Smith"));
        assert_eq!(contact.phone.as_deref(), Some("9998887777"));
        assert_eq!(contact.email.as_deref(), Some("alice@example.com"));
        assert_eq!(contact.category, Category::Home);
    }

    #[test]
    fn edit_and_delete_recover_from_bad_selection() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("{ADD_ALICE}3\nfirst\n4\n5\n4\n0\n6\n");
        let (book, output) = run_script(&dir, &script);

        assert_eq!(
            output
                .matches("Invalid input. Please enter a contact number.")
                .count(),
            1
        );
        assert_eq!(output.matches("Invalid contact number.").count(), 2);
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn delete_reports_removed_name_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("{ADD_ALICE}4\n1\n6\n");
        let (book, output) = run_script(&dir, &script);

        assert!(output.contains("Contact Alice Smith deleted successfully."));
        assert!(book.is_empty());
        let store = JsonFileStore::new(dir.path().join("contacts.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn search_shows_local_results_or_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let script = format!("{ADD_ALICE}5\nSMITH\n5\nnobody\n6\n");
        let (_, output) = run_script(&dir, &script);

        assert!(output.contains("Search Results:"));
        assert!(output.contains("1. Alice Smith | 1234567890 | alice@example.com | Work"));
        assert!(output.contains("No contacts found matching the search term."));
    }

    #[test]
    fn invalid_choice_redisplays_menu_and_eof_exits() {
        let dir = tempfile::tempdir().unwrap();
        let (_, output) = run_script(&dir, "9\n");

        assert!(output.contains("Invalid choice. Please try again."));
        assert_eq!(output.matches("Contact Manager\n").count(), 2);
        assert!(output.ends_with("Exiting Contact Manager.\n"));
    }
}
