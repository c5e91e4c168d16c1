use contactbook_core::store::migration::{migrate_record, StoredContact};
use contactbook_core::{
    parse_category, validate_phone, Category, Contact, ContactEdit, ContactValidationError,
    NewContact,
};

fn loaded(value: serde_json::Value) -> Contact {
    let record: StoredContact = serde_json::from_value(value).unwrap();
    migrate_record(record).0
}

#[test]
fn validate_phone_matches_length_and_digit_rule() {
    let samples = [
        "", "0", "123456789", "1234567890", "12345678901", "123456789a", "+123456789",
        "123 456 78", "0000000000", "9999999999", "12345678９０",
    ];

    for sample in samples {
        let expected = sample.len() == 10 && sample.chars().all(|c| c.is_ascii_digit());
        assert_eq!(validate_phone(sample), expected, "sample `{sample}`");
    }
}

#[test]
fn category_input_is_lowercased_and_restricted() {
    assert_eq!(parse_category("WORK").unwrap(), Category::Work);
    assert_eq!(parse_category("hOmE").unwrap(), Category::Home);
    assert_eq!(
        parse_category("other").unwrap_err(),
        ContactValidationError::InvalidCategory("other".to_string())
    );
    assert!(parse_category("Unknown").is_err());
}

#[test]
fn unassignable_stored_category_is_rejected_on_edit() {
    let mut contact = loaded(serde_json::json!({
        "name": "Stored Category",
        "phone": "1234567890",
        "category": "Friends"
    }));

    let err = contact
        .apply_edit(ContactEdit {
            category: Some(Category::Other("Friends".to_string())),
            ..ContactEdit::default()
        })
        .unwrap_err();
    assert_eq!(
        err,
        ContactValidationError::InvalidCategory("Friends".to_string())
    );

    contact.apply_edit(ContactEdit::default()).unwrap();
    assert_eq!(contact.category.label(), "Friends");
}

#[test]
fn contact_serialization_uses_expected_wire_fields() {
    let contact = Contact::from_new(NewContact {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: "1234567890".to_string(),
        email: "ada@example.com".to_string(),
        category: Category::Work,
    })
    .unwrap();

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Ada Lovelace",
            "phone": "1234567890",
            "email": "ada@example.com",
            "category": "work"
        })
    );

    assert_eq!(loaded(json), contact);
}

#[test]
fn name_parts_split_at_first_space() {
    let contact = Contact::from_new(NewContact {
        first_name: "Mary Ann".to_string(),
        last_name: "Evans".to_string(),
        phone: "1234567890".to_string(),
        email: String::new(),
        category: Category::Home,
    })
    .unwrap();

    assert_eq!(contact.first_name(), "Mary");
    assert_eq!(contact.last_name(), "Ann Evans");
}

#[test]
fn apply_edit_forces_valid_phone_on_legacy_record() {
    let mut contact = loaded(serde_json::json!({
        "name": "Legacy Phone",
        "phone": "555-0100",
        "category": "unknown"
    }));

    let err = contact.apply_edit(ContactEdit::default()).unwrap_err();
    assert!(matches!(err, ContactValidationError::InvalidPhone(_)));

    contact
        .apply_edit(ContactEdit {
            phone: Some("5550100000".to_string()),
            ..ContactEdit::default()
        })
        .unwrap();
    assert_eq!(contact.phone.as_deref(), Some("5550100000"));
    assert_eq!(contact.category, Category::Unknown);
    assert!(ContactEdit::default().is_noop());
}
