use catalog_core::{
    Author, Book, BookInstance, Genre, LoanStatus, ModelValidationError, NewAuthor, NewBook,
    NewGenre,
};
use chrono::NaiveDate;
use uuid::Uuid;

#[test]
fn labels_follow_catalog_conventions() {
    let genre = Genre {
        id: 1,
        name: "Science Fiction".to_string(),
    };
    let author = Author {
        id: 2,
        first_name: "George".to_string(),
        last_name: "Orwell".to_string(),
        date_of_birth: None,
        date_of_death: None,
    };
    let book = Book {
        id: 3,
        title: "1984".to_string(),
        author: Some(author.id),
        summary: "A dystopian novel.".to_string(),
        isbn: "9780451524935".to_string(),
    };

    assert_eq!(genre.to_string(), "Science Fiction");
    assert_eq!(author.to_string(), "Orwell, George");
    assert_eq!(book.to_string(), "1984");

    let copy_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let copy = BookInstance::with_id(copy_id, Some(book.id), "Secker & Warburg").unwrap();
    assert_eq!(
        copy.label(Some(&book)),
        "11111111-2222-4333-8444-555555555555 (1984)"
    );
    assert_eq!(copy.label(None), "11111111-2222-4333-8444-555555555555");
}

#[test]
fn required_and_bounded_fields_are_validated() {
    assert_eq!(
        NewGenre::new("  ").validate().unwrap_err(),
        ModelValidationError::Empty { field: "name" }
    );
    assert_eq!(
        NewGenre::new("x".repeat(201)).validate().unwrap_err(),
        ModelValidationError::TooLong {
            field: "name",
            max: 200,
            actual: 201
        }
    );
    assert_eq!(
        NewAuthor::new("George", "").validate().unwrap_err(),
        ModelValidationError::Empty { field: "last_name" }
    );

    assert_eq!(
        NewBook::new("1984", "", "9780451524935").validate().unwrap_err(),
        ModelValidationError::Empty { field: "summary" }
    );
    assert_eq!(
        NewBook::new("1984", "A dystopian novel.", "").validate().unwrap_err(),
        ModelValidationError::Empty { field: "isbn" }
    );
    assert_eq!(
        BookInstance::new(None, "").validate().unwrap_err(),
        ModelValidationError::Empty { field: "imprint" }
    );

    let mut copy = BookInstance::new(None, "x");
    copy.imprint = "i".repeat(201);
    assert!(matches!(
        copy.validate().unwrap_err(),
        ModelValidationError::TooLong { field: "imprint", .. }
    ));
}

#[test]
fn book_instance_serialization_uses_status_codes_and_iso_dates() {
    let copy_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut copy = BookInstance::with_id(copy_id, Some(7), "Penguin").unwrap();
    copy.status = Some(LoanStatus::OnLoan);
    copy.due_back = NaiveDate::from_ymd_opt(2024, 5, 17);

    let json = serde_json::to_value(&copy).unwrap();
    assert_eq!(json["id"], copy_id.to_string());
    assert_eq!(json["book"], 7);
    assert_eq!(json["status"], "o");
    assert_eq!(json["due_back"], "2024-05-17");

    let decoded: BookInstance = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, copy);
}

#[test]
fn book_instance_without_status_key_decodes_as_maintenance() {
    let json = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "book": null,
        "imprint": "Penguin",
        "due_back": null
    });
    let decoded: BookInstance = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.status, Some(LoanStatus::Maintenance));

    let json = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "book": null,
        "imprint": "Penguin",
        "due_back": null,
        "status": null
    });
    let decoded: BookInstance = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.status, None);
}

#[test]
fn loan_status_labels_match_choices() {
    let labels: Vec<_> = LoanStatus::ALL.iter().map(|status| status.label()).collect();
    assert_eq!(labels, vec!["Maintenance", "On loan", "Available", "Reserved"]);
}
