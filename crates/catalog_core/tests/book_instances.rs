use catalog_core::db::open_db_in_memory;
use catalog_core::{
    BookInstance, BookInstanceListQuery, BookInstanceRepository, BookRepository, BookService,
    DueBackFilter, LoanService, LoanStatus, NewBook, RepoError, SqliteBookInstanceRepository,
    SqliteBookRepository, StatusFilter,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn new_book(title: impl Into<String>) -> NewBook {
    let title = title.into();
    let summary = format!("Catalogue notes for {title}.");
    NewBook::new(title, summary, "9780000000000")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn decoded_copy_without_status_is_stored_as_maintenance() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookInstanceRepository::try_new(&conn).unwrap();
    let copy: BookInstance = serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4().to_string(),
        "book": null,
        "imprint": "Penguin",
        "due_back": null
    }))
    .unwrap();

    let id = repo.create_instance(&copy).unwrap();
    let stored = repo.get_instance(id).unwrap().unwrap();
    assert_eq!(stored.status, Some(LoanStatus::Maintenance));
}

#[test]
fn new_copy_is_persisted_with_maintenance_status() {
    let conn = open_db_in_memory().unwrap();
    let loans = LoanService::new(SqliteBookInstanceRepository::try_new(&conn).unwrap());

    let copy = loans.add_copy(None, "Folio Society").unwrap();
    let loaded = loans.get_copy(copy.id).unwrap().unwrap();
    assert_eq!(loaded.status, Some(LoanStatus::Maintenance));

    let stored: String = conn
        .query_row(
            "SELECT status FROM book_instances WHERE id = ?1;",
            [copy.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "m");
}

#[test]
fn storage_default_status_is_maintenance() {
    let conn = open_db_in_memory().unwrap();
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO book_instances (id, imprint) VALUES (?1, 'Raw');",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteBookInstanceRepository::try_new(&conn).unwrap();
    let loaded = repo.get_instance(id).unwrap().unwrap();
    assert_eq!(loaded.status, Some(LoanStatus::Maintenance));
}

#[test]
fn status_outside_choices_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO book_instances (id, imprint, status) VALUES (?1, 'Raw', 'x');",
            [Uuid::new_v4().to_string()],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn blank_status_roundtrips_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookInstanceRepository::try_new(&conn).unwrap();
    let mut copy = BookInstance::new(None, "Blank");
    copy.status = None;
    repo.create_instance(&copy).unwrap();

    assert_eq!(repo.get_instance(copy.id).unwrap().unwrap().status, None);
}

#[test]
fn any_status_may_follow_any_other() {
    let conn = open_db_in_memory().unwrap();
    let loans = LoanService::new(SqliteBookInstanceRepository::try_new(&conn).unwrap());
    let copy = loans.add_copy(None, "Vintage").unwrap();

    let sequence = [
        Some(LoanStatus::Reserved),
        Some(LoanStatus::Maintenance),
        Some(LoanStatus::OnLoan),
        None,
        Some(LoanStatus::Available),
        Some(LoanStatus::Reserved),
    ];
    for status in sequence {
        let updated = loans.set_status(copy.id, status).unwrap();
        assert_eq!(updated.status, status);
        assert_eq!(loans.get_copy(copy.id).unwrap().unwrap().status, status);
    }
}

#[test]
fn copies_are_ordered_by_due_back_with_undated_first() {
    let conn = open_db_in_memory().unwrap();
    let loans = LoanService::new(SqliteBookInstanceRepository::try_new(&conn).unwrap());

    let late = loans.add_copy(None, "late").unwrap();
    let undated = loans.add_copy(None, "undated").unwrap();
    let early = loans.add_copy(None, "early").unwrap();
    loans.set_due_back(late.id, Some(date(2024, 9, 1))).unwrap();
    loans.set_due_back(early.id, Some(date(2024, 3, 1))).unwrap();

    let imprints: Vec<String> = loans
        .list_copies(&BookInstanceListQuery::default())
        .unwrap()
        .into_iter()
        .map(|copy| copy.imprint)
        .collect();
    assert_eq!(imprints, vec!["undated", "early", "late"]);
    assert!(loans.get_copy(undated.id).unwrap().unwrap().due_back.is_none());
}

#[test]
fn deleting_book_nulls_instance_references_and_keeps_instances() {
    let conn = open_db_in_memory().unwrap();
    let books = BookService::new(SqliteBookRepository::try_new(&conn).unwrap());
    let loans = LoanService::new(SqliteBookInstanceRepository::try_new(&conn).unwrap());

    let book = books.create_book(&new_book("Dune")).unwrap();
    let first = loans.add_copy(Some(book.id), "Chilton").unwrap();
    let second = loans.add_copy(Some(book.id), "Ace").unwrap();

    let outcome = books.delete_book(book.id).unwrap();
    assert_eq!(outcome.detached, 2);

    for id in [first.id, second.id] {
        let copy = loans.get_copy(id).unwrap().expect("copy must survive");
        assert_eq!(copy.book, None);
    }
    assert!(books.get_book(book.id).unwrap().is_none());
}

#[test]
fn update_keeps_identifier_and_missing_copy_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookInstanceRepository::try_new(&conn).unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let book = books.create_book(&new_book("Emma")).unwrap();

    let mut copy = BookInstance::new(None, "Penguin");
    repo.create_instance(&copy).unwrap();
    copy.book = Some(book.id);
    copy.imprint = "Penguin Classics".to_string();
    repo.update_instance(&copy).unwrap();

    let loaded = repo.get_instance(copy.id).unwrap().unwrap();
    assert_eq!(loaded, copy);

    let stranger = BookInstance::new(None, "ghost");
    let err = repo.update_instance(&stranger).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "book instance", .. }));
    assert!(matches!(
        repo.delete_instance(stranger.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn list_filters_by_book_status_and_due_range() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let loans = LoanService::new(SqliteBookInstanceRepository::try_new(&conn).unwrap());
    let book = books.create_book(&new_book("Middlemarch")).unwrap();

    let on_loan = loans.add_copy(Some(book.id), "a").unwrap();
    loans.set_status(on_loan.id, Some(LoanStatus::OnLoan)).unwrap();
    loans.set_due_back(on_loan.id, Some(date(2024, 6, 10))).unwrap();
    let blank = loans.add_copy(None, "b").unwrap();
    loans.set_status(blank.id, None).unwrap();
    loans.add_copy(Some(book.id), "c").unwrap();

    let by_book = loans
        .list_copies(&BookInstanceListQuery {
            book: Some(book.id),
            ..BookInstanceListQuery::default()
        })
        .unwrap();
    assert_eq!(by_book.len(), 2);

    let loaned = loans
        .list_copies(&BookInstanceListQuery {
            status: StatusFilter::Is(LoanStatus::OnLoan),
            ..BookInstanceListQuery::default()
        })
        .unwrap();
    assert_eq!(loaned.len(), 1);
    assert_eq!(loaned[0].id, on_loan.id);

    let blanks = loans
        .list_copies(&BookInstanceListQuery {
            status: StatusFilter::Blank,
            ..BookInstanceListQuery::default()
        })
        .unwrap();
    assert_eq!(blanks.len(), 1);
    assert_eq!(blanks[0].id, blank.id);

    let june = loans
        .list_copies(&BookInstanceListQuery {
            due_back: DueBackFilter::Range {
                from: date(2024, 6, 1),
                until: date(2024, 7, 1),
            },
            ..BookInstanceListQuery::default()
        })
        .unwrap();
    assert_eq!(june.len(), 1);

    let undated = loans
        .list_copies(&BookInstanceListQuery {
            due_back: DueBackFilter::NoDate,
            ..BookInstanceListQuery::default()
        })
        .unwrap();
    assert_eq!(undated.len(), 2);
}
