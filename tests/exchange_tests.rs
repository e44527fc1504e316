use chrono::NaiveDate;
use expense_core::{
    core::TransactionStore,
    domain::{parse_date, Transaction, TransactionKind},
    errors::ExpenseError,
    storage::{JsonFileStorage, MemoryStorage},
    utils::exchange::{export_to_dir, import_from_path},
};
use std::fs;
use tempfile::tempdir;

fn seeded_store() -> TransactionStore {
    let mut store = TransactionStore::open(Box::new(MemoryStorage::new())).unwrap();
    store
        .add(Transaction::new(
            "Salary",
            2500.0,
            parse_date("2024-02-27T09:00:00").unwrap(),
            TransactionKind::Income,
        ))
        .unwrap();
    store
        .add(
            Transaction::new(
                "Rent",
                900.0,
                parse_date("2024-03-01").unwrap(),
                TransactionKind::Expense,
            )
            .with_description("March"),
        )
        .unwrap();
    store
}

#[test]
fn export_then_import_into_a_fresh_store_reproduces_records() {
    let temp = tempdir().unwrap();
    let source = seeded_store();
    let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let path = export_to_dir(source.list(), temp.path(), today).unwrap();
    assert_eq!(path.file_name().unwrap(), "expenses-2024-03-07.json");

    let storage = JsonFileStorage::new(temp.path().join("data")).unwrap();
    let mut target = TransactionStore::open(Box::new(storage)).unwrap();
    let report = import_from_path(&mut target, &path).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(target.list(), source.list());
}

#[test]
fn import_replaces_instead_of_merging() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("incoming.json");
    fs::write(
        &file,
        r#"[{"id":"x1","title":"Bonus","amount":300,"date":"2024-03-12","type":"income"}]"#,
    )
    .unwrap();

    let mut store = seeded_store();
    import_from_path(&mut store, &file).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id.as_str(), "x1");
}

#[test]
fn rejected_import_leaves_store_untouched() {
    let temp = tempdir().unwrap();
    let mut store = seeded_store();
    let before = store.list().to_vec();

    let not_array = temp.path().join("object.json");
    fs::write(&not_array, r#"{"not":"an array"}"#).unwrap();
    let err = import_from_path(&mut store, &not_array).unwrap_err();
    assert!(matches!(err, ExpenseError::ImportRejected(_)));

    let all_invalid = temp.path().join("invalid.json");
    fs::write(&all_invalid, r#"[{"title":"No amount","date":"2024-03-01"}]"#).unwrap();
    assert!(import_from_path(&mut store, &all_invalid).is_err());

    let missing = temp.path().join("missing.json");
    assert!(matches!(
        import_from_path(&mut store, &missing),
        Err(ExpenseError::Io(_))
    ));

    assert_eq!(store.list(), before.as_slice());
}

#[test]
fn partially_valid_import_keeps_the_valid_records() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("mixed.json");
    fs::write(
        &file,
        r#"[
            {"title":"Lunch","amount":12.5,"date":"2024-03-04T12:30:00"},
            {"title":"Broken","amount":"12","date":"2024-03-04"},
            {"title":"Legacy","amount":7,"date":"2024-03-05","kind":"income"}
        ]"#,
    )
    .unwrap();

    let mut store = seeded_store();
    let report = import_from_path(&mut store, &file).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    let titles: Vec<&str> = store.list().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Lunch", "Legacy"]);
    assert_eq!(store.list()[0].kind, TransactionKind::Expense);
    assert_eq!(store.list()[1].kind, TransactionKind::Income);
}
