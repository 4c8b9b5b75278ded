use checklist_core::db::open_db_in_memory;
use checklist_core::{Item, ItemRepository, RepoError, SqliteItemRepository};
use uuid::Uuid;

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let item = Item::new("Milk");
    let id = repo.insert_item(&item).unwrap();

    let loaded = repo.get_item(id).unwrap().unwrap();
    assert_eq!(loaded, item);
}

#[test]
fn get_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    assert!(repo.get_item(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_writes_name_and_complete_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let original = Item::with_id(Uuid::new_v4(), "Milk", 1_000);
    repo.insert_item(&original).unwrap();

    let mut edited = original.clone();
    edited.name = "Oat milk".to_string();
    edited.complete = true;
    edited.creation_date = 9_999;
    repo.update_item(&edited).unwrap();

    let loaded = repo.get_item(original.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Oat milk");
    assert!(loaded.complete);
    assert_eq!(loaded.creation_date, 1_000);
}

#[test]
fn update_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let item = Item::new("ghost");
    let err = repo.update_item(&item).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == item.id));
}

#[test]
fn list_orders_by_creation_date_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let oldest = Item::with_id(Uuid::new_v4(), "oldest", 1_000);
    let newest = Item::with_id(Uuid::new_v4(), "newest", 3_000);
    let middle = Item::with_id(Uuid::new_v4(), "middle", 2_000);
    for item in [&oldest, &newest, &middle] {
        repo.insert_item(item).unwrap();
    }

    let names = repo
        .list_items()
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["newest", "middle", "oldest"]);
}

#[test]
fn list_puts_latest_insert_first_on_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let first = Item::with_id(Uuid::new_v4(), "first", 5_000);
    let second = Item::with_id(Uuid::new_v4(), "second", 5_000);
    repo.insert_item(&first).unwrap();
    repo.insert_item(&second).unwrap();

    let listed = repo.list_items().unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn duplicate_names_are_allowed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    repo.insert_item(&Item::new("Milk")).unwrap();
    repo.insert_item(&Item::new("Milk")).unwrap();

    assert_eq!(repo.list_items().unwrap().len(), 2);
}

#[test]
fn delete_is_permanent_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let item = Item::new("Bread");
    repo.insert_item(&item).unwrap();
    repo.delete_item(item.id).unwrap();

    assert!(repo.get_item(item.id).unwrap().is_none());
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);

    let err = repo.delete_item(item.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn batch_delete_is_all_or_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    let kept = Item::new("kept");
    let doomed = Item::new("doomed");
    repo.insert_item(&kept).unwrap();
    repo.insert_item(&doomed).unwrap();

    let err = repo
        .delete_items(&[doomed.id, Uuid::new_v4()])
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(repo.list_items().unwrap().len(), 2);

    assert_eq!(repo.delete_items(&[doomed.id, kept.id]).unwrap(), 2);
    assert!(repo.list_items().unwrap().is_empty());
    assert_eq!(repo.delete_items(&[]).unwrap(), 0);
}

#[test]
fn delete_all_reports_removed_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    for name in ["a", "b", "c"] {
        repo.insert_item(&Item::new(name)).unwrap();
    }

    assert_eq!(repo.delete_all_items().unwrap(), 3);
    assert_eq!(repo.delete_all_items().unwrap(), 0);
}

#[test]
fn malformed_rows_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&conn);

    conn.execute(
        "INSERT INTO items (id, name, complete, creation_date) VALUES ('not-a-uuid', 'x', 0, 1);",
        [],
    )
    .unwrap();

    let err = repo.list_items().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("not-a-uuid")));
}
