use checklist_core::{open_checklist, AppError, ChecklistConfig, PreferenceStore};

#[test]
fn open_checklist_creates_data_dir_and_persists_items() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChecklistConfig::new(dir.path().join("data"));

    {
        let storage = open_checklist(&config).unwrap();
        let mut list = storage.controller().unwrap();
        list.submit_new_item("Milk").unwrap();
        list.toggle_swipe_to_delete().unwrap();
    }

    assert!(config.db_path().exists());
    assert!(config.prefs_path().exists());

    let storage = open_checklist(&config).unwrap();
    assert!(storage.pref_store().load().unwrap().swipe_to_delete_is_on);
    let list = storage.controller().unwrap();
    let view = list.view();
    assert_eq!(view.total_count, 1);
    assert_eq!(view.rows[0].name, "Milk");
    assert!(view.swipe_to_delete_is_on);
}

#[test]
fn malformed_preferences_fail_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChecklistConfig::new(dir.path());
    std::fs::write(config.prefs_path(), "not json").unwrap();

    let err = open_checklist(&config).err().unwrap();
    assert!(matches!(err, AppError::Prefs(_)));
    assert!(err.to_string().contains("preferences"));
}

#[test]
fn unusable_data_dir_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let config = ChecklistConfig::new(blocker.join("nested"));

    let err = open_checklist(&config).err().unwrap();
    assert!(matches!(err, AppError::DataDir { .. }));
}

#[test]
fn controllers_from_one_storage_observe_each_others_writes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_checklist(&ChecklistConfig::new(dir.path())).unwrap();

    let reader = storage.controller().unwrap();
    let mut writer = storage.controller().unwrap();
    let milk = writer.submit_new_item("Milk").unwrap().unwrap();

    assert_eq!(writer.total_count(), 1);
    assert_eq!(reader.total_count(), 1);
    assert_eq!(reader.uncompleted_count(), 1);
    assert_eq!(reader.view().rows[0].id, milk.id);

    writer.toggle_complete(milk.id).unwrap();
    assert_eq!(reader.uncompleted_count(), 0);
}

#[test]
fn preferences_are_read_once_at_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChecklistConfig::new(dir.path());
    std::fs::write(config.prefs_path(), r#"{"swipe_to_delete_is_on": true}"#).unwrap();

    let storage = open_checklist(&config).unwrap();
    std::fs::write(config.prefs_path(), "not json").unwrap();

    let list = storage.controller().unwrap();
    assert!(list.preferences().swipe_to_delete_is_on);
    assert!(storage.preferences().swipe_to_delete_is_on);
}

#[test]
fn preference_change_is_seen_by_later_controllers() {
    let dir = tempfile::tempdir().unwrap();
    let storage = open_checklist(&ChecklistConfig::new(dir.path())).unwrap();

    storage
        .controller()
        .unwrap()
        .set_swipe_to_delete(true)
        .unwrap();

    assert!(storage.controller().unwrap().preferences().swipe_to_delete_is_on);
}
