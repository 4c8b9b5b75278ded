//! FFI use-case API for the Flutter checklist screen.
//!
//! # Responsibility
//! - Expose every checklist gesture as a sync, use-case level function.
//! - Return the fresh screen snapshot after each mutation so the UI can
//!   re-render without polling.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported through envelopes (`ok=false` + message).
//! - `show_completed` is UI session state and is passed in by the caller.

use checklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_checklist,
    ping as ping_inner, ChecklistConfig, ChecklistView, ControllerResult, Item, ItemId,
    StorageController,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

const FALLBACK_DATA_DIR_NAME: &str = "checklist";
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Binds the checklist to the app's data directory and opens it once.
///
/// # FFI contract
/// - Must be called before any other checklist call; once a directory
///   opened successfully, calls with a different directory are rejected.
/// - A failed open leaves the process unbound, so a corrected retry works.
/// - Returns empty string on success and a diagnostic message on failure.
///   A failure is fatal for the app: the store is unusable.
#[flutter_rust_bridge::frb(sync)]
pub fn init_checklist(data_dir: String) -> String {
    bind_data_dir(&DATA_DIR, data_dir.as_str())
}

fn bind_data_dir(slot: &OnceLock<PathBuf>, data_dir: &str) -> String {
    let trimmed = data_dir.trim();
    if trimmed.is_empty() {
        return "data_dir cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    if let Some(active) = slot.get() {
        if *active != requested {
            return switch_refused(active, &requested);
        }
    }

    if let Err(err) = open_checklist(&ChecklistConfig::new(requested.clone())) {
        warn!("event=ffi_init module=ffi status=error error_code=open_failed");
        return err.to_string();
    }

    // Another caller may have bound a directory while this one was opening.
    let active = slot.get_or_init(|| requested.clone());
    if *active != requested {
        return switch_refused(active, &requested);
    }
    info!("event=ffi_init module=ffi status=ok");
    String::new()
}

fn switch_refused(active: &Path, requested: &Path) -> String {
    format!(
        "checklist already initialized at `{}`; refusing to switch to `{}`",
        active.display(),
        requested.display()
    )
}

/// One rendered checklist row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    /// Stable item ID in string form.
    pub item_id: String,
    pub name: String,
    pub complete: bool,
    /// Unix epoch milliseconds.
    pub creation_date_ms: i64,
}

/// Screen snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistSnapshot {
    /// Whether the call that produced this snapshot succeeded.
    pub ok: bool,
    /// Human-readable result or error message.
    pub message: String,
    /// Item touched by the call, when there is one.
    pub item_id: Option<String>,
    /// Rendered rows, newest first, filtered by `show_completed`.
    pub rows: Vec<ChecklistRow>,
    pub uncompleted_count: u32,
    pub total_count: u32,
    /// Aggregate header text, e.g. `Grocery: 2: 5`.
    pub header: String,
    pub show_completed: bool,
    pub swipe_to_delete_is_on: bool,
    /// Rows expose an inline delete button.
    pub inline_delete: bool,
    /// Rows accept swipe removal.
    pub swipe_delete: bool,
    /// Set only when the store is empty.
    pub empty_message: Option<String>,
}

impl ChecklistSnapshot {
    fn from_view(view: ChecklistView, message: impl Into<String>, item_id: Option<ItemId>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            item_id: item_id.map(|id| id.to_string()),
            rows: view.rows.into_iter().map(to_row).collect(),
            uncompleted_count: saturating_u32(view.uncompleted_count),
            total_count: saturating_u32(view.total_count),
            header: view.header,
            show_completed: view.show_completed,
            swipe_to_delete_is_on: view.swipe_to_delete_is_on,
            inline_delete: view.affordances.inline_delete,
            swipe_delete: view.affordances.swipe_delete,
            empty_message: view.empty_message,
        }
    }

    fn failure(message: impl Into<String>, show_completed: bool) -> Self {
        Self {
            ok: false,
            message: message.into(),
            item_id: None,
            rows: Vec::new(),
            uncompleted_count: 0,
            total_count: 0,
            header: String::new(),
            show_completed,
            swipe_to_delete_is_on: false,
            inline_delete: false,
            swipe_delete: false,
            empty_message: None,
        }
    }
}

/// Reads the current screen state.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_snapshot(show_completed: bool) -> ChecklistSnapshot {
    run("checklist_snapshot", show_completed, |_| {
        Ok(("Loaded.".to_string(), None))
    })
}

/// Creates an item from the new-item field. Empty text is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_create_item(name: String, show_completed: bool) -> ChecklistSnapshot {
    run("checklist_create_item", show_completed, |list| {
        Ok(match list.submit_new_item(&name)? {
            Some(item) => ("Item created.".to_string(), Some(item.id)),
            None => ("Nothing to add.".to_string(), None),
        })
    })
}

/// Replaces an item's name. Any text is accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_rename_item(
    item_id: String,
    name: String,
    show_completed: bool,
) -> ChecklistSnapshot {
    with_item_id("checklist_rename_item", &item_id, show_completed, |list, id| {
        let item = list.rename_item(id, &name)?;
        Ok(("Item renamed.".to_string(), Some(item.id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_set_complete(
    item_id: String,
    complete: bool,
    show_completed: bool,
) -> ChecklistSnapshot {
    with_item_id("checklist_set_complete", &item_id, show_completed, |list, id| {
        let item = list.set_complete(id, complete)?;
        Ok(("Item updated.".to_string(), Some(item.id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn checklist_toggle_complete(item_id: String, show_completed: bool) -> ChecklistSnapshot {
    with_item_id(
        "checklist_toggle_complete",
        &item_id,
        show_completed,
        |list, id| {
            let item = list.toggle_complete(id)?;
            Ok(("Item updated.".to_string(), Some(item.id)))
        },
    )
}

/// Inline delete control on one row.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_item(item_id: String, show_completed: bool) -> ChecklistSnapshot {
    with_item_id("checklist_delete_item", &item_id, show_completed, |list, id| {
        list.delete_item(id)?;
        Ok(("Item deleted.".to_string(), Some(id)))
    })
}

/// Swipe removal by rendered row position.
///
/// Rejected while swipe-to-delete is off or when any offset is out of range.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_offsets(offsets: Vec<u32>, show_completed: bool) -> ChecklistSnapshot {
    run("checklist_delete_offsets", show_completed, |list| {
        let offsets = offsets
            .iter()
            .map(|offset| *offset as usize)
            .collect::<Vec<_>>();
        let removed = list.delete_at_offsets(&offsets)?;
        Ok((format!("Deleted {removed} item(s)."), None))
    })
}

/// Confirmed "Delete All" from the menu.
///
/// The confirmation dialog lives in the UI; this call is the confirmed step.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_delete_all(show_completed: bool) -> ChecklistSnapshot {
    run("checklist_delete_all", show_completed, |list| {
        list.request_delete_all();
        let removed = list.confirm_delete_all()?;
        Ok((format!("Deleted {removed} item(s)."), None))
    })
}

/// Persists the swipe-to-delete preference.
#[flutter_rust_bridge::frb(sync)]
pub fn checklist_set_swipe_to_delete(enabled: bool, show_completed: bool) -> ChecklistSnapshot {
    run("checklist_set_swipe_to_delete", show_completed, |list| {
        list.set_swipe_to_delete(enabled)?;
        Ok(("Preference saved.".to_string(), None))
    })
}

fn run(
    operation: &'static str,
    show_completed: bool,
    action: impl FnOnce(&mut StorageController<'_>) -> ControllerResult<(String, Option<ItemId>)>,
) -> ChecklistSnapshot {
    let config = ChecklistConfig::new(resolve_data_dir());
    let storage = match open_checklist(&config) {
        Ok(storage) => storage,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error_code=open_failed");
            return ChecklistSnapshot::failure(format!("{operation} failed: {err}"), show_completed);
        }
    };

    let mut list = match storage.controller() {
        Ok(list) => list,
        Err(err) => {
            return ChecklistSnapshot::failure(format!("{operation} failed: {err}"), show_completed)
        }
    };
    list.set_show_completed(show_completed);

    match action(&mut list) {
        Ok((message, item_id)) => ChecklistSnapshot::from_view(list.view(), message, item_id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={operation} error={err}");
            let mut snapshot = ChecklistSnapshot::from_view(list.view(), String::new(), None);
            snapshot.ok = false;
            snapshot.message = format!("{operation} failed: {err}");
            snapshot
        }
    }
}

fn with_item_id(
    operation: &'static str,
    item_id: &str,
    show_completed: bool,
    action: impl FnOnce(
        &mut StorageController<'_>,
        ItemId,
    ) -> ControllerResult<(String, Option<ItemId>)>,
) -> ChecklistSnapshot {
    let id = match Uuid::parse_str(item_id.trim()) {
        Ok(id) => id,
        Err(_) => {
            return ChecklistSnapshot::failure(
                format!("{operation} failed: invalid item_id `{item_id}`"),
                show_completed,
            )
        }
    };
    run(operation, show_completed, |list| action(list, id))
}

fn resolve_data_dir() -> PathBuf {
    DATA_DIR
        .get()
        .cloned()
        .unwrap_or_else(|| std::env::temp_dir().join(FALLBACK_DATA_DIR_NAME))
}

fn to_row(item: Item) -> ChecklistRow {
    ChecklistRow {
        item_id: item.id.to_string(),
        name: item.name,
        complete: item.complete,
        creation_date_ms: item.creation_date,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
