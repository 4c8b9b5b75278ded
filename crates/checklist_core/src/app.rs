//! Application bootstrap: configuration and startup wiring.
//!
//! # Responsibility
//! - Resolve on-disk locations for the item database and preference file.
//! - Open both stores at startup and hand out controllers bound to them.
//!
//! # Invariants
//! - Startup either yields fully usable stores or a diagnostic error; there
//!   is no degraded mode without persistence.
//! - Preferences are read from disk once, at open.
//! - Every controller handed out by one storage shares a single change
//!   feed, so a write through any of them refreshes all live readers.

use crate::controller::list_controller::{ControllerResult, ListController};
use crate::controller::view::DEFAULT_HEADER_LABEL;
use crate::db::{open_db, DbError};
use crate::prefs::{CachedPreferenceStore, FilePreferenceStore, Preferences, PrefsError};
use crate::reactive::ChangeFeed;
use crate::repo::item_repo::SqliteItemRepository;
use crate::store::item_store::{ItemStore, StoreChange};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const DEFAULT_DB_FILE_NAME: &str = "checklist.sqlite3";
pub const DEFAULT_PREFS_FILE_NAME: &str = "preferences.json";

pub type AppResult<T> = Result<T, AppError>;

/// Controller type handed out by [`ChecklistStorage::controller`].
pub type StorageController<'a> =
    ListController<SqliteItemRepository<'a>, &'a CachedPreferenceStore<FilePreferenceStore>>;

/// Startup failure. Callers treat every variant as fatal.
#[derive(Debug)]
pub enum AppError {
    DataDir { path: PathBuf, source: io::Error },
    Db(DbError),
    Prefs(PrefsError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDir { path, source } => write!(
                f,
                "cannot create checklist data directory `{}`: {source}",
                path.display()
            ),
            Self::Db(err) => write!(f, "cannot open checklist store: {err}"),
            Self::Prefs(err) => write!(f, "cannot load preferences: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataDir { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::Prefs(err) => Some(err),
        }
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<PrefsError> for AppError {
    fn from(value: PrefsError) -> Self {
        Self::Prefs(value)
    }
}

/// Where the checklist keeps its data and how the header is labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub prefs_file_name: String,
    pub header_label: String,
}

impl ChecklistConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            prefs_file_name: DEFAULT_PREFS_FILE_NAME.to_string(),
            header_label: DEFAULT_HEADER_LABEL.to_string(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(&self.prefs_file_name)
    }
}

/// Opened item database plus preference file.
pub struct ChecklistStorage {
    conn: Connection,
    prefs: CachedPreferenceStore<FilePreferenceStore>,
    feed: Rc<ChangeFeed<StoreChange>>,
    header_label: String,
}

impl ChecklistStorage {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn pref_store(&self) -> &CachedPreferenceStore<FilePreferenceStore> {
        &self.prefs
    }

    /// Preferences as loaded at open, plus any changes saved since.
    pub fn preferences(&self) -> Preferences {
        self.prefs.current()
    }

    /// Builds a controller over this storage with current preferences.
    ///
    /// Controllers from the same storage observe each other's writes.
    pub fn controller(&self) -> ControllerResult<StorageController<'_>> {
        let store = ItemStore::with_feed(
            SqliteItemRepository::new(&self.conn),
            Rc::clone(&self.feed),
        );
        let controller = ListController::from_store(store, &self.prefs, self.prefs.current())?;
        Ok(controller.with_header_label(self.header_label.as_str()))
    }
}

/// Opens the checklist stores described by `config`.
///
/// # Errors
/// - The data directory cannot be created.
/// - The database cannot be opened or migrated.
/// - The preference file exists but cannot be read or parsed.
pub fn open_checklist(config: &ChecklistConfig) -> AppResult<ChecklistStorage> {
    ensure_data_dir(&config.data_dir)?;

    let conn = open_db(config.db_path()).map_err(|err| {
        error!("event=app_open module=app status=error error_code=db_unavailable error={err}");
        AppError::from(err)
    })?;

    let prefs = CachedPreferenceStore::open(FilePreferenceStore::new(config.prefs_path()))
        .map_err(|err| {
            error!(
                "event=app_open module=app status=error error_code=prefs_unavailable error={err}"
            );
            AppError::from(err)
        })?;

    info!(
        "event=app_open module=app status=ok data_dir={} swipe_to_delete={}",
        config.data_dir.display(),
        prefs.current().swipe_to_delete_is_on
    );

    Ok(ChecklistStorage {
        conn,
        prefs,
        feed: Rc::new(ChangeFeed::new()),
        header_label: config.header_label.clone(),
    })
}

fn ensure_data_dir(path: &Path) -> AppResult<()> {
    std::fs::create_dir_all(path).map_err(|source| {
        error!(
            "event=app_open module=app status=error error_code=data_dir_unavailable path={}",
            path.display()
        );
        AppError::DataDir {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{ChecklistConfig, DEFAULT_DB_FILE_NAME, DEFAULT_PREFS_FILE_NAME};
    use std::path::Path;

    #[test]
    fn config_paths_live_under_data_dir() {
        let config = ChecklistConfig::new("/data/checklist");
        assert_eq!(
            config.db_path(),
            Path::new("/data/checklist").join(DEFAULT_DB_FILE_NAME)
        );
        assert_eq!(
            config.prefs_path(),
            Path::new("/data/checklist").join(DEFAULT_PREFS_FILE_NAME)
        );
        assert_eq!(config.header_label, "Grocery");
    }
}
