//! Persisted user preferences.
//!
//! # Responsibility
//! - Model the interaction preferences as one explicit struct.
//! - Load them once at startup and write them through on every change.
//!
//! # Invariants
//! - A missing preference file yields defaults.
//! - A malformed preference file is an error, never silently reset.
//! - [`CachedPreferenceStore`] reads its backing store exactly once.

use log::info;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub type PrefsResult<T> = Result<T, PrefsError>;

/// Interaction preferences shared with the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Rows are removed by swipe instead of an inline delete control.
    #[serde(default)]
    pub swipe_to_delete_is_on: bool,
}

#[derive(Debug)]
pub enum PrefsError {
    Io { path: PathBuf, source: io::Error },
    Malformed { path: PathBuf, source: serde_json::Error },
}

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "preference file `{}` I/O failed: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "preference file `{}` is malformed: {source}", path.display())
            }
        }
    }
}

impl Error for PrefsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
        }
    }
}

/// Key-value style storage for [`Preferences`].
pub trait PreferenceStore {
    fn load(&self) -> PrefsResult<Preferences>;
    fn save(&self, prefs: &Preferences) -> PrefsResult<()>;
}

/// JSON file-backed preference store.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> PrefsResult<Preferences> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=prefs_load module=prefs status=ok source=default");
                return Ok(Preferences::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let prefs = serde_json::from_str(&content).map_err(|source| PrefsError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        info!("event=prefs_load module=prefs status=ok source=file");
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> PrefsResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;
        }

        let content = serde_json::to_string_pretty(prefs).map_err(|source| {
            PrefsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        // Readers only ever observe a complete file.
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;

        info!(
            "event=prefs_save module=prefs status=ok swipe_to_delete={}",
            prefs.swipe_to_delete_is_on
        );
        Ok(())
    }
}

/// In-process preference store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    current: RefCell<Preferences>,
    loads: Cell<usize>,
    saves: Cell<usize>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: Preferences) -> Self {
        Self {
            current: RefCell::new(initial),
            loads: Cell::new(0),
            saves: Cell::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> PrefsResult<Preferences> {
        self.loads.set(self.loads.get() + 1);
        Ok(*self.current.borrow())
    }

    fn save(&self, prefs: &Preferences) -> PrefsResult<()> {
        *self.current.borrow_mut() = *prefs;
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Write-through cache over another store, loaded once on open.
pub struct CachedPreferenceStore<P: PreferenceStore> {
    inner: P,
    current: Cell<Preferences>,
}

impl<P: PreferenceStore> CachedPreferenceStore<P> {
    pub fn open(inner: P) -> PrefsResult<Self> {
        let current = inner.load()?;
        Ok(Self {
            inner,
            current: Cell::new(current),
        })
    }

    pub fn current(&self) -> Preferences {
        self.current.get()
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: PreferenceStore> PreferenceStore for CachedPreferenceStore<P> {
    fn load(&self) -> PrefsResult<Preferences> {
        Ok(self.current.get())
    }

    /// The cache only changes once the backing store accepted the write.
    fn save(&self, prefs: &Preferences) -> PrefsResult<()> {
        self.inner.save(prefs)?;
        self.current.set(*prefs);
        Ok(())
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for &P {
    fn load(&self) -> PrefsResult<Preferences> {
        (**self).load()
    }

    fn save(&self, prefs: &Preferences) -> PrefsResult<()> {
        (**self).save(prefs)
    }
}
