//! Timer state persistence

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};
use anyhow::{anyhow, Context};
use tracing::{debug, info, warn};

use crate::state::TimerState;

/// Storage for the last known timer state
pub trait StateStore: Send + Sync {
    /// Read the persisted state; `None` when nothing was saved yet
    fn load(&self) -> anyhow::Result<Option<TimerState>>;

    /// Persist the state, replacing whatever was stored before
    fn save(&self, state: &TimerState) -> anyhow::Result<()>;
}

/// Load the persisted state, falling back to the default on first run or on a bad file
pub fn load_or_default(store: &dyn StateStore) -> TimerState {
    match store.load() {
        Ok(Some(state)) => {
            let state = state.normalized();
            info!("Restored timer state: {} ({})", state.display(), state.mode);
            state
        }
        Ok(None) => {
            info!("No saved timer state, starting fresh");
            TimerState::new()
        }
        Err(e) => {
            warn!("Failed to load timer state, starting fresh: {:#}", e);
            TimerState::new()
        }
    }
}

/// JSON file store: `{"seconds": <int>, "mode": "<mode>"}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> anyhow::Result<Option<TimerState>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        let state = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(Some(state))
    }

    fn save(&self, state: &TimerState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string(state)?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Saved timer state to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store used with `--no-persist` and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<TimerState>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved state
    pub fn with_state(state: TimerState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Last saved state, if any
    pub fn saved(&self) -> Option<TimerState> {
        self.state.lock().ok().and_then(|s| *s)
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Option<TimerState>> {
        self.state
            .lock()
            .map(|s| *s)
            .map_err(|e| anyhow!("Failed to lock memory store: {}", e))
    }

    fn save(&self, state: &TimerState) -> anyhow::Result<()> {
        let mut stored = self.state
            .lock()
            .map_err(|e| anyhow!("Failed to lock memory store: {}", e))?;
        *stored = Some(*state);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
