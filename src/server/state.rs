use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::config::Config;
use crate::error::WheelError;
use crate::selection::SpinOutcome;
use crate::spinner::Spinner;
use crate::store::Store;

pub struct AppState {
    pub config: Config,
    store: Mutex<Store>,
    /// One spinner per user, created on first spin.
    spinners: Mutex<HashMap<String, Spinner>>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            store: Mutex::new(store),
            spinners: Mutex::new(HashMap::new()),
        })
    }

    /// Lock the store. A panicked request leaves the document consistent
    /// (mutations roll back on error), so poisoning is ignored.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the store after re-reading the data file, so reads include
    /// writes made by other processes (the CLI, the viewer).
    pub fn fresh_store(&self) -> Result<MutexGuard<'_, Store>, WheelError> {
        let mut store = self.store();
        store.reload()?;
        Ok(store)
    }

    /// Spin the user's wheel, creating their spinner on first use.
    pub fn spin(&self, user_id: &str, now: Instant) -> Result<SpinOutcome, WheelError> {
        let items = self.fresh_store()?.wheel_items(user_id);
        if items.is_empty() {
            return Err(WheelError::EmptyWheel);
        }
        let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
        let spinner = spinners
            .entry(user_id.to_owned())
            .or_insert_with(|| Spinner::with_duration(self.config.spin_duration()));
        spinner.spin(&items, now)
    }

    /// Rotation and spinning flag to draw for `user_id` at `now`.
    pub fn pose(&self, user_id: &str, now: Instant) -> (f64, bool) {
        let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
        match spinners.get_mut(user_id) {
            Some(spinner) => {
                spinner.tick(now);
                (spinner.rotation_at(now), spinner.is_spinning())
            }
            None => (0.0, false),
        }
    }
}
