//! Local persistence for users, the recipe catalog, and wheels.
//!
//! Everything lives in one JSON document (`food-wheel.json` in the data
//! directory). Several processes may share that file (`serve` alongside the
//! CLI or the viewer), so each mutating call takes an exclusive advisory lock
//! on `food-wheel.json.lock`, re-reads the latest document, applies the change,
//! and writes the file through a temp file + rename before unlocking. If the
//! write fails the snapshot is restored, so a caller never observes half of an
//! operation.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::WheelError;
use crate::wheel::{SourceType, Wheel, WheelItem};

/// Names seeded into the shared catalog on first open, in id order.
pub const POPULAR_RECIPES: [&str; 18] = [
    "Pizza",
    "Burger",
    "Sushi",
    "Pasta",
    "Tacos",
    "Ramen",
    "Fried Chicken",
    "Salad",
    "Steak",
    "Soup",
    "Sandwich",
    "Curry",
    "BBQ",
    "Seafood",
    "Dessert",
    "Breakfast",
    "Chinese Food",
    "Italian Food",
];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularRecipe {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRecipe {
    pub id: u64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// On-disk document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Database {
    users: Vec<User>,
    popular_recipes: Vec<PopularRecipe>,
    custom_recipes: Vec<CustomRecipe>,
    next_custom_id: u64,
    wheels: BTreeMap<String, Wheel>,
}

impl Database {
    fn seed_popular(&mut self) -> bool {
        if !self.popular_recipes.is_empty() {
            return false;
        }
        self.popular_recipes = POPULAR_RECIPES
            .iter()
            .zip(1..)
            .map(|(name, id)| PopularRecipe {
                id,
                name: (*name).to_owned(),
            })
            .collect();
        true
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    /// `None` keeps the document in memory only.
    path: Option<PathBuf>,
    db: Database,
}

impl Store {
    /// Open (or create) the document at `path` and seed the catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, WheelError> {
        let path = path.into();
        let mut store = Self {
            path: Some(path),
            db: Database::default(),
        };
        let _lock = store.lock()?;
        match store.read_latest()? {
            Some(db) => store.db = db,
            None => {
                info!(target: "store", path = ?store.path, "Creating new wheel database");
            }
        }
        if store.db.seed_popular() {
            store.persist()?;
        }
        Ok(store)
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        let mut db = Database::default();
        db.seed_popular();
        Self { path: None, db }
    }

    /// Re-read the document from disk, picking up changes made by other
    /// processes. A missing file keeps the current state.
    pub fn reload(&mut self) -> Result<(), WheelError> {
        if let Some(db) = self.read_latest()? {
            self.db = db;
        }
        Ok(())
    }

    // --- Users ---------------------------------------------------------------

    /// Return the installation's user id, creating it on first use.
    pub fn resolve_user(&mut self) -> Result<String, WheelError> {
        if let Some(user) = self.db.users.first() {
            return Ok(user.id.clone());
        }
        // Another process may have created the user since this handle loaded.
        self.mutate(|db| {
            if let Some(user) = db.users.first() {
                return Ok(user.id.clone());
            }
            let id = Uuid::new_v4().to_string();
            db.users.push(User {
                id: id.clone(),
                created_at: Utc::now(),
            });
            info!(target: "store", user_id = %id, "Created user");
            Ok(id)
        })
    }

    // --- Catalog -------------------------------------------------------------

    /// The shared catalog, sorted by name.
    pub fn popular_recipes(&self) -> Vec<PopularRecipe> {
        let mut recipes = self.db.popular_recipes.clone();
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        recipes
    }

    /// A user's custom recipes, newest first.
    pub fn custom_recipes(&self, user_id: &str) -> Vec<CustomRecipe> {
        let mut recipes: Vec<CustomRecipe> = self
            .db
            .custom_recipes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        recipes
    }

    // --- Wheel ---------------------------------------------------------------

    /// A user's wheel items in creation order. Unknown users have an empty wheel.
    pub fn wheel_items(&self, user_id: &str) -> Vec<WheelItem> {
        self.db
            .wheels
            .get(user_id)
            .map(|w| w.list().to_vec())
            .unwrap_or_default()
    }

    pub fn add_wheel_item(
        &mut self,
        user_id: &str,
        name: &str,
        source_type: SourceType,
    ) -> Result<WheelItem, WheelError> {
        let item = self.mutate(|db| {
            db.wheels
                .entry(user_id.to_owned())
                .or_default()
                .add(name, source_type)
        })?;
        info!(target: "store", user_id, name, %source_type, "Added recipe to wheel");
        Ok(item)
    }

    /// Idempotent: removing an absent name succeeds.
    pub fn remove_wheel_item(&mut self, user_id: &str, name: &str) -> Result<(), WheelError> {
        let removed = self.mutate(|db| {
            Ok(db
                .wheels
                .get_mut(user_id)
                .is_some_and(|wheel| wheel.remove(name)))
        })?;
        if removed {
            info!(target: "store", user_id, name, "Removed recipe from wheel");
        } else {
            debug!(target: "store", user_id, name, "Remove of absent recipe ignored");
        }
        Ok(())
    }

    /// Create a custom recipe and place it on the wheel as one step.
    pub fn create_custom_recipe(&mut self, user_id: &str, name: &str) -> Result<WheelItem, WheelError> {
        let item = self.mutate(|db| {
            if db
                .custom_recipes
                .iter()
                .any(|r| r.user_id == user_id && r.name == name)
            {
                return Err(WheelError::DuplicateCustomRecipe(name.to_owned()));
            }

            db.next_custom_id += 1;
            db.custom_recipes.push(CustomRecipe {
                id: db.next_custom_id,
                user_id: user_id.to_owned(),
                name: name.to_owned(),
                created_at: Utc::now(),
            });

            db.wheels
                .entry(user_id.to_owned())
                .or_default()
                .add(name, SourceType::Custom)
        })?;
        info!(target: "store", user_id, name, "Created custom recipe");
        Ok(item)
    }

    // --- Internals -----------------------------------------------------------

    /// Under the file lock: refresh from disk, apply `change`, persist, and
    /// keep the result only on success.
    fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut Database) -> Result<T, WheelError>,
    ) -> Result<T, WheelError> {
        let _lock = self.lock()?;
        if let Some(db) = self.read_latest()? {
            self.db = db;
        }
        let snapshot = self.db.clone();
        let value = match change(&mut self.db) {
            Ok(value) => value,
            Err(e) => {
                self.db = snapshot;
                return Err(e);
            }
        };
        if let Err(e) = self.persist() {
            warn!(target: "store", "Write failed, rolling back: {e}");
            self.db = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    /// Exclusive lock on the sidecar lock file, released when the handle drops.
    /// The data file itself is replaced by rename, so it can't carry the lock.
    fn lock(&self) -> Result<Option<File>, WheelError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        ensure_parent(path)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.with_extension("json.lock"))?;
        file.lock_exclusive()?;
        Ok(Some(file))
    }

    /// The document currently on disk, or `None` when there is no file yet.
    fn read_latest(&self) -> Result<Option<Database>, WheelError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let mut db: Database = serde_json::from_str(&text)?;
                db.seed_popular();
                Ok(Some(db))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self) -> Result<(), WheelError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        ensure_parent(path)?;
        let json = serde_json::to_string_pretty(&self.db)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<(), WheelError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
