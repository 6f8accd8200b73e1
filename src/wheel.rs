//! Wheel state model.
//!
//! A [`Wheel`] is the ordered, capacity-bounded set of recipes a user can
//! spin. Names are unique (exact, case-sensitive match) and each item keeps
//! the palette color it was given at insertion, even after other items leave.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WheelError;
use crate::palette;

/// Maximum number of items on one wheel.
pub const MAX_ITEMS: usize = 12;

/// Where a wheel item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Popular,
    Custom,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Popular => "popular",
            SourceType::Custom => "custom",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = WheelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(SourceType::Popular),
            "custom" => Ok(SourceType::Custom),
            other => Err(WheelError::validation(format!(
                "Source type must be 'popular' or 'custom', got '{other}'"
            ))),
        }
    }
}

/// One candidate currently placed on the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelItem {
    pub id: u64,
    pub recipe_name: String,
    pub source_type: SourceType,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered collection of wheel items, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wheel {
    items: Vec<WheelItem>,
    /// Next id to hand out. Never decreases, so ids are not reused.
    next_id: u64,
}

impl Wheel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `name` at the end of the wheel.
    ///
    /// Duplicates are rejected before capacity, so re-adding an existing
    /// name on a full wheel reports the duplicate.
    pub fn add(&mut self, name: &str, source_type: SourceType) -> Result<WheelItem, WheelError> {
        if name.is_empty() {
            return Err(WheelError::validation("Recipe name required"));
        }
        if self.contains(name) {
            return Err(WheelError::DuplicateItem(name.to_owned()));
        }
        if self.is_full() {
            return Err(WheelError::WheelFull);
        }

        self.next_id += 1;
        let item = WheelItem {
            id: self.next_id,
            recipe_name: name.to_owned(),
            source_type,
            color: palette::color(self.items.len()).to_owned(),
            created_at: Utc::now(),
        };
        debug!(target: "wheel", name, color = %item.color, "item added");
        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove the item named `name`. Returns whether anything was removed;
    /// a missing name is not an error.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.recipe_name != name);
        let removed = self.items.len() != before;
        if removed {
            debug!(target: "wheel", name, "item removed");
        }
        removed
    }

    pub fn list(&self) -> &[WheelItem] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.recipe_name == name)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= MAX_ITEMS
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
