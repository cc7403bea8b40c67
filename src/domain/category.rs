use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("colour pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    pub name: &'static str,
    pub color: &'static str,
}

/// Seeded for every new user, in display order.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 6] = [
    DefaultCategory { name: "Work", color: "#a78bfa" },
    DefaultCategory { name: "Personal", color: "#60a5fa" },
    DefaultCategory { name: "Health", color: "#4ade80" },
    DefaultCategory { name: "Finance", color: "#facc15" },
    DefaultCategory { name: "Learning", color: "#f472b6" },
    DefaultCategory { name: "Projects", color: "#fb923c" },
];

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive name comparison; names are unique per user under it.
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    pub fn apply(&mut self, update: &CategoryUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(color) = &update.color {
            self.color = color.clone();
        }
    }
}

pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub fn is_valid_color(color: &str) -> bool {
    COLOR_PATTERN.is_match(color)
}

/// Builds the default set with strictly increasing creation times so that
/// creation order matches `DEFAULT_CATEGORIES`.
pub fn default_categories() -> Vec<Category> {
    let base = Utc::now();
    DEFAULT_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, def)| Category {
            created_at: base + Duration::milliseconds(i as i64),
            ..Category::new(def.name, def.color)
        })
        .collect()
}
