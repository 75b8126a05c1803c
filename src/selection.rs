//! User choices gathered across steps, with write-through persistence to an
//! opaque key-value store (`localStorage` in the browser).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Input groups a screen may carry. Declaration order is summary order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Dates,
    Food,
    Desserts,
    Activities,
    Gift,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Dates,
        Category::Food,
        Category::Desserts,
        Category::Activities,
        Category::Gift,
    ];

    /// `name` attribute of the form inputs for this category.
    pub fn input_name(self) -> &'static str {
        match self {
            Category::Dates => "date",
            Category::Food => "food",
            Category::Desserts => "dessert",
            Category::Activities => "activity",
            Category::Gift => "gift",
        }
    }
}

/// Persisted layout: `{ dates: [], food: [], desserts: [], activities: [], gift: "" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRecord {
    pub dates: Vec<String>,
    pub food: Vec<String>,
    pub desserts: Vec<String>,
    pub activities: Vec<String>,
    pub gift: String,
}

impl SelectionRecord {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
            && self.food.is_empty()
            && self.desserts.is_empty()
            && self.activities.is_empty()
            && self.gift.is_empty()
    }

    /// Tokens of one category; the gift yields zero or one token.
    pub fn tokens(&self, category: Category) -> Vec<&str> {
        let list = match category {
            Category::Dates => &self.dates,
            Category::Food => &self.food,
            Category::Desserts => &self.desserts,
            Category::Activities => &self.activities,
            Category::Gift => {
                return if self.gift.is_empty() {
                    Vec::new()
                } else {
                    vec![self.gift.as_str()]
                };
            }
        };
        list.iter().map(String::as_str).collect()
    }

    fn overwrite(&mut self, category: Category, mut values: Vec<String>) {
        // Multi-selects are sets; keep first-seen order.
        let mut seen = std::collections::HashSet::new();
        values.retain(|v| !v.is_empty() && seen.insert(v.clone()));
        match category {
            Category::Dates => self.dates = values,
            Category::Food => self.food = values,
            Category::Desserts => self.desserts = values,
            Category::Activities => self.activities = values,
            Category::Gift => self.gift = values.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Checked values for the categories present on the active screen. Categories
/// absent from the snapshot are left untouched by `SelectionStore::snapshot`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    fields: Vec<(Category, Vec<String>)>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with<I, S>(mut self, category: Category, checked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(category, checked);
        self
    }

    /// Record the checked values for `category`; an empty iterator means the
    /// category is on screen with nothing checked.
    pub fn insert<I, S>(&mut self, category: Category, checked: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = checked.into_iter().map(Into::into).collect();
        self.fields.retain(|(c, _)| *c != category);
        self.fields.push((category, values));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Opaque synchronous key-value storage. Writes are best effort.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store for native use and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Owns the in-memory record and mirrors it into storage under one key.
#[derive(Debug)]
pub struct SelectionStore<K> {
    record: SelectionRecord,
    storage: K,
    key: String,
}

impl<K: KeyValueStore> SelectionStore<K> {
    pub fn new(storage: K, key: impl Into<String>) -> Self {
        Self {
            record: SelectionRecord::default(),
            storage,
            key: key.into(),
        }
    }

    pub fn record(&self) -> &SelectionRecord {
        &self.record
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn into_storage(self) -> K {
        self.storage
    }

    /// Overwrite the categories present in `inputs`, then persist the whole record.
    pub fn snapshot(&mut self, inputs: &InputSnapshot) {
        for (category, values) in &inputs.fields {
            self.record.overwrite(*category, values.clone());
        }
        self.persist();
    }

    /// Read the persisted record, if any.
    pub fn load(&self) -> Result<Option<SelectionRecord>, FlowError> {
        match self.storage.get(&self.key) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(FlowError::MalformedPersistedState),
        }
    }

    /// Replace the in-memory record with the persisted one. Missing or
    /// malformed data leaves the current record as is. Returns whether a
    /// record was restored.
    pub fn restore(&mut self) -> bool {
        match self.load() {
            Ok(Some(record)) => {
                log::info!("restored saved selections");
                self.record = record;
                true
            }
            Ok(None) => false,
            Err(err) => {
                log::warn!("{err}; starting with empty selections");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.record = SelectionRecord::default();
        self.storage.remove(&self.key);
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.record) {
            Ok(json) => self.storage.set(&self.key, &json),
            Err(err) => log::warn!("could not serialize selections: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "valentineSelections";

    fn store() -> SelectionStore<MemoryStore> {
        SelectionStore::new(MemoryStore::new(), KEY)
    }

    #[test]
    fn snapshot_overwrites_only_present_categories() {
        let mut s = store();
        s.snapshot(&InputSnapshot::new().with(Category::Food, ["pizza", "sushi"]));
        s.snapshot(&InputSnapshot::new().with(Category::Dates, ["movie-night"]));
        assert_eq!(s.record().food, vec!["pizza", "sushi"]);
        assert_eq!(s.record().dates, vec!["movie-night"]);

        // Present but unchecked clears the category.
        s.snapshot(&InputSnapshot::new().with(Category::Food, Vec::<String>::new()));
        assert!(s.record().food.is_empty());
        assert_eq!(s.record().dates, vec!["movie-night"]);
    }

    #[test]
    fn snapshot_writes_through() {
        let mut s = store();
        s.snapshot(&InputSnapshot::new().with(Category::Gift, ["flowers"]));
        let raw = s.storage().get(KEY).unwrap();
        let stored: SelectionRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.gift, "flowers");
    }

    #[test]
    fn duplicate_and_empty_tokens_are_dropped() {
        let mut s = store();
        s.snapshot(&InputSnapshot::new().with(Category::Desserts, ["cake", "", "cake", "pie"]));
        assert_eq!(s.record().desserts, vec!["cake", "pie"]);
    }

    #[test]
    fn gift_keeps_first_checked_value() {
        let mut s = store();
        s.snapshot(&InputSnapshot::new().with(Category::Gift, ["teddy-bear", "card"]));
        assert_eq!(s.record().gift, "teddy-bear");
        assert_eq!(s.record().tokens(Category::Gift), vec!["teddy-bear"]);
    }

    #[test]
    fn restore_round_trips_through_storage() {
        let mut first = store();
        first.snapshot(&InputSnapshot::new().with(Category::Dates, ["movie-night"]));
        let mut second = SelectionStore::new(first.into_storage(), KEY);
        assert!(second.restore());
        assert_eq!(second.record().dates, vec!["movie-night"]);
    }

    #[test]
    fn malformed_or_missing_storage_yields_defaults() {
        let mut s = store();
        assert!(!s.restore());
        assert!(s.record().is_empty());

        let mut raw = MemoryStore::new();
        raw.set(KEY, "{not json");
        let mut s = SelectionStore::new(raw, KEY);
        assert!(matches!(s.load(), Err(FlowError::MalformedPersistedState(_))));
        assert!(!s.restore());
        assert!(s.record().is_empty());

        let mut raw = MemoryStore::new();
        raw.set(KEY, r#"{"dates": "movie-night"}"#);
        let mut s = SelectionStore::new(raw, KEY);
        assert!(!s.restore());
        assert!(s.record().is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let mut raw = MemoryStore::new();
        raw.set(KEY, r#"{"food": ["tacos"]}"#);
        let mut s = SelectionStore::new(raw, KEY);
        assert!(s.restore());
        assert_eq!(s.record().food, vec!["tacos"]);
        assert!(s.record().gift.is_empty());
    }

    #[test]
    fn clear_empties_record_and_storage() {
        let mut s = store();
        s.snapshot(&InputSnapshot::new().with(Category::Activities, ["online-game"]));
        s.clear();
        assert!(s.record().is_empty());
        assert!(s.storage().get(KEY).is_none());
    }
}
