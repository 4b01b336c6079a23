//! Per-device saved recipes over an injected key-value port.

use crate::id;
use crate::model::RecipeResult;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Saved recipes kept per device; older entries are dropped beyond this
pub const MAX_SAVED_RECIPES: usize = 50;

const UNTITLED: &str = "Untitled Recipe";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored recipes are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value storage, e.g. browser local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: String,
    pub name: String,
    pub data: RecipeResult,
    /// Unix milliseconds of the last save
    pub timestamp: u64,
    pub device_id: String,
}

/// Listing entry without the recipe body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
}

pub struct RecipeStore {
    backend: Arc<dyn KeyValueStore>,
    device_id: String,
}

impl RecipeStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, device_id: impl Into<String>) -> Self {
        Self {
            backend,
            device_id: device_id.into(),
        }
    }

    /// Fresh opaque device identifier
    pub fn new_device_id() -> String {
        id::timestamped("device")
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Save `recipe` as the newest entry and return its id
    pub fn create(&self, recipe: RecipeResult) -> Result<String, StoreError> {
        let mut recipes = self.load()?;
        let entry = SavedRecipe {
            id: id::timestamped("recipe"),
            name: saved_name(&recipe),
            data: recipe,
            timestamp: id::now_millis(),
            device_id: self.device_id.clone(),
        };
        let recipe_id = entry.id.clone();

        recipes.insert(0, entry);
        if recipes.len() > MAX_SAVED_RECIPES {
            debug!(
                "Dropping {} oldest saved recipes",
                recipes.len() - MAX_SAVED_RECIPES
            );
            recipes.truncate(MAX_SAVED_RECIPES);
        }

        self.save(&recipes)?;
        debug!("Saved recipe {} for device {}", recipe_id, self.device_id);
        Ok(recipe_id)
    }

    pub fn read(&self, recipe_id: &str) -> Result<Option<RecipeResult>, StoreError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.id == recipe_id)
            .map(|r| r.data))
    }

    /// Replace a saved recipe in place; `false` when the id is unknown
    pub fn update(&self, recipe_id: &str, recipe: RecipeResult) -> Result<bool, StoreError> {
        let mut recipes = self.load()?;
        let Some(entry) = recipes.iter_mut().find(|r| r.id == recipe_id) else {
            return Ok(false);
        };

        entry.name = saved_name(&recipe);
        entry.data = recipe;
        entry.timestamp = id::now_millis();

        self.save(&recipes)?;
        Ok(true)
    }

    pub fn delete(&self, recipe_id: &str) -> Result<bool, StoreError> {
        let mut recipes = self.load()?;
        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        if recipes.len() == before {
            return Ok(false);
        }

        self.save(&recipes)?;
        Ok(true)
    }

    /// Newest first
    pub fn list(&self) -> Result<Vec<RecipeSummary>, StoreError> {
        Ok(self
            .load()?
            .into_iter()
            .map(|r| RecipeSummary {
                id: r.id,
                name: r.name,
                timestamp: r.timestamp,
            })
            .collect())
    }

    fn key(&self) -> String {
        format!("savedRecipes_{}", self.device_id)
    }

    fn load(&self) -> Result<Vec<SavedRecipe>, StoreError> {
        match self.backend.get(&self.key())? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                warn!("Saved recipes for {} are unreadable: {}", self.device_id, e);
                StoreError::from(e)
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, recipes: &[SavedRecipe]) -> Result<(), StoreError> {
        self.backend.set(&self.key(), serde_json::to_string(recipes)?)
    }
}

fn saved_name(recipe: &RecipeResult) -> String {
    recipe.display_name(UNTITLED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(device: &str, backend: Arc<MemoryStore>) -> RecipeStore {
        RecipeStore::new(backend, device)
    }

    fn recipe(name: &str) -> RecipeResult {
        RecipeResult {
            recipe_name: name.to_string(),
            mermaid_diagram: "graph TD;".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_read_list() {
        let store = store("device_a", Arc::new(MemoryStore::default()));
        let first = store.create(recipe("Soup")).unwrap();
        let second = store.create(recipe("Bread")).unwrap();

        assert_eq!(store.read(&first).unwrap().unwrap().recipe_name, "Soup");
        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Bread", "Soup"]);
        assert!(store.list().unwrap()[0].id == second);
        assert_eq!(store.read("recipe_missing").unwrap(), None);
    }

    #[test]
    fn test_name_fallbacks() {
        let store = store("device_a", Arc::new(MemoryStore::default()));
        let mut scraped = recipe("");
        scraped.scraped_title = Some("Nonna's Ragu".to_string());
        store.create(scraped).unwrap();
        store.create(recipe("  ")).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Untitled Recipe", "Nonna's Ragu"]);
    }

    #[test]
    fn test_update_and_delete() {
        let store = store("device_a", Arc::new(MemoryStore::default()));
        let id = store.create(recipe("Soup")).unwrap();

        assert!(store.update(&id, recipe("Better Soup")).unwrap());
        assert_eq!(store.list().unwrap()[0].name, "Better Soup");
        assert!(!store.update("nope", recipe("x")).unwrap());

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_capped_at_fifty() {
        let store = store("device_a", Arc::new(MemoryStore::default()));
        let oldest = store.create(recipe("r0")).unwrap();
        for i in 1..=MAX_SAVED_RECIPES {
            store.create(recipe(&format!("r{i}"))).unwrap();
        }

        let list = store.list().unwrap();
        assert_eq!(list.len(), MAX_SAVED_RECIPES);
        assert_eq!(list[0].name, "r50");
        assert_eq!(store.read(&oldest).unwrap(), None);
    }

    #[test]
    fn test_devices_are_isolated() {
        let backend = Arc::new(MemoryStore::default());
        let a = store("device_a", backend.clone());
        let b = store("device_b", backend.clone());
        a.create(recipe("Soup")).unwrap();

        assert!(b.list().unwrap().is_empty());
        assert!(backend.get("savedRecipes_device_a").unwrap().is_some());
    }

    #[test]
    fn test_wire_format() {
        let backend = Arc::new(MemoryStore::default());
        let store = store("device_a", backend.clone());
        store.create(recipe("Soup")).unwrap();

        let raw = backend.get("savedRecipes_device_a").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["deviceId"], "device_a");
        assert_eq!(value[0]["data"]["recipeName"], "Soup");
        assert!(value[0]["id"].as_str().unwrap().starts_with("recipe_"));
    }

    #[test]
    fn test_corrupt_storage() {
        let backend = Arc::new(MemoryStore::default());
        backend
            .set("savedRecipes_device_a", "{not json".to_string())
            .unwrap();
        let store = store("device_a", backend);
        assert!(matches!(store.list(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_new_device_id() {
        assert!(RecipeStore::new_device_id().starts_with("device_"));
    }
}
