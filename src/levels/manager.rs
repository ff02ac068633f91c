use anyhow::{Context, Result};

use crate::db::{repositories::LevelStore, Level, LevelInput, LevelPatch, Repository};

/// CRUD over the level store with partial-update semantics.
#[derive(Clone)]
pub struct LevelManager {
    levels: LevelStore,
}

impl LevelManager {
    pub fn new(levels: LevelStore) -> Self {
        Self { levels }
    }

    /// Stores a new level built from `input` and returns it. An existing
    /// level with the same id is overwritten.
    pub fn create_level(&self, input: LevelInput) -> Level {
        let level = Level::from(input);
        self.levels.save(level.clone());
        level
    }

    /// Like `create_level`, reading the input from JSON. Fails when `id` or
    /// `name` is missing or has the wrong type.
    pub fn create_level_from_json(&self, data: &serde_json::Value) -> Result<Level> {
        let input: LevelInput =
            serde_json::from_value(data.clone()).context("invalid level data")?;
        Ok(self.create_level(input))
    }

    /// Applies the fields present in `updates` and saves. `None` when no
    /// level has this id; nothing is written in that case.
    pub fn edit_level(&self, level_id: i64, updates: LevelPatch) -> Option<Level> {
        let mut level = self.levels.load(level_id)?;
        updates.apply(&mut level);
        self.levels.save(level.clone());
        Some(level)
    }

    /// Commits an owned copy, e.g. after `Level::update_parameters`.
    pub fn save_level(&self, level: Level) {
        self.levels.save(level);
    }

    pub fn get_level(&self, level_id: i64) -> Option<Level> {
        self.levels.load(level_id)
    }

    pub fn get_levels(&self) -> Vec<Level> {
        self.levels.list_all()
    }

    pub fn delete_level(&self, level_id: i64) {
        self.levels.delete(level_id);
    }
}
