//! Level data models.
//!
//! - `Level`: the stored entity.
//! - `LevelInput`: creation payload; `id` and `name` are required, the rest
//!   default (difficulty 0.0, no parameters, empty description).
//! - `LevelPatch`: partial update; absent fields leave the level untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::Entity;

pub type LevelParameters = BTreeMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: i64,
    pub name: String,
    pub difficulty: f64,
    pub parameters: LevelParameters,
    pub description: String,
}

impl Level {
    /// Merges `new_parameters` into the existing map. Keys not mentioned keep
    /// their values; this is the additive counterpart of a patch, which
    /// replaces the whole map.
    pub fn update_parameters(&mut self, new_parameters: LevelParameters) {
        self.parameters.extend(new_parameters);
    }

    /// Sets difficulty to the mean of the parameter values and returns it.
    /// A level without parameters keeps its current difficulty.
    pub fn calculate_difficulty(&mut self) -> f64 {
        if self.parameters.is_empty() {
            return self.difficulty;
        }

        let total: f64 = self.parameters.values().sum();
        self.difficulty = total / self.parameters.len() as f64;
        self.difficulty
    }

    /// Event tag stamped on measurements collected while testing this level.
    pub fn event_tag(&self) -> String {
        event_tag(Some(self.id))
    }
}

impl Entity for Level {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

/// `MEASURE_LEVEL_{id}` for a level-scoped round, plain `MEASURE` otherwise.
pub fn event_tag(level_id: Option<i64>) -> String {
    match level_id {
        Some(id) => format!("MEASURE_LEVEL_{id}"),
        None => "MEASURE".to_string(),
    }
}

/// Input data for creating a level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInput {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub difficulty: f64,
    #[serde(default)]
    pub parameters: LevelParameters,
    #[serde(default)]
    pub description: String,
}

impl LevelInput {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            difficulty: 0.0,
            parameters: LevelParameters::new(),
            description: String::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_parameters(mut self, parameters: LevelParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl From<LevelInput> for Level {
    fn from(input: LevelInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
            difficulty: input.difficulty,
            parameters: input.parameters,
            description: input.description,
        }
    }
}

/// Partial update for a stored level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPatch {
    pub name: Option<String>,
    pub difficulty: Option<f64>,
    pub parameters: Option<LevelParameters>,
    pub description: Option<String>,
}

impl LevelPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.difficulty.is_none()
            && self.parameters.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, level: &mut Level) {
        if let Some(name) = self.name {
            level.name = name;
        }
        if let Some(difficulty) = self.difficulty {
            level.difficulty = difficulty;
        }
        if let Some(parameters) = self.parameters {
            level.parameters = parameters;
        }
        if let Some(description) = self.description {
            level.description = description;
        }
    }
}
