//! Forecast data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{models::Level, Entity, Timestamped};

/// Passability estimate for one level, produced by the analysis step.
///
/// `level_name` is a copy taken at creation time, so renaming the level later
/// does not rewrite old forecasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub id: u64,
    pub level_name: String,
    pub passability_score: f64,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

impl Forecast {
    /// Builds a forecast for `level`. Without an explicit score the estimate
    /// falls back to `max(0, 1 - difficulty)`.
    pub fn from_level(
        id: u64,
        level: &Level,
        recommendation: impl Into<String>,
        passability_score: Option<f64>,
    ) -> Self {
        let passability_score =
            passability_score.unwrap_or_else(|| (1.0 - level.difficulty).max(0.0));

        Self {
            id,
            level_name: level.name.clone(),
            passability_score,
            recommendation: recommendation.into(),
            created_at: Utc::now(),
        }
    }
}

impl Entity for Forecast {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl Timestamped for Forecast {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::LevelInput;

    #[test]
    fn default_score_follows_difficulty() {
        let level: Level = LevelInput::new(1, "Forest").with_difficulty(0.3).into();
        let forecast = Forecast::from_level(99, &level, "be careful", None);

        assert_eq!(forecast.id, 99);
        assert_eq!(forecast.level_name, "Forest");
        assert!((forecast.passability_score - 0.7).abs() < 1e-12);
    }

    #[test]
    fn default_score_never_negative() {
        let level: Level = LevelInput::new(1, "Hell").with_difficulty(3.0).into();
        let forecast = Forecast::from_level(1, &level, "", None);
        assert_eq!(forecast.passability_score, 0.0);
    }

    #[test]
    fn explicit_score_wins() {
        let level: Level = LevelInput::new(1, "Forest").with_difficulty(0.3).into();
        let forecast = Forecast::from_level(1, &level, "", Some(0.25));
        assert_eq!(forecast.passability_score, 0.25);
    }
}
