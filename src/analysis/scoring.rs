use crate::analysis::config::ForecastConfig;

pub const REDUCE_DIFFICULTY: &str = "reduce level difficulty";
pub const BALANCED: &str = "level is balanced";

/// Mean reading scaled by the baseline completion time, capped at 1.
/// Readings are expected to be non-negative; a zero baseline saturates.
pub fn normalize_mean(mean_value: f64, config: &ForecastConfig) -> f64 {
    if config.baseline_completion_secs <= 0.0 {
        return 1.0;
    }
    (mean_value / config.baseline_completion_secs).min(1.0)
}

/// Weighted blend of difficulty and normalised load, inverted and clamped
/// to [0, 1]. Higher means the level is more likely to be completed.
pub fn passability_score(difficulty: f64, mean_value: f64, config: &ForecastConfig) -> f64 {
    let avg_norm = normalize_mean(mean_value, config);
    let raw = 1.0 - (config.difficulty_weight * difficulty + config.load_weight * avg_norm);
    raw.clamp(0.0, 1.0)
}

/// Scores exactly at the threshold count as balanced.
pub fn recommendation_for(score: f64, config: &ForecastConfig) -> &'static str {
    if score < config.balance_threshold {
        REDUCE_DIFFICULTY
    } else {
        BALANCED
    }
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn easy_idle_level_scores_one() {
        let config = ForecastConfig::default();
        assert_eq!(passability_score(0.0, 0.0, &config), 1.0);
    }

    #[test]
    fn hard_slow_level_scores_zero() {
        let config = ForecastConfig::default();
        assert_eq!(passability_score(1.0, 120.0, &config), 0.0);
        assert_eq!(passability_score(5.0, 10_000.0, &config), 0.0);
    }

    #[test]
    fn score_stays_in_unit_interval() {
        let config = ForecastConfig::default();
        for difficulty in [0.0, 0.1, 0.5, 0.99, 1.0, 2.5, 100.0] {
            for mean in [0.0, 1.0, 59.9, 120.0, 240.0, 1e9] {
                let score = passability_score(difficulty, mean, &config);
                assert!((0.0..=1.0).contains(&score), "{difficulty} {mean} -> {score}");
            }
        }
    }

    #[test]
    fn reference_scenario_score() {
        let config = ForecastConfig::default();
        let avg_norm = normalize_mean(60.35, &config);
        assert!((avg_norm - 60.35 / 120.0).abs() < EPS);

        let score = passability_score(0.8, 60.35, &config);
        assert!((score - 0.3485416666666667).abs() < EPS, "{score}");
        assert_eq!(recommendation_for(score, &config), REDUCE_DIFFICULTY);
    }

    #[test]
    fn threshold_is_inclusive_for_balanced() {
        let config = ForecastConfig::default();
        assert_eq!(recommendation_for(0.5, &config), BALANCED);
        assert_eq!(recommendation_for(0.4999999, &config), REDUCE_DIFFICULTY);
        assert_eq!(recommendation_for(1.0, &config), BALANCED);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.7, 120.0]) - 60.35).abs() < EPS);
    }

    #[test]
    fn zero_baseline_saturates() {
        let config = ForecastConfig {
            baseline_completion_secs: 0.0,
            ..ForecastConfig::default()
        };
        assert_eq!(normalize_mean(5.0, &config), 1.0);
    }
}
