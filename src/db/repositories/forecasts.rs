use crate::db::{Forecast, Repository};

use super::ForecastStore;

impl ForecastStore {
    pub fn save_forecast(&self, forecast: Forecast) {
        self.save(forecast);
    }

    pub fn get_forecast(&self, forecast_id: u64) -> Option<Forecast> {
        self.load(forecast_id)
    }

    /// Most recent forecast for a level name, by id.
    pub fn latest_for_level(&self, level_name: &str) -> Option<Forecast> {
        self.find(|forecast| forecast.level_name == level_name)
            .into_iter()
            .last()
    }
}
