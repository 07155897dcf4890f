use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::entity::{Forecast, ForecastKind, ForecastTarget};
use crate::repository::ForecastRepository;
use crate::view::{ForecastSummary, ForecastView, HealthStatus, TargetView};

/// Pre-validated input for registering a forecast target.
#[derive(Debug, Clone)]
pub struct NewTarget {
    pub name: String,
    pub description: String,
    pub horizon: u32,
}

/// Pre-validated input for recording a forecast.
///
/// `target_id` may reference a target that was never created; the reference
/// is stored as given.
#[derive(Debug, Clone)]
pub struct NewForecast {
    pub target_id: Option<Uuid>,
    pub value: Option<f64>,
    pub probability: Option<f64>,
    pub kind: ForecastKind,
    pub model_name: String,
}

/// Application service for forecast record keeping.
///
/// The only entry point adapters use. Inputs arrive already validated;
/// outputs are read views, never repository-owned entities. One instance is
/// constructed at process startup and shared for the process lifetime.
#[derive(Clone)]
pub struct ForecastService {
    repo: Arc<dyn ForecastRepository>,
}

impl ForecastService {
    pub fn new(repo: Arc<dyn ForecastRepository>) -> Self {
        Self { repo }
    }

    // Targets

    pub fn create_target(&self, input: NewTarget) -> TargetView {
        let target = ForecastTarget::new(input.name, input.description, input.horizon);
        self.repo.create_target(target).into()
    }

    pub fn list_targets(&self) -> Vec<TargetView> {
        self.repo
            .list_targets()
            .into_iter()
            .map(TargetView::from)
            .collect()
    }

    pub fn get_target(&self, target_id: Uuid) -> Option<TargetView> {
        self.repo.get_target(target_id).map(TargetView::from)
    }

    // Forecasts

    pub fn create_forecast(&self, input: NewForecast) -> ForecastView {
        let forecast = Forecast::new(
            input.target_id,
            input.value,
            input.probability,
            input.kind,
            Some(input.model_name),
        );
        self.repo.create_forecast(forecast).into()
    }

    pub fn list_forecasts(&self, target_id: Option<Uuid>) -> Vec<ForecastView> {
        self.repo
            .list_forecasts(target_id)
            .into_iter()
            .map(ForecastView::from)
            .collect()
    }

    pub fn get_forecast(&self, forecast_id: Uuid) -> Option<ForecastView> {
        self.repo.get_forecast(forecast_id).map(ForecastView::from)
    }

    /// Emits one summary per non-empty target group: forecast count and the
    /// latest observation timestamp. `model_name` stays unset until a
    /// per-model breakdown exists. Output order follows the grouping map's
    /// iteration order.
    pub fn summarize_forecasts(&self) -> Vec<ForecastSummary> {
        let mut summaries = Vec::new();
        for (target_id, forecasts) in self.repo.aggregate_by_target() {
            // Empty groups cannot come out of aggregation.
            if forecasts.is_empty() {
                continue;
            }
            let latest_timestamp = forecasts.iter().map(|forecast| forecast.timestamp).max();
            summaries.push(ForecastSummary {
                target_id,
                count: forecasts.len(),
                model_name: None,
                latest_timestamp,
            });
        }
        summaries
    }

    /// Fixed "ok" liveness record. Extension point for deeper checks.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            time: Utc::now(),
        }
    }
}
