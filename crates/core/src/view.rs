use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Forecast, ForecastKind, ForecastTarget};

/// Read projection of a stored target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub horizon: u32,
    pub created_at: DateTime<Utc>,
}

impl From<ForecastTarget> for TargetView {
    fn from(target: ForecastTarget) -> Self {
        Self {
            id: target.id,
            name: target.name,
            description: target.description,
            horizon: target.horizon,
            created_at: target.created_at,
        }
    }
}

/// Read projection of a stored forecast. Absent optional fields serialize
/// as explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastView {
    pub id: Uuid,
    pub target_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
    pub probability: Option<f64>,
    pub forecast_type: ForecastKind,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Forecast> for ForecastView {
    fn from(forecast: Forecast) -> Self {
        Self {
            id: forecast.id,
            target_id: forecast.target_id,
            timestamp: forecast.timestamp,
            value: forecast.value,
            probability: forecast.probability,
            forecast_type: forecast.kind,
            model_name: forecast.model_name,
            created_at: forecast.created_at,
        }
    }
}

/// Per-target aggregation row.
///
/// `model_name` is reserved for a future per-model breakdown and is always
/// absent today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub target_id: Option<Uuid>,
    pub count: usize,
    pub model_name: Option<String>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// Liveness record returned by the health operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub time: DateTime<Utc>,
}
