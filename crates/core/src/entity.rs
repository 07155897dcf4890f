use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Model label recorded when a forecast is created without one.
pub const UNKNOWN_MODEL: &str = "unknown";

/// Kind of prediction a forecast carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastKind {
    Point,
    Probability,
}

impl ForecastKind {
    /// Returns the canonical label used in views and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Probability => "probability",
        }
    }
}

impl Default for ForecastKind {
    fn default() -> Self {
        Self::Point
    }
}

/// A named entity that forecasts are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTarget {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Steps ahead the target is forecast over.
    pub horizon: u32,
    pub created_at: DateTime<Utc>,
}

impl ForecastTarget {
    /// Builds a target with a fresh identity and construction-time timestamp.
    pub fn new(name: impl Into<String>, description: impl Into<String>, horizon: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            horizon,
            created_at: Utc::now(),
        }
    }
}

/// A single point or probability prediction.
///
/// `target_id` is a weak reference: no existence check is made against the
/// target store. The kind does not constrain which of `value`/`probability`
/// is populated; both may be absent, present, or combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub id: Uuid,
    pub target_id: Option<Uuid>,
    /// Observation ("as-of") time; always equals construction time here.
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
    pub probability: Option<f64>,
    pub kind: ForecastKind,
    pub model_name: String,
    pub created_at: DateTime<Utc>,
}

impl Forecast {
    /// Builds a forecast with a fresh identity and construction-time
    /// timestamps. `created_at` is re-stamped by the repository at commit.
    pub fn new(
        target_id: Option<Uuid>,
        value: Option<f64>,
        probability: Option<f64>,
        kind: ForecastKind,
        model_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            target_id,
            timestamp: now,
            value,
            probability,
            kind,
            model_name: model_name.unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            created_at: now,
        }
    }
}
