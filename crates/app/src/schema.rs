use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use hypercast_core::entity::ForecastKind;
use hypercast_core::service::{NewForecast, NewTarget};

/// Field bound violations rejected at the HTTP boundary.
///
/// The domain layer performs no validation of its own; every bound below is
/// checked exactly once, here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must be between 1 and 200 characters")]
    NameLength,
    #[error("description must be at most 1000 characters")]
    DescriptionLength,
    #[error("horizon must be between 1 and 365")]
    HorizonRange,
    #[error("probability must be between 0 and 1")]
    ProbabilityRange,
    #[error("model_name must be between 1 and 100 characters")]
    ModelNameLength,
}

/// Payload accepted by `POST /v1/targets`.
#[derive(Debug, Deserialize)]
pub struct CreateTargetRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

fn default_horizon() -> u32 {
    1
}

impl CreateTargetRequest {
    /// Checks the documented field bounds and produces the service input.
    pub fn validate(self) -> Result<NewTarget, ValidationError> {
        if self.name.is_empty() || self.name.chars().count() > 200 {
            return Err(ValidationError::NameLength);
        }
        if self.description.chars().count() > 1000 {
            return Err(ValidationError::DescriptionLength);
        }
        if !(1..=365).contains(&self.horizon) {
            return Err(ValidationError::HorizonRange);
        }

        Ok(NewTarget {
            name: self.name,
            description: self.description,
            horizon: self.horizon,
        })
    }
}

/// Payload accepted by `POST /v1/forecasts`.
#[derive(Debug, Deserialize)]
pub struct CreateForecastRequest {
    #[serde(default)]
    pub target_id: Option<Uuid>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub forecast_type: ForecastKind,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_model_name() -> String {
    "manual".to_string()
}

impl CreateForecastRequest {
    /// Checks the documented field bounds and produces the service input.
    /// The forecast kind does not constrain which of `value`/`probability`
    /// is present.
    pub fn validate(self) -> Result<NewForecast, ValidationError> {
        if let Some(probability) = self.probability {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ValidationError::ProbabilityRange);
            }
        }
        if self.model_name.is_empty() || self.model_name.chars().count() > 100 {
            return Err(ValidationError::ModelNameLength);
        }

        Ok(NewForecast {
            target_id: self.target_id,
            value: self.value,
            probability: self.probability,
            kind: self.forecast_type,
            model_name: self.model_name,
        })
    }
}
