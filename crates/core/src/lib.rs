//! Domain layer for the forecast record-keeper.
//!
//! Hosts the entity model, the repository contract with its in-memory
//! implementation, and the service adapters call into. Input validation is
//! the adapter's job; data reaching this crate is assumed well-formed.

pub mod entity;
pub mod repository;
pub mod service;
pub mod view;

pub use entity::{Forecast, ForecastKind, ForecastTarget};
pub use repository::{ForecastRepository, InMemoryForecastRepository};
pub use service::{ForecastService, NewForecast, NewTarget};
pub use view::{ForecastSummary, ForecastView, HealthStatus, TargetView};
