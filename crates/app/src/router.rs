use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use hypercast_core::service::ForecastService;
use hypercast_core::view::{ForecastSummary, ForecastView, HealthStatus, TargetView};
use hypercast_util::AppConfig;

use crate::problem::ProblemResponse;
use crate::schema::{CreateForecastRequest, CreateTargetRequest};
use crate::telemetry;

#[derive(Clone)]
pub struct AppState {
    service: ForecastService,
    metrics: PrometheusHandle,
    app_name: String,
    cors: CorsLayer,
}

impl AppState {
    pub fn new(service: ForecastService, metrics: PrometheusHandle, config: &AppConfig) -> Self {
        Self {
            service,
            metrics,
            app_name: config.app_name.clone(),
            cors: cors_layer(config),
        }
    }

    pub fn service(&self) -> &ForecastService {
        &self.service
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: AppState) -> Router {
    let cors = state.cors.clone();
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(metrics))
        .route("/v1/health", get(health))
        .route("/v1/targets", post(create_target).get(list_targets))
        .route("/v1/targets/:target_id", get(get_target))
        .route("/v1/forecasts", post(create_forecast).get(list_forecasts))
        .route("/v1/forecasts/summary", get(summarize_forecasts))
        .route("/v1/forecasts/:forecast_id", get(get_forecast))
        .layer(cors)
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": state.app_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .unwrap()
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service().health())
}

// Targets

async fn create_target(
    State(state): State<AppState>,
    Json(payload): Json<CreateTargetRequest>,
) -> Result<(StatusCode, Json<TargetView>), ProblemResponse> {
    let input = payload.validate()?;
    let view = state.service().create_target(input);
    counter!("targets_created_total").increment(1);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_targets(State(state): State<AppState>) -> Json<Vec<TargetView>> {
    counter!("api_requests_total", "route" => "targets.list", "result" => "ok").increment(1);
    Json(state.service().list_targets())
}

async fn get_target(
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
) -> Result<Json<TargetView>, ProblemResponse> {
    match state.service().get_target(target_id) {
        Some(view) => {
            counter!("api_requests_total", "route" => "targets.get", "result" => "ok")
                .increment(1);
            Ok(Json(view))
        }
        None => {
            counter!("api_requests_total", "route" => "targets.get", "result" => "not_found")
                .increment(1);
            Err(ProblemResponse::not_found(
                "target_not_found",
                format!("no target with id {target_id}"),
            ))
        }
    }
}

// Forecasts

async fn create_forecast(
    State(state): State<AppState>,
    Json(payload): Json<CreateForecastRequest>,
) -> Result<(StatusCode, Json<ForecastView>), ProblemResponse> {
    let input = payload.validate()?;
    let view = state.service().create_forecast(input);
    counter!("forecasts_created_total", "kind" => view.forecast_type.as_str()).increment(1);
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Debug, Deserialize)]
struct ForecastListQuery {
    #[serde(default)]
    target_id: Option<Uuid>,
}

async fn list_forecasts(
    State(state): State<AppState>,
    Query(query): Query<ForecastListQuery>,
) -> Json<Vec<ForecastView>> {
    counter!("api_requests_total", "route" => "forecasts.list", "result" => "ok").increment(1);
    Json(state.service().list_forecasts(query.target_id))
}

async fn get_forecast(
    State(state): State<AppState>,
    Path(forecast_id): Path<Uuid>,
) -> Result<Json<ForecastView>, ProblemResponse> {
    match state.service().get_forecast(forecast_id) {
        Some(view) => {
            counter!("api_requests_total", "route" => "forecasts.get", "result" => "ok")
                .increment(1);
            Ok(Json(view))
        }
        None => {
            counter!("api_requests_total", "route" => "forecasts.get", "result" => "not_found")
                .increment(1);
            Err(ProblemResponse::not_found(
                "forecast_not_found",
                format!("no forecast with id {forecast_id}"),
            ))
        }
    }
}

async fn summarize_forecasts(State(state): State<AppState>) -> Json<Vec<ForecastSummary>> {
    counter!("api_requests_total", "route" => "forecasts.summary", "result" => "ok").increment(1);
    Json(state.service().summarize_forecasts())
}
