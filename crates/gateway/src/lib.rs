//! HTTP API gateway for Packwise.
//!
//! A thin adapter over the core entry point:
//!
//! - `GET  /health`           — liveness and uptime
//! - `POST /v1/packing-list`  — run the generation pipeline for one request
//!
//! Built on Axum. The gateway owns input hygiene (request shape, destination
//! whitelist); everything below it follows the degrade-never-fail policy, so
//! a well-formed request always yields a packing list.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use packwise_context::DestinationWhitelist;
use packwise_core::packing::GenerationOutcome;
use packwise_core::request::{Season, TravelRequest, TravelType};
use packwise_engine::Orchestrator;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Orchestrator,
    pub whitelist: DestinationWhitelist,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/packing-list", post(packing_list_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn start(host: &str, port: u16, state: SharedState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "Gateway listening");
    axum::serve(listener, build_router(state)).await
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PackingListRequest {
    destination: String,
    duration_days: u32,
    travel_type: TravelType,
    season: Season,
    #[serde(default)]
    travel_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: i64,
}

/// An error response with a status code and a plain message body.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now() - state.started_at;
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime.num_seconds(),
    })
}

async fn packing_list_handler(
    State(state): State<SharedState>,
    Json(body): Json<PackingListRequest>,
) -> Result<Json<GenerationOutcome>, ApiError> {
    if !state.whitelist.allows(&body.destination) {
        return Err(ApiError::unprocessable(format!(
            "Unknown destination '{}'",
            body.destination
        )));
    }

    let mut request = TravelRequest::new(
        body.destination,
        body.duration_days,
        body.travel_type,
        body.season,
    )
    .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    if let Some(date) = body.travel_date {
        request = request.with_travel_date(date);
    }

    let outcome = state.orchestrator.generate(&request).await.map_err(|e| {
        // Only reachable in strict (diagnostic) mode; production policy
        // substitutes the fallback before this point.
        error!(error = %e, "Pipeline error surfaced to gateway");
        ApiError::bad_gateway(e.to_string())
    })?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use packwise_context::ContextGatherer;
    use packwise_core::error::GenerationError;
    use packwise_core::packing::Provenance;
    use packwise_core::provider::{ChatModel, ItemRetriever};
    use packwise_core::retrieval::RetrievedItem;

    struct EmptyRetriever;

    #[async_trait]
    impl ItemRetriever for EmptyRetriever {
        async fn search(&self, _request: &TravelRequest) -> Vec<RetrievedItem> {
            Vec::new()
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatModel for FailingChat {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _system: &str,
            _user: &str,
        ) -> std::result::Result<String, GenerationError> {
            Err(GenerationError::Unavailable("HTTP 503".into()))
        }
    }

    fn state(whitelist: DestinationWhitelist) -> SharedState {
        let orchestrator = Orchestrator::new(
            Arc::new(EmptyRetriever),
            Arc::new(ContextGatherer::from_records(vec![], vec![])),
            Arc::new(FailingChat),
        );
        Arc::new(GatewayState {
            orchestrator,
            whitelist,
            started_at: chrono::Utc::now(),
        })
    }

    fn body(destination: &str) -> PackingListRequest {
        PackingListRequest {
            destination: destination.into(),
            duration_days: 5,
            travel_type: TravelType::Business,
            season: Season::Summer,
            travel_date: None,
        }
    }

    #[test]
    fn request_dto_deserializes() {
        let json = r#"{
            "destination": "Dubai",
            "duration_days": 5,
            "travel_type": "BUSINESS",
            "season": "SUMMER",
            "travel_date": "2026-07-14"
        }"#;
        let parsed: PackingListRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.destination, "Dubai");
        assert_eq!(parsed.travel_type, TravelType::Business);
        assert!(parsed.travel_date.is_some());
    }

    #[test]
    fn router_builds() {
        let _router = build_router(state(DestinationWhitelist::allow_all()));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health_handler(State(state(DestinationWhitelist::allow_all()))).await;
        assert_eq!(response.0.status, "ok");
        assert!(response.0.uptime_secs >= 0);
    }

    #[tokio::test]
    async fn degraded_pipeline_still_returns_a_list() {
        // Chat model is down; production policy yields the fallback list.
        let result = packing_list_handler(
            State(state(DestinationWhitelist::allow_all())),
            Json(body("Dubai")),
        )
        .await
        .unwrap();

        assert_eq!(result.0.provenance, Provenance::Fallback);
        assert!(result.0.categories.total_items() >= 8);
    }

    #[tokio::test]
    async fn unknown_destination_rejected_by_whitelist() {
        let whitelist = DestinationWhitelist::new(vec!["Dubai".into()]);
        let err = packing_list_handler(State(state(whitelist)), Json(body("Atlantis")))
            .await
            .err()
            .unwrap();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("Atlantis"));
    }

    #[tokio::test]
    async fn invalid_duration_rejected() {
        let mut invalid = body("Dubai");
        invalid.duration_days = 0;
        let err = packing_list_handler(
            State(state(DestinationWhitelist::allow_all())),
            Json(invalid),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
