//! HTTP Endpoints
//!
//! REST API for ticket triage.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::{HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ticket_triage_core::{
    CustomerType, TeamQueue, TicketFilter, TicketInput, TicketMetadata, TicketStatus,
};

use crate::state::AppState;
use crate::ServerError;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.request_timeout_seconds);

    Router::new()
        .route("/", get(service_info))
        // Tickets
        .route("/api/tickets", post(create_ticket).get(list_tickets))
        .route("/api/tickets/:id", get(get_ticket))
        .route("/api/tickets/:id/override", post(override_ticket))
        // Queues
        .route("/api/queues", get(list_queues))
        .route("/api/queues/:queue", get(get_queue))
        // System
        .route("/api/system/health", get(system_health))
        .route("/api/system/stats", get(system_stats))
        .route("/api/system/rules", get(system_rules))
        // Health
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .fallback(not_found)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        }
        vec![HeaderValue::from_static(DEFAULT_CORS_ORIGIN)]
    } else {
        parsed_origins
    };

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Service banner
async fn service_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Support Ticket Triage & Routing System",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "tickets": "/api/tickets",
            "queues": "/api/queues",
            "system": "/api/system",
        },
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTicketRequest {
    title: Option<String>,
    description: Option<String>,
    customer_type: Option<String>,
    #[serde(default)]
    metadata: Option<TicketMetadata>,
}

impl CreateTicketRequest {
    fn into_input(self) -> Result<TicketInput, ServerError> {
        let (Some(title), Some(description), Some(customer_type)) = (
            non_blank(self.title),
            non_blank(self.description),
            non_blank(self.customer_type),
        ) else {
            return Err(ServerError::InvalidRequest(
                "Missing required fields: title, description, customerType".to_string(),
            ));
        };

        let customer_type = CustomerType::from_str(&customer_type)?;
        let input = TicketInput::new(title, description, customer_type);
        Ok(match self.metadata {
            Some(metadata) => input.with_metadata(metadata),
            None => input,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))
}

/// Create a ticket and run it through triage
async fn create_ticket(
    State(state): State<AppState>,
    body: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let input = json_body(body)?.into_input()?;

    let ticket = state
        .lifecycle
        .create(input)
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to create ticket"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "ticket": ticket,
            "message": "Ticket created and processed successfully",
        })),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTicketsQuery {
    status: Option<String>,
    queue: Option<String>,
    customer_type: Option<String>,
}

impl ListTicketsQuery {
    fn into_filter(self) -> Result<TicketFilter, ServerError> {
        fn parse<T: FromStr<Err = ticket_triage_core::Error>>(
            value: Option<String>,
        ) -> Result<Option<T>, ServerError> {
            non_blank(value)
                .map(|v| T::from_str(&v))
                .transpose()
                .map_err(ServerError::from)
        }

        Ok(TicketFilter {
            status: parse::<TicketStatus>(self.status)?,
            queue: parse::<TeamQueue>(self.queue)?,
            customer_type: parse::<CustomerType>(self.customer_type)?,
        })
    }
}

/// List tickets, optionally filtered
async fn list_tickets(
    State(state): State<AppState>,
    query: Result<Query<ListTicketsQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let Query(query) =
        query.map_err(|rejection| ServerError::InvalidRequest(rejection.body_text()))?;
    let filter = query.into_filter()?;

    let tickets = state
        .lifecycle
        .list(&filter)
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to retrieve tickets"))?;

    let mut body = serde_json::json!({
        "total": tickets.len(),
        "tickets": tickets,
    });
    if !filter.is_empty() {
        body["filter"] = serde_json::json!(filter);
    }
    Ok(Json(body))
}

/// Get a single ticket
async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let ticket = state
        .lifecycle
        .get(&id)
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to retrieve ticket"))?;

    Ok(Json(serde_json::json!({ "ticket": ticket })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverrideRequest {
    new_queue: Option<String>,
    reason: Option<String>,
    overridden_by: Option<String>,
}

/// Replace a ticket's routing with a human decision
async fn override_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<OverrideRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let request = json_body(body)?;

    let (Some(new_queue), Some(reason), Some(overridden_by)) = (
        non_blank(request.new_queue),
        non_blank(request.reason),
        non_blank(request.overridden_by),
    ) else {
        return Err(ServerError::InvalidRequest(
            "Missing required fields: newQueue, reason, overriddenBy".to_string(),
        ));
    };
    let new_queue = TeamQueue::from_str(&new_queue)?;

    let ticket = state
        .lifecycle
        .override_routing(&id, new_queue, &reason, &overridden_by)
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to override routing"))?;

    Ok(Json(serde_json::json!({
        "ticket": ticket,
        "message": "Routing overridden successfully",
    })))
}

/// Statistics for every queue
async fn list_queues(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ServerError> {
    let queues = state
        .lifecycle
        .queue_stats()
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to retrieve queue statistics"))?;

    Ok(Json(serde_json::json!({
        "queues": queues,
        "timestamp": Utc::now(),
    })))
}

/// Tickets currently in one queue
async fn get_queue(
    State(state): State<AppState>,
    Path(queue): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let queue = TeamQueue::from_str(&queue)?;

    let tickets = state
        .lifecycle
        .list_by_queue(queue)
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to retrieve queue tickets"))?;

    Ok(Json(serde_json::json!({
        "queue": queue,
        "count": tickets.len(),
        "tickets": tickets,
    })))
}

async fn system_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let ai_healthy = state.lifecycle.analyzer_healthy().await;

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "services": {
            "ai": if ai_healthy { "healthy" } else { "degraded" },
            "storage": "healthy",
        },
        "analyzer": state.lifecycle.analyzer_name(),
        "persistent": state.lifecycle.store_is_persistent(),
    }))
}

async fn system_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ServerError> {
    let stats = state
        .lifecycle
        .stats()
        .await
        .map_err(|e| ServerError::from_core(e, "Failed to retrieve statistics"))?;

    Ok(Json(serde_json::json!({
        "stats": stats,
        "timestamp": Utc::now(),
    })))
}

async fn system_rules(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = state.lifecycle.engine();
    let config = engine.config();

    Json(serde_json::json!({
        "explanation": engine.explain_rules(),
        "config": {
            "highConfidenceThreshold": config.high_confidence_threshold,
            "lowConfidenceThreshold": config.low_confidence_threshold,
            "enableAutoRouting": config.enable_auto_routing,
        },
        "timestamp": Utc::now(),
    }))
}

/// Liveness check
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check: the analyzer must be reachable
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let healthy = state.lifecycle.analyzer_healthy().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if healthy { "ready" } else { "not_ready" },
            "checks": {
                "analyzer": {
                    "name": state.lifecycle.analyzer_name(),
                    "status": if healthy { "ok" } else { "error" },
                },
            },
        })),
    )
}

async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "path": uri.path(),
        })),
    )
}
