//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the extraction engine to the conversational web
//! front end. The front end supplies raw utterances and displays or forwards
//! the structured result to the provider-matching screens.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with utterance text and optional user location
//! - **Output**: JSON responses with the extracted service/location pair
//! - **Endpoints**: Extract, health, index
//!
//! ## Key Features
//! - CORS support for the web front end dev servers
//! - Request validation with structured error responses
//! - Per-request latency measurement

use crate::errors::{ExtractorError, Result};
use crate::utils::{Timer, ValidationUtils};
use crate::{AppState, UserLocation};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: AppState,
}

/// Extraction request payload
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Raw utterance text
    pub query: String,
    /// Previously resolved user location, if any
    pub user_location: Option<UserLocation>,
}

/// Extraction response payload
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub service: String,
    pub location: String,
    pub query_time_ms: u64,
    pub request_id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Structured error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub category: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Bind the listener and return the running server future. `Server` is
    /// `Send`, unlike the builder chain, so callers may spawn or select on it.
    pub fn bind(self) -> Result<Server> {
        let config = self.app_state.config.clone();
        let bind_addr = format!("{}:{}", config.server.host, config.server.port);

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        let server = HttpServer::new(move || {
            let cors = if app_state.config.server.enable_cors {
                let mut cors = Cors::default()
                    .allowed_methods(vec!["GET", "POST"])
                    .allow_any_header()
                    .max_age(3600);
                for origin in &app_state.config.server.allowed_origins {
                    cors = cors.allowed_origin(origin);
                }
                cors
            } else {
                Cors::default()
            };

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(app_state.clone()))
                .app_data(web::JsonConfig::default().limit(
                    app_state.config.server.max_payload_size_kb as usize * 1024,
                ))
                .route("/extract", web::post().to(extract_handler))
                .route("/health", web::get().to(health_handler))
                .route("/", web::get().to(index_handler))
        })
        .workers(config.server.workers)
        .bind(&bind_addr)
        .map_err(|e| ExtractorError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        Ok(server)
    }

    /// Run the API server to completion
    pub async fn run(self) -> Result<()> {
        self.bind()?.await.map_err(|e| ExtractorError::Internal {
            message: format!("Server error: {}", e),
        })
    }
}

/// Extraction endpoint handler
async fn extract_handler(
    app_state: web::Data<AppState>,
    request: web::Json<ExtractRequest>,
) -> ActixResult<HttpResponse> {
    let timer = Timer::new("extract_request");

    let max_length = app_state.config.extraction.max_query_length;
    if !ValidationUtils::is_valid_query(&request.query, max_length) {
        let error = ExtractorError::InvalidApiRequest {
            details: format!("query must be non-empty and at most {} characters", max_length),
        };
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: error.to_string(),
            category: error.category().to_string(),
        }));
    }

    let result = app_state
        .extractor
        .extract(&request.query, request.user_location.as_ref());

    let response = ExtractResponse {
        service: result.service,
        location: result.location,
        query_time_ms: timer.stop(),
        request_id: uuid::Uuid::new_v4(),
        timestamp: chrono::Utc::now(),
    };

    tracing::info!(
        service = %response.service,
        location = %response.location,
        query_time_ms = response.query_time_ms,
        "extraction request served"
    );

    Ok(HttpResponse::Ok().json(response))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: app_state.started_at.elapsed().as_secs(),
    }))
}

/// Index endpoint handler
async fn index_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "service-extract",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "extract": "POST /extract",
            "health": "GET /health"
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extractor::Extractor;
    use actix_web::{test, App};
    use std::sync::Arc;

    fn test_state() -> AppState {
        let config = Arc::new(Config::default());
        let extractor =
            Arc::new(Extractor::new(config.extraction.clone()).expect("extractor builds"));
        AppState {
            config,
            extractor,
            started_at: std::time::Instant::now(),
        }
    }

    #[actix_web::test]
    async fn test_extract_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/extract", web::post().to(extract_handler)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/extract")
            .set_json(serde_json::json!({
                "query": "I need a plumber in Mozang, Lahore"
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["service"], "plumber");
        assert_eq!(body["location"], "Mozang, Lahore");
    }

    #[actix_web::test]
    async fn test_extract_endpoint_with_user_location() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/extract", web::post().to(extract_handler)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/extract")
            .set_json(serde_json::json!({
                "query": "umm i need plumber",
                "user_location": {
                    "area": "Mozang",
                    "city": "Lahore",
                    "state": "Punjab",
                    "country": "Pakistan"
                }
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["service"], "plumber");
        assert_eq!(body["location"], "Mozang, Lahore, Punjab, Pakistan");
    }

    #[actix_web::test]
    async fn test_empty_query_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/extract", web::post().to(extract_handler)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/extract")
            .set_json(serde_json::json!({ "query": "   " }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_bound_server_future_is_send() {
        // The main driver selects on this future from a multi-threaded
        // runtime; the bound server must stay Send even though the
        // App/HttpServer builders are not.
        fn assert_send<T: Send>() {}
        assert_send::<Server>();
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/health", web::get().to(health_handler)),
        )
        .await;

        let request = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["status"], "healthy");
    }
}
