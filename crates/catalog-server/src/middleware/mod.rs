//! HTTP middleware layers: CORS and request tracing

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::config::CorsConfig;

/// Methods the catalog routes answer to
const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Origins accepted by the CORS layer
#[derive(Debug, PartialEq, Eq)]
enum Origins {
    Any,
    List(Vec<HeaderValue>),
}

impl Origins {
    fn from_config(config: &CorsConfig) -> Self {
        if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
            return Origins::Any;
        }

        let list = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                    None
                },
            })
            .collect();
        Origins::List(list)
    }
}

/// Build the CORS layer for the admin panel origins
///
/// Credentials are only enabled for an explicit origin list; browsers refuse
/// them alongside a wildcard origin.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .max_age(PREFLIGHT_MAX_AGE);

    match Origins::from_config(config) {
        Origins::Any => cors.allow_origin(AllowOrigin::any()),
        Origins::List(list) => cors
            .allow_origin(AllowOrigin::list(list))
            .allow_credentials(config.allow_credentials),
    }
}

/// Per-request span; responses at INFO with latency, 5xx at ERROR
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
