//! # Request Logging Middleware
//!
//! One structured log line per HTTP request: method, path, status and
//! duration, tagged with a request id.
//!
//! The request id is taken from the incoming `X-Request-ID` header when the
//! caller supplies one and generated otherwise. It is stored in the request
//! extensions for handlers and echoed on the response.
//!
//! # Usage
//!
//! ```
//! use axum::{Router, middleware, routing::get};
//! use mtt_gateway::api::middleware::logging::{LoggingState, logging_middleware};
//! use std::sync::Arc;
//!
//! let state = Arc::new(LoggingState::default());
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "ok" }))
//!     .layer(middleware::from_fn_with_state(state, logging_middleware));
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Level, debug, error, info, trace, warn};
use uuid::Uuid;

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for successful requests.
    pub success_level: Level,
    /// Log level for client errors (4xx).
    pub client_error_level: Level,
    /// Log level for server errors (5xx).
    pub server_error_level: Level,
    /// Whether to log request headers at debug level.
    pub log_headers: bool,
    /// Headers to redact from logs.
    pub redacted_headers: Vec<String>,
    /// Whether to assign and echo request IDs.
    pub generate_request_id: bool,
    /// Header name for request ID.
    pub request_id_header: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            success_level: Level::INFO,
            client_error_level: Level::WARN,
            server_error_level: Level::ERROR,
            log_headers: false,
            redacted_headers: vec![
                "authorization".to_string(),
                "cookie".to_string(),
                "x-api-key".to_string(),
                "x-api-secret".to_string(),
            ],
            generate_request_id: true,
            request_id_header: "X-Request-ID".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Creates a new logging config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables header logging.
    #[must_use]
    pub fn with_headers(mut self) -> Self {
        self.log_headers = true;
        self
    }

    /// Adds headers to redact.
    #[must_use]
    pub fn with_redacted_headers(mut self, headers: Vec<String>) -> Self {
        self.redacted_headers.extend(headers);
        self
    }

    /// Disables request ID handling.
    #[must_use]
    pub fn without_request_id(mut self) -> Self {
        self.generate_request_id = false;
        self
    }

    /// Sets a custom request ID header name.
    #[must_use]
    pub fn with_request_id_header(mut self, header: impl Into<String>) -> Self {
        self.request_id_header = header.into();
        self
    }

    /// Level a response with `status` is logged at.
    #[must_use]
    pub fn level_for(&self, status: StatusCode) -> Level {
        if status.is_server_error() {
            self.server_error_level
        } else if status.is_client_error() {
            self.client_error_level
        } else {
            self.success_level
        }
    }
}

// ============================================================================
// Request ID
// ============================================================================

/// A unique request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generates a new random request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a request ID from an existing string.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Log Entry
// ============================================================================

/// A structured log entry for a completed request.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Request ID.
    pub request_id: String,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Query string (if any).
    pub query: Option<String>,
    /// Response status code.
    pub status: u16,
    /// Request duration in milliseconds.
    pub duration_ms: u64,
    /// User agent.
    pub user_agent: Option<String>,
}

impl LogEntry {
    /// Emits the entry at `level`.
    pub fn emit(&self, level: Level) {
        macro_rules! emit_at {
            ($macro:ident, $msg:literal) => {
                $macro!(
                    request_id = %self.request_id,
                    method = %self.method,
                    path = %self.path,
                    query = ?self.query,
                    status = self.status,
                    duration_ms = self.duration_ms,
                    user_agent = ?self.user_agent,
                    $msg
                )
            };
        }

        if level == Level::ERROR {
            emit_at!(error, "Request failed");
        } else if level == Level::WARN {
            emit_at!(warn, "Request rejected");
        } else if level == Level::INFO {
            emit_at!(info, "Request completed");
        } else if level == Level::DEBUG {
            emit_at!(debug, "Request completed");
        } else {
            emit_at!(trace, "Request completed");
        }
    }
}

// ============================================================================
// Sensitive Data Redaction
// ============================================================================

/// Redacts sensitive values from headers.
#[must_use]
pub fn redact_headers(headers: &HeaderMap, redacted_names: &[String]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value_str = if redacted_names
                .iter()
                .any(|r| r.eq_ignore_ascii_case(name.as_str()))
            {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.as_str().to_string(), value_str)
        })
        .collect()
}

// ============================================================================
// Logging State
// ============================================================================

/// Shared state for logging middleware.
#[derive(Debug, Clone)]
pub struct LoggingState {
    /// Configuration.
    pub config: LoggingConfig,
    header: Option<HeaderName>,
}

impl LoggingState {
    /// Creates a new logging state.
    ///
    /// An unparsable request ID header name disables request IDs.
    #[must_use]
    pub fn new(config: LoggingConfig) -> Self {
        let header = if config.generate_request_id {
            HeaderName::from_bytes(config.request_id_header.as_bytes()).ok()
        } else {
            None
        };
        if config.generate_request_id && header.is_none() {
            warn!(header = %config.request_id_header, "invalid request id header, ids disabled");
        }
        Self { config, header }
    }

    fn request_id(&self, headers: &HeaderMap) -> Option<RequestId> {
        let header = self.header.as_ref()?;
        let id = headers
            .get(header)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(RequestId::from_string)
            .unwrap_or_default();
        Some(id)
    }
}

impl Default for LoggingState {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Logging middleware function.
///
/// Logs each request once, after the response is produced, at the level
/// configured for its status class.
pub async fn logging_middleware(
    State(state): State<Arc<LoggingState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let request_id = state.request_id(request.headers());
    if let Some(id) = &request_id {
        request.extensions_mut().insert(id.clone());
    }

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if state.config.log_headers {
        let headers = redact_headers(request.headers(), &state.config.redacted_headers);
        debug!(method = %method, path = %path, headers = ?headers, "Request headers");
    }

    let mut response = next.run(request).await;

    if let (Some(header), Some(id)) = (&state.header, &request_id)
        && let Ok(value) = HeaderValue::from_str(id.as_str())
    {
        response.headers_mut().insert(header.clone(), value);
    }

    let status = response.status();
    let entry = LogEntry {
        request_id: request_id.map(|id| id.0).unwrap_or_default(),
        method,
        path,
        query,
        status: status.as_u16(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        user_agent,
    };
    entry.emit(state.config.level_for(status));

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{Extension, Router, middleware, routing::get};
    use tower::ServiceExt;

    fn app(config: LoggingConfig) -> Router {
        let state = Arc::new(LoggingState::new(config));
        Router::new()
            .route(
                "/id",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .route("/plain", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state, logging_middleware))
    }

    #[test]
    fn logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.success_level, Level::INFO);
        assert!(!config.log_headers);
        assert!(config.generate_request_id);
        assert_eq!(config.request_id_header, "X-Request-ID");
    }

    #[test]
    fn logging_config_builders() {
        let config = LoggingConfig::new()
            .with_headers()
            .with_redacted_headers(vec!["x-custom-secret".to_string()])
            .with_request_id_header("X-Correlation-ID");
        assert!(config.log_headers);
        assert!(config.redacted_headers.contains(&"x-custom-secret".to_string()));
        assert_eq!(config.request_id_header, "X-Correlation-ID");
        assert!(!config.without_request_id().generate_request_id);
    }

    #[test]
    fn level_follows_status_class() {
        let config = LoggingConfig::default();
        assert_eq!(config.level_for(StatusCode::OK), Level::INFO);
        assert_eq!(config.level_for(StatusCode::CREATED), Level::INFO);
        assert_eq!(config.level_for(StatusCode::CONFLICT), Level::WARN);
        assert_eq!(config.level_for(StatusCode::SERVICE_UNAVAILABLE), Level::ERROR);
    }

    #[test]
    fn request_id_new_is_unique() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn request_id_display() {
        let id = RequestId::from_string("display-test");
        assert_eq!(id.to_string(), "display-test");
    }

    #[test]
    fn redact_headers_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer token"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let result = redact_headers(&headers, &["AUTHORIZATION".to_string()]);
        let auth = result.iter().find(|(k, _)| k == "authorization").unwrap();
        let content = result.iter().find(|(k, _)| k == "content-type").unwrap();
        assert_eq!(auth.1, "[REDACTED]");
        assert_eq!(content.1, "application/json");
    }

    #[test]
    fn invalid_header_name_disables_ids() {
        let state = LoggingState::new(LoggingConfig::default().with_request_id_header("bad header"));
        assert!(state.request_id(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn generates_and_echoes_request_id() {
        let response = app(LoggingConfig::default())
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = response.headers().get("x-request-id").unwrap();
        assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn propagates_caller_request_id() {
        let response = app(LoggingConfig::default())
            .oneshot(
                Request::builder()
                    .uri("/id")
                    .header("X-Request-ID", "caller-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), "caller-42");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"caller-42");
    }

    #[tokio::test]
    async fn no_header_when_disabled() {
        let response = app(LoggingConfig::default().without_request_id())
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().get("x-request-id").is_none());
    }
}
