//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy and control handlers
//! - Wire up middleware (tracing, timeout, request ID, body limits)
//! - Bind server to listener with graceful shutdown
//! - Dispatch requests: exclusions, engine, or direct transport
//! - Apply control messages to the playground store

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::blocklist::Blocklist;
use crate::config::{expected_prefix, validate_config, ConfigError, ProxyConfig};
use crate::engine::{EngineConfig, EngineResponse, ScopeEngine};
use crate::error::{Error, Result};
use crate::http::dispatch::{self, Dispatcher};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::intercept::Interceptor;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::playground::{ControlMessage, PlaygroundStore};
use crate::transport::{Transport, UpstreamRequest};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScopeEngine>,
    pub dispatcher: Arc<Dispatcher>,
    pub playground: Arc<PlaygroundStore>,
    pub transport: Transport,
    pub site_upstream: Option<Url>,
    /// Engine prefix derived from the registration scope.
    pub expected_prefix: Arc<str>,
    pub max_body_size: usize,
}

/// HTTP server for the scope proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    playground: Arc<PlaygroundStore>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated before anything is built.
    pub fn new(config: ProxyConfig) -> Result<Self> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let scope = Url::parse(&config.scope.url)?;
        let expected_prefix = expected_prefix(&scope)?;
        let site_upstream = config
            .site
            .upstream
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        let blocklist = Arc::new(Blocklist::new(&config.blocklist.patterns));
        let playground = Arc::new(PlaygroundStore::new());
        let transport = Transport::new(&config.timeouts)?;

        let mut engine = ScopeEngine::new(
            EngineConfig::default(),
            transport.clone(),
            config.listener.max_body_size,
        );
        engine.add_request_hook(Arc::new(Interceptor::new(
            blocklist.clone(),
            playground.clone(),
        )));

        tracing::info!(
            patterns = blocklist.len(),
            prefix = %expected_prefix,
            exclusions = config.dispatch.exclusions.len(),
            "Interception pipeline ready"
        );

        let state = AppState {
            engine: Arc::new(engine),
            dispatcher: Arc::new(Dispatcher::new(config.dispatch.exclusions.clone())),
            playground: playground.clone(),
            transport,
            site_upstream,
            expected_prefix: expected_prefix.into(),
            max_body_size: config.listener.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            playground,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new();
        if config.control.enabled {
            router = router.route(
                &config.control.path,
                post(control_handler)
                    .layer::<_, Infallible>(DefaultBodyLimit::disable())
                    .layer::<_, Infallible>(RequestBodyLimitLayer::new(
                        config.control.max_body_size,
                    )),
            );
        }

        let request_id = HeaderName::from_static(X_REQUEST_ID);
        router
            .fallback(proxy_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> std::result::Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scope = %self.config.scope.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Shared playground store, for feeding content without the control endpoint.
    pub fn playground(&self) -> Arc<PlaygroundStore> {
        self.playground.clone()
    }

    /// Consume the server, returning the configured router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Control endpoint. Always answers 204; unknown or malformed messages are dropped.
async fn control_handler(State(state): State<AppState>, body: Bytes) -> StatusCode {
    match serde_json::from_slice::<ControlMessage>(&body) {
        Ok(message) => {
            state.playground.apply(message);
        }
        Err(e) => tracing::debug!(error = %e, "Ignoring malformed control message"),
    }
    StatusCode::NO_CONTENT
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let url = dispatch::request_url(&request);

    if state.dispatcher.is_excluded(&url) {
        tracing::debug!(url = %url, "Excluded from interception");
        let response = direct(&state, request)
            .await
            .unwrap_or_else(IntoResponse::into_response);
        metrics::record_request("excluded", response.status().as_u16(), start_time);
        return response;
    }

    // Config must be loaded before any routing decision.
    state.engine.load_config();
    state.engine.ensure_prefix(&state.expected_prefix);

    let claimed = state.engine.route(request.uri());
    if request.uri().path().starts_with(&*state.expected_prefix) {
        tracing::debug!(
            url = %url,
            prefix = %state.expected_prefix,
            routed = claimed,
            "Saw prefixed request"
        );
    }

    let (kind, response) = if claimed {
        let response = match state.engine.fetch(request).await {
            Ok(EngineResponse::Intercepted(intercepted)) => intercepted.into_response(),
            Ok(EngineResponse::Fetched(fetched)) => response::finalize(fetched),
            Err(e) => e.into_response(),
        };
        ("proxied", response)
    } else {
        let response = direct(&state, request)
            .await
            .unwrap_or_else(IntoResponse::into_response);
        ("direct", response)
    };

    metrics::record_request(kind, response.status().as_u16(), start_time);
    response
}

/// Fetch a request the engine does not handle.
async fn direct(state: &AppState, request: Request<Body>) -> Result<Response> {
    let Some(url) = dispatch::direct_target(request.uri(), state.site_upstream.as_ref()) else {
        return Ok((StatusCode::NOT_FOUND, "Not Found").into_response());
    };

    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| Error::Body(e.to_string()))?;

    let fetched = state
        .transport
        .fetch(UpstreamRequest {
            method: parts.method,
            url,
            headers: parts.headers,
            body,
        })
        .await?;
    Ok(response::from_fetched(fetched))
}
