//! Ready-server: the single notification endpoint.
//!
//! One listener, one route. A request carrying the `server=ready` query is a
//! ready-ping from the server-side build; `OPTIONS` is answered as a bare CORS
//! preflight; anything else opens a new Server-Sent Events subscription and
//! takes over the subscriber slot.

use crate::config::ClientConfig;
use crate::cors::with_cors;
use crate::error::{ConfigError, ReloadError, Result};
use crate::readiness::BuildReadinessTracker;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{sse::Event, IntoResponse, Response, Sse},
    Router,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

/// Query pair that marks a request as a ready-ping.
pub const READY_PING_QUERY: &str = "server=ready";

/// Running ready-server.
///
/// The listener is bound when the server is constructed. Dropping the handle
/// stops accepting connections.
#[derive(Debug)]
pub struct ReadinessServer {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ReadinessServer {
    /// Bind the configured host/port and start serving.
    ///
    /// # Errors
    ///
    /// Returns [`ReloadError::Bind`] if the address is unavailable and
    /// [`ReloadError::Config`] if the app origin cannot be used as a header.
    pub async fn bind(config: &ClientConfig, tracker: Arc<BuildReadinessTracker>) -> Result<Self> {
        let origin = HeaderValue::from_str(&config.app_origin).map_err(|_| {
            ConfigError::InvalidValue {
                field: "appOrigin".to_string(),
                value: config.app_origin.clone(),
                hint: "The origin must be a valid header value".to_string(),
            }
        })?;

        let address = &config.address;
        let listener = TcpListener::bind((address.host.as_str(), address.port))
            .await
            .map_err(|e| ReloadError::bind(&address.host, address.port, e))?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "Reload server listening on {}:{}. Pushing events to client at {}",
            address.host,
            address.port,
            config.app_origin
        );

        let app = router(tracker, origin);
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("{}", ReloadError::Server(e.to_string()));
            }
        });

        Ok(Self { local_addr, task })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for ReadinessServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Build the router for the notification endpoint.
///
/// Every request, whatever its path, lands in one handler; responses carry
/// the cross-origin headers for `origin`.
pub fn router(tracker: Arc<BuildReadinessTracker>, origin: HeaderValue) -> Router {
    with_cors(Router::new().fallback(handle_request), origin).with_state(tracker)
}

/// Whether `uri` carries the ready-ping query, regardless of path.
pub fn is_ready_ping(uri: &Uri) -> bool {
    uri.query()
        .is_some_and(|query| query.split('&').any(|pair| pair == READY_PING_QUERY))
}

async fn handle_request(
    State(tracker): State<Arc<BuildReadinessTracker>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if is_ready_ping(&uri) {
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("-");
        tracing::info!("{} {}", uri, host);

        tracker.mark_server_ready();
        return StatusCode::OK.into_response();
    }

    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let events = tracker
        .channel()
        .connect()
        .map(|data| Ok::<_, Infallible>(Event::default().data(data)));

    (
        [(header::CONNECTION, HeaderValue::from_static("keep-alive"))],
        Sse::new(events),
    )
        .into_response()
}
