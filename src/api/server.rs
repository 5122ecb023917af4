use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::dispatcher::IncomingRequest;
use super::state::AppState;
use crate::config::Config;
use crate::handlers::WebResponse;
use crate::ramlog::RamLog;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every path goes through the dispatcher; axum only does transport.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config, log: Arc<RamLog>) -> Result<(), AnyError> {
    let address = config.server.bind_addr();
    let state = AppState::build(config, log);
    let policy = state.dispatcher.policy();

    let listener = TcpListener::bind(address).await?;
    info!(%address, rest = policy.rest, jsonp = policy.jsonp, "Web console listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(origin): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
) -> WebResponse {
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let request = IncomingRequest::builder()
        .request_line(format!("{method} {url} {version:?}"))
        .url(url)
        .origin(origin)
        .maybe_authorization(
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
        )
        .build();

    state.dispatcher.handle_request(&request).await
}

impl IntoResponse for WebResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!(header = %name, "Dropping unrepresentable response header"),
            }
        }

        (self.status, headers, self.body).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
