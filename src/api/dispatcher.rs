//! Turns one HTTP request into one console response.
//!
//! Every request, whatever its outcome, comes back as a complete
//! [`WebResponse`]: failures are mapped through [`WebError::into_response`].

use std::net::SocketAddr;
use std::sync::Arc;

use bon::Builder;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use super::bootstrap::BOOTSTRAP_HTML;
use super::error::WebError;
use super::utils::{parse_params, split_url};
use crate::auth::{AuthOutcome, DigestGateway, Principal};
use crate::config::ServerConfig;
use crate::handlers::{HandlerRegistry, RequestContext, TEXT_HTML, WebResponse};
use crate::observability::Metrics;

/// What the transport hands to the dispatcher.
#[derive(Debug, Clone, Builder)]
pub struct IncomingRequest {
    /// e.g. `GET /_status HTTP/1.1`
    #[builder(into, default)]
    pub request_line: String,
    /// Path plus query string
    #[builder(into)]
    pub url: String,
    pub origin: SocketAddr,
    /// Raw `Authorization` header value
    #[builder(into)]
    pub authorization: Option<String>,
}

/// Server switches the dispatcher enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebPolicy {
    pub rest: bool,
    pub jsonp: bool,
    /// Reported in the REST rejection message
    pub port: u16,
}

impl From<&ServerConfig> for WebPolicy {
    fn from(server: &ServerConfig) -> Self {
        Self {
            rest: server.rest,
            jsonp: server.jsonp,
            port: server.port,
        }
    }
}

pub struct Dispatcher {
    handlers: Arc<HandlerRegistry>,
    gateway: DigestGateway,
    policy: WebPolicy,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(
        handlers: Arc<HandlerRegistry>,
        gateway: DigestGateway,
        policy: WebPolicy,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            handlers,
            gateway,
            policy,
            metrics,
        }
    }

    pub fn policy(&self) -> WebPolicy {
        self.policy
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub async fn handle_request(&self, request: &IncomingRequest) -> WebResponse {
        let span = info_span!(
            "console_request",
            request_id = %Uuid::new_v4(),
            origin = %request.origin,
            url = %request.url,
        );

        async {
            self.metrics.request();
            let mut response = match self.dispatch(request).await {
                Ok(response) => response,
                Err(err) => {
                    self.record_error(&err);
                    err.into_response()
                }
            };
            response.ensure_content_type();
            debug!(status = response.status.as_u16(), "Request complete");
            response
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: &IncomingRequest) -> Result<WebResponse, WebError> {
        let principal = self.authenticate(request)?;

        if request.url.is_empty() || request.url == "/" {
            return Ok(WebResponse::new(
                axum::http::StatusCode::OK,
                TEXT_HTML,
                BOOTSTRAP_HTML,
            ));
        }

        let (path, query) = split_url(&request.url);
        let params = parse_params(query);

        let Some(handler) = self.handlers.resolve(path) else {
            if !self.policy.rest {
                return Err(WebError::RestDisabled {
                    port: self.policy.port,
                });
            }
            return Err(WebError::NotFound(path.to_string()));
        };

        if handler.requires_rest() && !self.policy.rest {
            return Err(WebError::RestDisabled {
                port: self.policy.port,
            });
        }

        let callback = params
            .get("jsonp")
            .filter(|cb| !cb.is_empty())
            .cloned();
        if callback.is_some() && !self.policy.jsonp {
            return Err(WebError::JsonpDisabled);
        }

        let ctx = RequestContext {
            request_line: request.request_line.clone(),
            url: path.to_string(),
            params,
            origin: request.origin,
            principal,
        };

        debug!(handler = handler.name(), "Dispatching to handler");
        let mut response = WebResponse::default();
        handler.handle(&ctx, &mut response).await?;

        if let Some(callback) = callback {
            if response.status == axum::http::StatusCode::OK {
                response.body = format!("{callback}({})", response.body);
            }
        }

        Ok(response)
    }

    fn authenticate(&self, request: &IncomingRequest) -> Result<Principal, WebError> {
        match self
            .gateway
            .authorize(request.authorization.as_deref(), &request.origin)?
        {
            AuthOutcome::Authorized(principal) => {
                match principal {
                    Principal::Internal => self.metrics.internal_grant(),
                    Principal::User(_) => self.metrics.digest_grant(),
                }
                Ok(principal)
            }
            AuthOutcome::Challenged { challenge } => Err(WebError::AuthDenied { challenge }),
        }
    }

    fn record_error(&self, err: &WebError) {
        match err {
            WebError::AuthDenied { .. } => self.metrics.challenge(),
            WebError::RestDisabled { .. } | WebError::JsonpDisabled => {
                self.metrics.policy_rejection()
            }
            WebError::NotFound(_) => self.metrics.not_found(),
            WebError::Lookup(_) | WebError::Handler(_) => {
                warn!(code = err.code(), error = %err, "Request failed");
                self.metrics.failure()
            }
        }
    }
}
