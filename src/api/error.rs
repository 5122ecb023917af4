use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::AuthError;
use crate::handlers::{HandlerError, TEXT_HTML, TEXT_PLAIN, WebResponse};

#[derive(Debug, Error)]
pub enum WebError {
    #[error("not allowed")]
    AuthDenied { challenge: String },
    #[error("REST is not enabled")]
    RestDisabled { port: u16 },
    #[error("JSONP is not enabled")]
    JsonpDisabled,
    #[error("unknown url: {0}")]
    NotFound(String),
    #[error(transparent)]
    Lookup(#[from] AuthError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::AuthDenied { .. } => StatusCode::UNAUTHORIZED,
            WebError::RestDisabled { .. } => StatusCode::FORBIDDEN,
            WebError::JsonpDisabled => StatusCode::FORBIDDEN,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WebError::AuthDenied { .. } => "AUTH_DENIED",
            WebError::RestDisabled { .. } => "REST_DISABLED",
            WebError::JsonpDisabled => "JSONP_DISABLED",
            WebError::NotFound(_) => "NOT_FOUND",
            WebError::Lookup(_) => "LOOKUP_FAILED",
            WebError::Handler(_) => "HANDLER_FAILED",
        }
    }

    /// Full response for this error: status, headers and body.
    pub fn into_response(self) -> WebResponse {
        let status = self.status_code();
        match self {
            WebError::AuthDenied { challenge } => {
                let mut response = WebResponse {
                    status,
                    ..Default::default()
                };
                response.push_header("WWW-Authenticate", challenge);
                response.push_header("Content-Type", TEXT_PLAIN);
                response.body = "not allowed\n".to_string();
                response
            }
            WebError::RestDisabled { port } => WebResponse::new(
                status,
                TEXT_PLAIN,
                format!(
                    "REST is not enabled.  use --rest to turn on.\n\
                     check that port {port} is secured for the network too.\n"
                ),
            ),
            WebError::JsonpDisabled => WebResponse::new(
                status,
                TEXT_PLAIN,
                "JSONP is not enabled.  set server.jsonp to turn on.\n",
            ),
            WebError::NotFound(_) => WebResponse::new(
                status,
                TEXT_HTML,
                "<html><body>unknown url</body></html>\n",
            ),
            err @ (WebError::Lookup(_) | WebError::Handler(_)) => {
                WebResponse::new(status, TEXT_PLAIN, format!("{}: {err}\n", err.code()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CredentialError;

    #[test]
    fn test_auth_denied_carries_challenge() {
        let response = WebError::AuthDenied {
            challenge: "Digest realm=\"console\"".to_string(),
        }
        .into_response();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.header("WWW-Authenticate"), Some("Digest realm=\"console\""));
        assert_eq!(response.content_type(), Some(TEXT_PLAIN));
        assert_eq!(response.body, "not allowed\n");
    }

    #[test]
    fn test_rest_disabled_mentions_port() {
        let response = WebError::RestDisabled { port: 28017 }.into_response();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(
            response.body,
            "REST is not enabled.  use --rest to turn on.\n\
             check that port 28017 is secured for the network too.\n"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WebError::JsonpDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(WebError::NotFound("/x".into()).status_code(), StatusCode::NOT_FOUND);
        let lookup = WebError::from(AuthError::Lookup(CredentialError::Unavailable(
            "down".into(),
        )));
        assert_eq!(lookup.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(lookup.code(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_not_found_is_html() {
        let response = WebError::NotFound("/nope".into()).into_response();
        assert_eq!(response.content_type(), Some(TEXT_HTML));
        assert_eq!(response.body, "<html><body>unknown url</body></html>\n");
    }
}
