use async_trait::async_trait;
use thiserror::Error;

use super::types::{RequestContext, WebResponse};
use crate::priority::Prioritizable;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("command not found: {0}")]
    UnknownCommand(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("fatal handler error: {0}")]
    Fatal(String),
}

/// A unit owning the response for one URL or a family of URLs.
///
/// Handlers are registered at startup and resolved by the first one, in
/// ascending priority, whose [`handles`](WebHandler::handles) accepts the path.
#[async_trait]
pub trait WebHandler: Prioritizable + Send + Sync {
    fn name(&self) -> &str;

    /// Only served when the console runs with REST enabled.
    fn requires_rest(&self) -> bool;

    fn default_url(&self) -> String {
        format!("/{}", self.name())
    }

    /// Match predicate; exact match on [`default_url`](WebHandler::default_url)
    /// unless overridden.
    fn handles(&self, url: &str) -> bool {
        url == self.default_url()
    }

    /// Fill in status, headers and body.
    async fn handle(
        &self,
        ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError>;
}
