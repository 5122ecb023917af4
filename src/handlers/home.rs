use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use super::traits::{HandlerError, WebHandler};
use super::types::{RequestContext, TEXT_HTML, WebResponse};
use crate::html;
use crate::observability::ProcessInfo;
use crate::priority::Prioritizable;
use crate::status::StatusRegistry;

/// `/_home`: process summary followed by every status section.
pub struct HomeHandler {
    status: Arc<StatusRegistry>,
    process: ProcessInfo,
}

impl HomeHandler {
    pub fn new(status: Arc<StatusRegistry>, process: ProcessInfo) -> Self {
        Self { status, process }
    }
}

impl Prioritizable for HomeHandler {
    fn priority(&self) -> f64 {
        1.0
    }
}

#[async_trait]
impl WebHandler for HomeHandler {
    fn name(&self) -> &str {
        "_home"
    }

    fn requires_rest(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError> {
        let mut out = html::start("web console");
        out.push_str(&html::p(&format!(
            "{} | {} | {}",
            html::a("/_status", "server status as JSON", "_status"),
            html::a("/_commands", "list of commands", "_commands"),
            html::a("/buildinfo?text=1", "", "buildinfo"),
        )));

        out.push_str("<pre>");
        out.push_str(&format!("version:  {}\n", self.process.version));
        out.push_str(&format!("sys info: {}\n", html::escape(&self.process.sys_info())));
        out.push_str(&format!("pid:      {}\n", self.process.pid));
        out.push_str(&format!("uptime:   {} seconds\n", self.process.uptime_secs()));
        out.push_str(&format!("client:   {}\n", ctx.origin));
        out.push_str("</pre>\n");

        self.status.render_all(&mut out);
        out.push_str(html::end());

        *response = WebResponse::new(StatusCode::OK, TEXT_HTML, out);
        Ok(())
    }
}
