//! Handlers every console registers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::traits::{HandlerError, WebHandler};
use super::types::{APPLICATION_JSON, RequestContext, TEXT_HTML, TEXT_PLAIN, WebResponse};
use crate::commands::CommandEngine;
use crate::html;
use crate::priority::Prioritizable;

/// Commands folded into the `_status` document.
const STATUS_COMMANDS: [&str; 2] = ["serverStatus", "buildinfo"];

/// `/favicon.ico`: always 404 so browsers stop asking.
pub struct FavIconHandler;

impl Prioritizable for FavIconHandler {
    fn priority(&self) -> f64 {
        0.0
    }
}

#[async_trait]
impl WebHandler for FavIconHandler {
    fn name(&self) -> &str {
        "favicon.ico"
    }

    fn requires_rest(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        _ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError> {
        *response = WebResponse::new(StatusCode::NOT_FOUND, TEXT_PLAIN, "no favicon\n");
        Ok(())
    }
}

/// `/_status`: one JSON document with the output of each status command,
/// keyed by command name. A failing command contributes its error message.
pub struct StatusHandler {
    engine: Arc<dyn CommandEngine>,
}

impl StatusHandler {
    pub fn new(engine: Arc<dyn CommandEngine>) -> Self {
        Self { engine }
    }
}

impl Prioritizable for StatusHandler {
    fn priority(&self) -> f64 {
        1.0
    }
}

#[async_trait]
impl WebHandler for StatusHandler {
    fn name(&self) -> &str {
        "_status"
    }

    fn requires_rest(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError> {
        let mut doc = Map::new();

        for cmd in STATUS_COMMANDS {
            let mut args = Map::new();
            args.insert(cmd.to_string(), json!(1));
            if cmd == "serverStatus" {
                if let Some(repl) = ctx.param("repl") {
                    args.insert("repl".to_string(), json!(leading_int(repl)));
                }
            }

            let entry = match self.engine.execute(cmd, &Value::Object(args)).await {
                Ok(result) => result,
                Err(err) => {
                    debug!(command = cmd, error = %err, "Status command failed");
                    Value::String(err.to_string())
                }
            };
            doc.insert(cmd.to_string(), entry);
        }

        *response = WebResponse::new(
            StatusCode::OK,
            APPLICATION_JSON,
            serde_json::to_string(&Value::Object(doc))?,
        );
        Ok(())
    }
}

/// `/_commands`: HTML table of every known command.
pub struct CommandListHandler {
    engine: Arc<dyn CommandEngine>,
}

impl CommandListHandler {
    pub fn new(engine: Arc<dyn CommandEngine>) -> Self {
        Self { engine }
    }
}

impl Prioritizable for CommandListHandler {
    fn priority(&self) -> f64 {
        1.0
    }
}

#[async_trait]
impl WebHandler for CommandListHandler {
    fn name(&self) -> &str {
        "_commands"
    }

    fn requires_rest(&self) -> bool {
        true
    }

    async fn handle(
        &self,
        _ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError> {
        let mut out = html::start("Commands List");
        out.push_str(&html::p(&html::a("/", "back", "Home")));
        out.push_str(&html::p("<b>List of Commands</b>"));
        out.push_str("S:slave-ok  R:read-lock  W:write-lock  A:admin-only<br>\n");
        out.push_str(html::table());
        out.push_str("<tr><th>Command</th><th>Attributes</th><th>Help</th></tr>\n");
        for info in self.engine.commands() {
            info.html_help(&mut out);
        }
        out.push_str(html::table_end());
        out.push_str(html::end());

        *response = WebResponse::new(StatusCode::OK, TEXT_HTML, out);
        Ok(())
    }
}

/// `/<command>` for any web-exposed command.
///
/// Runs the command with `{ <command>: 1 }` and returns the result with an
/// `ok` field. Any `text` parameter, whatever its value, switches to
/// indented plain text.
pub struct CommandsHandler {
    engine: Arc<dyn CommandEngine>,
}

impl CommandsHandler {
    pub fn new(engine: Arc<dyn CommandEngine>) -> Self {
        Self { engine }
    }

    /// Everything after the first `/`.
    fn command_name(url: &str) -> &str {
        url.split_once('/').map(|(_, rest)| rest).unwrap_or("")
    }
}

impl Prioritizable for CommandsHandler {
    fn priority(&self) -> f64 {
        2.0
    }
}

#[async_trait]
impl WebHandler for CommandsHandler {
    fn name(&self) -> &str {
        "DUMMY COMMANDS"
    }

    fn requires_rest(&self) -> bool {
        true
    }

    fn handles(&self, url: &str) -> bool {
        self.engine.is_web_command(Self::command_name(url))
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        response: &mut WebResponse,
    ) -> Result<(), HandlerError> {
        let cmd = Self::command_name(&ctx.url);
        if !self.engine.is_web_command(cmd) {
            return Err(HandlerError::UnknownCommand(cmd.to_string()));
        }
        let text = ctx.has_param("text");

        let result = match self.engine.execute(cmd, &json!({ cmd: 1 })).await {
            Ok(Value::Object(mut fields)) => {
                fields.insert("ok".to_string(), json!(1.0));
                Value::Object(fields)
            }
            Ok(other) => json!({ "result": other, "ok": 1.0 }),
            Err(err) => json!({ "ok": 0.0, "errmsg": err.to_string() }),
        };

        *response = if text {
            let mut body = serde_json::to_string_pretty(&result)?;
            body.push('\n');
            WebResponse::new(StatusCode::OK, TEXT_PLAIN, body)
        } else {
            WebResponse::new(StatusCode::OK, APPLICATION_JSON, serde_json::to_string(&result)?)
        };
        Ok(())
    }
}

/// Leading optional sign and digits, like C `atoi`; anything else is 0.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -value } else { value }
}
