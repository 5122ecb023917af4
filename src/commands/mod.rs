//! Administrative command engine boundary.
//!
//! The console never runs commands itself; it asks a [`CommandEngine`] which
//! commands exist, which of them may be reached over HTTP, and to execute
//! them. [`BasicCommandEngine`] is the engine the standalone binary ships.

mod basic;

pub use basic::BasicCommandEngine;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::html;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no such cmd: {0}")]
    NotFound(String),
    #[error("{0}")]
    Failed(String),
}

/// Lock a command takes while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    None,
    Read,
    Write,
}

/// Metadata the listing page shows for one command.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    pub name: String,
    pub help: String,
    pub slave_ok: bool,
    pub lock: LockType,
    pub admin_only: bool,
    /// Reachable as `/<name>` through the console.
    pub web: bool,
}

impl CommandInfo {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            slave_ok: true,
            lock: LockType::None,
            admin_only: false,
            web: false,
        }
    }

    pub fn web(mut self) -> Self {
        self.web = true;
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn lock(mut self, lock: LockType) -> Self {
        self.lock = lock;
        self
    }

    /// Attribute flags as shown in the listing, e.g. `R S A`.
    pub fn attributes(&self) -> String {
        let mut flags = Vec::new();
        match self.lock {
            LockType::Write => flags.push("W"),
            LockType::Read => flags.push("R"),
            LockType::None => {}
        }
        if self.slave_ok {
            flags.push("S");
        }
        if self.admin_only {
            flags.push("A");
        }
        flags.join(" ")
    }

    /// One `<tr>` of the command listing. Web commands link to their text view.
    pub fn html_help(&self, out: &mut String) {
        let name = html::escape(&self.name);
        out.push_str("<tr><td>");
        if self.web {
            out.push_str(&html::a(&format!("/{}?text=1", self.name), "", &name));
        } else {
            out.push_str(&name);
        }
        out.push_str("</td><td>");
        out.push_str(&self.attributes());
        out.push_str("</td><td>");
        out.push_str(&html::escape(&self.help));
        out.push_str("</td></tr>\n");
    }
}

#[async_trait]
pub trait CommandEngine: Send + Sync {
    fn find(&self, name: &str) -> Option<CommandInfo>;

    /// Every known command, sorted by name.
    fn commands(&self) -> Vec<CommandInfo>;

    fn is_web_command(&self, name: &str) -> bool {
        self.find(name).is_some_and(|info| info.web)
    }

    /// Run `name` with `args`, where `args` is `{ <name>: 1, ... }`.
    async fn execute(&self, name: &str, args: &Value) -> Result<Value, CommandError>;
}
