use std::sync::Arc;

use tracing::debug;

use super::builtin::{CommandListHandler, CommandsHandler, FavIconHandler, StatusHandler};
use super::home::HomeHandler;
use super::traits::WebHandler;
use crate::commands::CommandEngine;
use crate::observability::ProcessInfo;
use crate::priority::sort_by_priority;
use crate::status::StatusRegistry;

/// Ordered set of web handlers.
///
/// Built once by the process entry point and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn WebHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and re-sort the whole registry by priority.
    pub fn register(&mut self, handler: Arc<dyn WebHandler>) {
        debug!(
            handler = handler.name(),
            priority = handler.priority(),
            rest = handler.requires_rest(),
            "Registered web handler"
        );
        self.handlers.push(handler);
        sort_by_priority(&mut self.handlers);
    }

    /// First handler in priority order that accepts `url`.
    pub fn resolve(&self, url: &str) -> Option<Arc<dyn WebHandler>> {
        self.handlers.iter().find(|h| h.handles(url)).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn WebHandler>> {
        self.handlers.iter()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// `name priority: P rest: R` for every handler, in resolution order.
    pub fn describe(&self) -> Vec<String> {
        self.handlers
            .iter()
            .map(|h| {
                format!(
                    "{} priority: {} rest: {}",
                    h.name(),
                    h.priority(),
                    h.requires_rest()
                )
            })
            .collect()
    }

    /// Registry holding the built-in handlers: favicon, `_status`, `_home`,
    /// `_commands`, and per-command URLs.
    pub fn with_builtins(
        engine: Arc<dyn CommandEngine>,
        status: Arc<StatusRegistry>,
        process: ProcessInfo,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FavIconHandler));
        registry.register(Arc::new(StatusHandler::new(engine.clone())));
        registry.register(Arc::new(HomeHandler::new(status, process)));
        registry.register(Arc::new(CommandListHandler::new(engine.clone())));
        registry.register(Arc::new(CommandsHandler::new(engine)));
        registry
    }
}
