use std::sync::Arc;

use tracing::info;

use super::dispatcher::{Dispatcher, WebPolicy};
use crate::auth::{CredentialStore, DigestGateway, InMemoryCredentialStore};
use crate::commands::{BasicCommandEngine, CommandEngine};
use crate::config::Config;
use crate::handlers::HandlerRegistry;
use crate::observability::{Metrics, ProcessInfo};
use crate::ramlog::RamLog;
use crate::status::{LogSection, RequestsSection, StatusRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire the standalone console: in-memory credentials from `[auth]`, the
    /// basic command engine, the built-in status sections and handlers.
    pub fn build(config: Config, log: Arc<RamLog>) -> Self {
        let store: Arc<dyn CredentialStore> =
            Arc::new(InMemoryCredentialStore::from_config(&config.auth));
        Self::with_store(config, log, store)
    }

    pub fn with_store(config: Config, log: Arc<RamLog>, store: Arc<dyn CredentialStore>) -> Self {
        let process = ProcessInfo::current();
        let metrics = Arc::new(Metrics::new());

        let engine: Arc<dyn CommandEngine> = Arc::new(BasicCommandEngine::with_defaults(
            process.clone(),
            metrics.clone(),
            log.clone(),
        ));

        let mut status = StatusRegistry::new();
        status.register(Arc::new(RequestsSection::new(metrics.clone())));
        if config.server.http_interface {
            status.register(Arc::new(LogSection::new(log)));
        }
        status.init_all();

        let handlers = HandlerRegistry::with_builtins(engine, Arc::new(status), process);
        for line in handlers.describe() {
            info!(handler = %line, "Web handler ready");
        }

        let gateway = DigestGateway::new(store, config.auth.realm.clone());
        let dispatcher = Dispatcher::new(
            Arc::new(handlers),
            gateway,
            WebPolicy::from(&config.server),
            metrics.clone(),
        );

        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            metrics,
        }
    }
}
