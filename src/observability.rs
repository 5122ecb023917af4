//! Request counters, process facts, and tracing setup

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::ramlog::{RamLog, RamLogLayer};

/// Counters for what the dispatcher has seen since startup
#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    internal_grants: AtomicU64,
    digest_grants: AtomicU64,
    challenges: AtomicU64,
    policy_rejections: AtomicU64,
    not_found: AtomicU64,
    failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn internal_grant(&self) {
        self.internal_grants.fetch_add(1, Ordering::Relaxed);
    }

    pub fn digest_grant(&self) {
        self.digest_grants.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "digest_grants", "Metric incremented");
    }

    pub fn challenge(&self) {
        self.challenges.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "challenges", "Metric incremented");
    }

    pub fn policy_rejection(&self) {
        self.policy_rejections.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "policy_rejections", "Metric incremented");
    }

    pub fn not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            internal_grants: self.internal_grants.load(Ordering::Relaxed),
            digest_grants: self.digest_grants.load(Ordering::Relaxed),
            challenges: self.challenges.load(Ordering::Relaxed),
            policy_rejections: self.policy_rejections.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub internal_grants: u64,
    pub digest_grants: u64,
    pub challenges: u64,
    pub policy_rejections: u64,
    pub not_found: u64,
    pub failures: u64,
}

/// Facts about the running process shown on the home page and by `buildinfo`.
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub pid: u32,
}

impl ProcessInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            started_at: Utc::now(),
            pid: std::process::id(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }

    pub fn sys_info(&self) -> String {
        format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
    }
}

/// Install the global subscriber: `EnvFilter` + fmt output + the in-memory log.
///
/// `RUST_LOG` wins over `logging.filter`. Returns the in-memory log so the
/// status page can show it.
pub fn init_tracing(config: &LoggingConfig) -> Arc<RamLog> {
    let log = Arc::new(RamLog::new("global", config.ram_log_lines));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(RamLogLayer::new(log.clone()))
        .try_init()
    {
        eprintln!("tracing subscriber already installed: {err}");
    }

    log
}
