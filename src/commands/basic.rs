use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::debug;

use super::{CommandEngine, CommandError, CommandInfo};
use crate::observability::{Metrics, ProcessInfo};
use crate::ramlog::RamLog;

type CommandFn = Box<dyn Fn(&Value) -> Result<Value, CommandError> + Send + Sync>;

struct Registered {
    info: CommandInfo,
    run: CommandFn,
}

/// Command engine backed by in-process closures.
#[derive(Default)]
pub struct BasicCommandEngine {
    commands: BTreeMap<String, Registered>,
}

impl BasicCommandEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, info: CommandInfo, run: F)
    where
        F: Fn(&Value) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        debug!(command = %info.name, web = info.web, "Registered command");
        self.commands.insert(
            info.name.clone(),
            Registered {
                info,
                run: Box::new(run),
            },
        );
    }

    /// `ping`, `buildinfo`, `serverStatus` and `hostInfo` are web-exposed;
    /// `getLog` is admin-only and listed but not reachable by URL.
    pub fn with_defaults(process: ProcessInfo, metrics: Arc<Metrics>, log: Arc<RamLog>) -> Self {
        let mut engine = Self::new();

        engine.register(
            CommandInfo::new("ping", "a way to check that the server is alive").web(),
            |_| Ok(json!({})),
        );

        let build = process.clone();
        engine.register(
            CommandInfo::new("buildinfo", "get version and build information").web(),
            move |_| {
                Ok(json!({
                    "version": build.version,
                    "gitVersion": option_env!("WEBCONSOLE_GIT_HASH").unwrap_or("unknown"),
                    "sysInfo": build.sys_info(),
                    "bits": usize::BITS,
                    "debug": cfg!(debug_assertions),
                }))
            },
        );

        let status = process.clone();
        engine.register(
            CommandInfo::new(
                "serverStatus",
                "returns lots of administrative server statistics; {repl: <n>} adds replication detail",
            )
            .web(),
            move |args| {
                let mut doc = json!({
                    "version": status.version,
                    "pid": status.pid,
                    "uptime": status.uptime_secs(),
                    "localTime": Utc::now().to_rfc3339(),
                    "requests": metrics.snapshot(),
                });
                if let Some(level) = args.get("repl").and_then(Value::as_i64) {
                    doc["repl"] = json!({ "level": level });
                }
                Ok(doc)
            },
        );

        engine.register(
            CommandInfo::new("hostInfo", "returns information about the daemon's host").web(),
            |_| {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1);
                Ok(json!({
                    "os": std::env::consts::OS,
                    "arch": std::env::consts::ARCH,
                    "numCores": cpus,
                    "currentTime": Utc::now().to_rfc3339(),
                }))
            },
        );

        engine.register(
            CommandInfo::new("getLog", "returns the most recent in-memory log lines").admin_only(),
            move |_| {
                let lines: Vec<String> = log.lines().iter().map(ToString::to_string).collect();
                Ok(json!({ "totalLinesWritten": lines.len(), "log": lines }))
            },
        );

        engine
    }
}

#[async_trait]
impl CommandEngine for BasicCommandEngine {
    fn find(&self, name: &str) -> Option<CommandInfo> {
        self.commands.get(name).map(|c| c.info.clone())
    }

    fn commands(&self) -> Vec<CommandInfo> {
        self.commands.values().map(|c| c.info.clone()).collect()
    }

    async fn execute(&self, name: &str, args: &Value) -> Result<Value, CommandError> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        (command.run)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> BasicCommandEngine {
        BasicCommandEngine::with_defaults(
            ProcessInfo::current(),
            Arc::new(Metrics::new()),
            Arc::new(RamLog::new("global", 4)),
        )
    }

    #[test]
    fn test_listing_is_sorted_and_flags_web_commands() {
        let engine = engine();
        let names: Vec<_> = engine.commands().into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["buildinfo", "getLog", "hostInfo", "ping", "serverStatus"]);
        assert!(engine.is_web_command("ping"));
        assert!(!engine.is_web_command("getLog"));
        assert!(!engine.is_web_command("shutdown"));
    }

    #[tokio::test]
    async fn test_server_status_echoes_repl_level() {
        let engine = engine();

        let doc = engine
            .execute("serverStatus", &json!({ "serverStatus": 1, "repl": 2 }))
            .await
            .unwrap();

        assert_eq!(doc["repl"]["level"], 2);
        assert!(doc["requests"]["requests"].is_u64());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let err = engine().execute("shutdown", &json!({})).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound(name) if name == "shutdown"));
    }

    #[tokio::test]
    async fn test_failing_command_reports_message() {
        let mut engine = BasicCommandEngine::new();
        engine.register(CommandInfo::new("flaky", "").web(), |_| {
            Err(CommandError::Failed("not master".to_string()))
        });

        let err = engine.execute("flaky", &json!({ "flaky": 1 })).await.unwrap_err();
        assert_eq!(err.to_string(), "not master");
    }
}
