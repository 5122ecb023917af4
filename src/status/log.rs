use std::sync::Arc;

use super::StatusPlugin;
use crate::priority::Prioritizable;
use crate::ramlog::RamLog;

/// Recent log lines from the in-memory log.
pub struct LogSection {
    log: Arc<RamLog>,
}

impl LogSection {
    pub fn new(log: Arc<RamLog>) -> Self {
        Self { log }
    }
}

impl Prioritizable for LogSection {
    fn priority(&self) -> f64 {
        100.0
    }
}

impl StatusPlugin for LogSection {
    fn name(&self) -> &str {
        "Log"
    }

    fn render(&self, out: &mut String) {
        self.log.to_html(out);
    }
}
