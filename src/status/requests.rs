use std::sync::Arc;

use super::StatusPlugin;
use crate::html;
use crate::observability::Metrics;
use crate::priority::Prioritizable;

/// Dispatcher counters as a two-column table.
pub struct RequestsSection {
    metrics: Arc<Metrics>,
}

impl RequestsSection {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl Prioritizable for RequestsSection {
    fn priority(&self) -> f64 {
        50.0
    }
}

impl StatusPlugin for RequestsSection {
    fn name(&self) -> &str {
        "Requests"
    }

    fn sub_heading(&self) -> &str {
        "(since startup)"
    }

    fn render(&self, out: &mut String) {
        let snapshot = self.metrics.snapshot();
        let rows = [
            ("requests", snapshot.requests),
            ("internal grants", snapshot.internal_grants),
            ("digest grants", snapshot.digest_grants),
            ("challenges", snapshot.challenges),
            ("policy rejections", snapshot.policy_rejections),
            ("not found", snapshot.not_found),
            ("failures", snapshot.failures),
        ];

        out.push_str(html::table());
        for (label, value) in rows {
            out.push_str(&format!("<tr><td>{label}</td><td>{value}</td></tr>\n"));
        }
        out.push_str(html::table_end());
    }
}
