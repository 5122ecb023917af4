//! Status report sections contributed by independent subsystems.
//!
//! Each [`StatusPlugin`] renders one fragment of the console home page.
//! Sections are registered at startup, initialized once by
//! [`StatusRegistry::init_all`], and rendered in ascending priority order.
//!
//! A section's `render` is trusted not to fail; nothing here isolates one
//! section from another.

mod log;
mod requests;

pub use log::LogSection;
pub use requests::RequestsSection;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::priority::{Prioritizable, sort_by_priority};

pub trait StatusPlugin: Prioritizable + Send + Sync {
    fn name(&self) -> &str;

    fn sub_heading(&self) -> &str {
        ""
    }

    /// One-time setup, run by [`StatusRegistry::init_all`].
    fn init(&self) {}

    fn render(&self, out: &mut String);
}

#[derive(Default)]
pub struct StatusRegistry {
    plugins: Vec<Arc<dyn StatusPlugin>>,
    initialized: bool,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn StatusPlugin>) {
        debug!(section = plugin.name(), priority = plugin.priority(), "Registered status section");
        self.plugins.push(plugin);
    }

    /// Sort by priority, then run every `init` hook in that order.
    ///
    /// Only the first call does anything.
    pub fn init_all(&mut self) {
        if self.initialized {
            warn!("Status sections already initialized");
            return;
        }
        sort_by_priority(&mut self.plugins);
        for plugin in &self.plugins {
            plugin.init();
        }
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Append every section: a `<hr>` separator, the bold name, the
    /// subheading, then the section body.
    pub fn render_all(&self, out: &mut String) {
        if !self.initialized {
            warn!("Rendering status sections before init_all");
        }
        for plugin in &self.plugins {
            out.push_str("<hr>\n");
            out.push_str("<b>");
            out.push_str(plugin.name());
            out.push_str("</b>");
            out.push(' ');
            out.push_str(plugin.sub_heading());
            out.push_str("<br>\n");
            plugin.render(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Section {
        name: &'static str,
        priority: f64,
        inits: AtomicUsize,
    }

    impl Section {
        fn new(name: &'static str, priority: f64) -> Arc<Self> {
            Arc::new(Self {
                name,
                priority,
                inits: AtomicUsize::new(0),
            })
        }
    }

    impl Prioritizable for Section {
        fn priority(&self) -> f64 {
            self.priority
        }
    }

    impl StatusPlugin for Section {
        fn name(&self) -> &str {
            self.name
        }

        fn sub_heading(&self) -> &str {
            "(sub)"
        }

        fn init(&self) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn render(&self, out: &mut String) {
            out.push_str(&format!("body-{}\n", self.name));
        }
    }

    #[test]
    fn test_render_all_in_priority_order() {
        let mut registry = StatusRegistry::new();
        registry.register(Section::new("Log", 100.0));
        registry.register(Section::new("Replication", 10.0));
        registry.register(Section::new("Connections", 50.0));
        registry.init_all();

        let mut out = String::new();
        registry.render_all(&mut out);

        assert_eq!(
            out,
            "<hr>\n<b>Replication</b> (sub)<br>\nbody-Replication\n\
             <hr>\n<b>Connections</b> (sub)<br>\nbody-Connections\n\
             <hr>\n<b>Log</b> (sub)<br>\nbody-Log\n"
        );
    }

    #[test]
    fn test_init_all_runs_once() {
        let section = Section::new("Log", 100.0);
        let mut registry = StatusRegistry::new();
        registry.register(section.clone());

        registry.init_all();
        registry.init_all();

        assert!(registry.is_initialized());
        assert_eq!(section.inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_registry_renders_nothing() {
        let mut registry = StatusRegistry::new();
        registry.init_all();

        let mut out = String::new();
        registry.render_all(&mut out);
        assert!(out.is_empty());
        assert!(registry.is_empty());
    }
}
