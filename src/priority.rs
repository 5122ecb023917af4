//! Priority ordering shared by web handlers and status sections.

use std::sync::Arc;

/// Anything registered with a numeric priority. Lower values sort first.
///
/// The priority is fixed when the object is built and never changes while it
/// sits in a registry.
pub trait Prioritizable {
    fn priority(&self) -> f64;
}

/// Sort registrants ascending by priority.
///
/// `sort_by` is stable, so registrants with equal priority keep their
/// insertion order. Callers should not rely on that across unrelated
/// registrants.
pub fn sort_by_priority<T>(items: &mut [Arc<T>])
where
    T: Prioritizable + ?Sized,
{
    items.sort_by(|a, b| a.priority().total_cmp(&b.priority()));
}
