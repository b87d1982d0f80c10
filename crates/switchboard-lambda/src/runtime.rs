//! Process-wide strategy registry.
//!
//! The registry is built once at cold start and shared by every warm
//! invocation the execution environment serves afterwards.

use std::sync::OnceLock;
use std::time::Instant;

use switchboard_core::StrategyRegistry;
use tracing::info;

static REGISTRY: OnceLock<StrategyRegistry> = OnceLock::new();

/// Build and store the registry, returning the stored reference.
///
/// `build` runs at most once for the lifetime of the process; later
/// calls return the registry built first.
pub fn init_registry<F>(build: F) -> &'static StrategyRegistry
where
    F: FnOnce() -> StrategyRegistry,
{
    REGISTRY.get_or_init(|| {
        let started = Instant::now();
        let registry = build();
        info!(
            strategies = registry.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "strategy registry initialized"
        );
        registry
    })
}

/// Get the process-wide registry.
///
/// # Panics
///
/// Panics if [`init_registry`] has not been called.
pub fn get_registry() -> &'static StrategyRegistry {
    REGISTRY
        .get()
        .expect("strategy registry not initialized. Call init_registry() first.")
}
