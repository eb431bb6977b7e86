//! Tracing subscriber setup for binaries and ad-hoc tools.
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` and falling back to `info`.
pub fn init() {
    init_with_default("info");
}

/// Install the fmt subscriber with an explicit fallback directive.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
