//! Logging integration for the tabula library.
//!
//! Provides a helper for installing a [`tracing`]-based subscriber. The
//! library itself only emits `tracing::debug!` events from the compiler entry
//! points; applications that want to see them call [`init`] once at startup.

/// Installs a global tracing subscriber with the given filter directive.
///
/// The filter follows the `tracing_subscriber::EnvFilter` syntax (e.g.
/// `"debug"`, `"tabula=debug"`). Calling this more than once is harmless; a
/// subscriber that is already installed is left in place.
///
/// # Examples
///
/// ```
/// tabula_core::logging::init("info");
/// tracing::info!("logging ready");
/// ```
pub fn init(filter: &str) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}
