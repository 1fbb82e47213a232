use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,lightbnb=debug";

/// Log output settings
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Filter directive used when RUST_LOG is unset
    pub filter: Option<String>,
    /// JSON lines instead of human-readable output
    pub json: bool,
}

/// Pick the filter directive: RUST_LOG, then the configured one, then the default.
fn filter_directive(env: Option<String>, configured: Option<&str>) -> String {
    env.filter(|s| !s.is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Initialize logging for a binary. Call once, before the first event.
pub fn init(service_name: &str, settings: &LogSettings) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), settings.filter.as_deref());
    let registry = tracing_subscriber::registry().with(EnvFilter::new(directive));

    if settings.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!(service = %service_name, "Logging initialized");
}
