use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info,tower_http=debug";

/// Installs the global subscriber, writing formatted events to stdout.
///
/// Verbosity is controlled with `RUST_LOG`.
pub fn init() {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();
}
