use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Crate-level filter and the `RUST_LOG` fallback directive for a verbosity.
fn levels(verbose: bool) -> (LevelFilter, &'static str) {
    if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    }
}

/// Installs the global subscriber. Request failures are logged at `warn` and
/// above even without `verbose`; `RUST_LOG` still applies on top.
pub fn init_logging(verbose: bool) {
    let (crate_level, fallback) = levels(verbose);
    let crate_filter = Targets::new().with_target(LOG_TARGET, crate_level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(crate_filter)
        .with(env_filter)
        .init();
}
