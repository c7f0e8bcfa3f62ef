//! Tracing subscriber setup for the CLI.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "ordersync";

/// Level for the crate's own events; `--verbose` opens up debug output.
fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// `RUST_LOG` overrides the level picked from `--verbose`.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(app_level(verbose).into())
        .from_env_lossy()
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init_logging(verbose: bool) {
    let app_filter = Targets::new().with_target(APP_TARGET, app_level(verbose));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter(verbose))
        .init();
}
