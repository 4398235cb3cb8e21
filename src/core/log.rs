//! Console tracing for `fxc`. Quiet by default; `--verbose` turns on debug
//! output for this crate and `RUST_LOG` overrides both.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const APP_TARGET: &str = "fxc";

fn app_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    }
}

fn env_filter(fallback: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback.to_string()))
}

pub fn init_logging(verbose: bool) {
    let level = app_level(verbose);
    let console = fmt::layer()
        .pretty()
        .without_time()
        .with_filter(Targets::new().with_target(APP_TARGET, level));

    tracing_subscriber::registry()
        .with(console)
        .with(env_filter(level))
        .init();
}
