pub mod alert;
pub mod api_football;
pub mod config;
pub mod error;
pub mod http_client;
pub mod model;
pub mod notify;
pub mod odds;
pub mod pipeline;
pub mod scan;
pub mod stats;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "home_pick=info";

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
