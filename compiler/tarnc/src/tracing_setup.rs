//! Opt-in diagnostic logging.
//!
//! Nothing is installed unless `TARN_LOG` or `RUST_LOG` is set, so the
//! normal output of a script is never mixed with log lines.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let Some(filter) = std::env::var("TARN_LOG")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
    else {
        return;
    };
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if std::env::var("TARN_LOG_TREE").is_ok_and(|v| v == "1") {
        tracing_subscriber::registry()
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    }
}
