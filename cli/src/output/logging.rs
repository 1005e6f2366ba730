//! Diagnostic logging setup.
//!
//! Operator-facing progress goes through `OutputContext`; `tracing` carries
//! the diagnostic stream on stderr. `RUST_LOG` wins when set, otherwise the
//! level follows `-v`.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Safe to call more than once.
pub fn init(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "envprov_cli=debug",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
