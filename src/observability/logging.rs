//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber for binaries
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the default directive when set
//! - Output goes to stderr so command output on stdout stays machine-readable

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber with `default_directive` (e.g.
/// `"configme=info"`) unless `RUST_LOG` is set. A second call is a no-op.
pub fn init(default_directive: &str) {
    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_ok() {
        tracing::debug!(directive = default_directive, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init("configme=debug");
        init("configme=info");
    }
}
