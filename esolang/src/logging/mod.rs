//! Tracing setup

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. `RUST_LOG` wins when set; otherwise
/// `verbosity` 1 enables `esolang=debug` and 2+ `esolang=trace`. With
/// neither, no subscriber is installed.
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match default_directive(verbosity) {
                Some(directive) => EnvFilter::new(directive),
                None => return,
            },
        };
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .try_init();
    });
}

fn default_directive(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("esolang=debug"),
        _ => Some("esolang=trace"),
    }
}
