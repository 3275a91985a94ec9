//! Logging utilities
//!
//! The library only emits records through the `log` facade. Applications pick
//! the sink; these helpers wire up `env_logger` for the common case.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter such as `"debug"` or
/// `"rust_window=trace"`; `RUST_LOG` still overrides it
///
/// Returns `false` when a logger was already installed.
pub fn init_with_level(filter: &str) -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_logger() {
        // Whichever call wins, the next one must see a logger in place
        let _ = init_with_level("warn");
        assert!(!init_with_level("debug"));
    }
}
