//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with the `info` level as fallback
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system
///
/// `RUST_LOG` wins when set; otherwise `level` is used as the default filter.
/// Calling this more than once is harmless, later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialized, keeping existing configuration");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_with_level("debug");
        init();
        init_with_level("trace");
        info!("logger still usable after repeated init");
    }
}
