//! Logging utilities
//!
//! All parser diagnostics go through the `log` facade. Applications pick the
//! sink; `init` installs `env_logger`, showing warnings unless `RUST_LOG`
//! says otherwise.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Initialize logging for tests, ignoring a logger that is already installed
#[cfg(test)]
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
