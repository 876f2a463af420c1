//! `forge_*` logging macros over the `log` facade, plus helpers shared by
//! the xpath_forge crates and their tests.
//!
//! The macros take the same arguments as their `log` counterparts. Going
//! through them keeps every crate on one facade, whatever logger the binary
//! installs.

#[macro_export]
macro_rules! forge_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
macro_rules! forge_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[macro_export]
macro_rules! forge_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[macro_export]
macro_rules! forge_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[macro_export]
macro_rules! forge_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

/// Length-only stand-in for a secret such as the API key.
pub fn redact(secret: &str) -> String {
    match secret.chars().count() {
        0 => "<empty>".to_string(),
        len => format!("<redacted:{len}>"),
    }
}

/// Installs a stderr logger at debug level for tests. Later calls are no-ops.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let _ = TermLogger::init(
        log::LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}
