//! Environment variable names used by this crate for configuring the
//! adapter when it runs as a sidecar or log-pipe.
//!
//! These are purely helpers; [`crate::convert::Converter`] itself never
//! reads the environment.

/// Write converted output to stderr instead of stdout (`1`, `true`, `yes`, `on`).
pub const FLUX_LOG_ADAPTER_STDERR_ENV: &str = "FLUX_LOG_ADAPTER_STDERR";

/// Field convention name, `flux` or `legacy`.
pub const FLUX_LOG_ADAPTER_CONVENTION_ENV: &str = "FLUX_LOG_ADAPTER_CONVENTION";

/// Service name written into `serviceContext.service`.
pub const FLUX_LOG_ADAPTER_SERVICE_ENV: &str = "FLUX_LOG_ADAPTER_SERVICE";

/// Look up a variable in the process environment.
///
/// Unset and non-UTF-8 values both come back as `None`.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read a variable through `lookup` or fall back to a provided default.
pub fn env_or(lookup: impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Read a variable through `lookup` as a boolean switch.
///
/// Unset or unrecognised values count as `false`.
pub fn env_flag(lookup: impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
