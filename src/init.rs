use crate::convention::{parse_convention, Convention, UnknownConvention};
use crate::convert::Converter;
use crate::entry::DEFAULT_SERVICE;
use crate::env::{
    env_flag, env_or, process_env, FLUX_LOG_ADAPTER_CONVENTION_ENV, FLUX_LOG_ADAPTER_SERVICE_ENV,
    FLUX_LOG_ADAPTER_STDERR_ENV,
};
use crate::sink::Destination;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Adapter configuration.
///
/// Built once at startup and handed to the pipeline; nothing reads it
/// from global state.
///
/// **Fields**
/// - `destination`: stream the converted lines are written to.
/// - `convention`: message priority and dynamic-field exclusions.
/// - `service`: value of `serviceContext.service` in every entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterConfig {
    pub destination: Destination,
    pub convention: Convention,
    pub service: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            destination: Destination::Stdout,
            convention: Convention::Flux,
            service: DEFAULT_SERVICE.to_string(),
        }
    }
}

impl AdapterConfig {
    /// Defaults overlaid with the `FLUX_LOG_ADAPTER_*` environment variables.
    ///
    /// **Returns**
    /// - `Err(..)` if the convention variable names no known convention.
    pub fn from_env() -> Result<Self, UnknownConvention> {
        Self::from_lookup(process_env)
    }

    /// Same as [`AdapterConfig::from_env`], reading variables through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UnknownConvention> {
        let defaults = Self::default();
        let convention = match lookup(FLUX_LOG_ADAPTER_CONVENTION_ENV) {
            Some(name) => parse_convention(&name)?,
            None => defaults.convention,
        };

        Ok(Self {
            destination: Destination::from_stderr_flag(env_flag(&lookup, FLUX_LOG_ADAPTER_STDERR_ENV)),
            convention,
            service: env_or(&lookup, FLUX_LOG_ADAPTER_SERVICE_ENV, &defaults.service),
        })
    }

    pub fn converter(&self) -> Converter {
        Converter::new(self.convention, self.service.clone())
    }

    /// Filter used when `RUST_LOG` is not set.
    ///
    /// Quieter when diagnostics share stderr with the converted output.
    pub fn default_log_filter(&self) -> &'static str {
        match self.destination {
            Destination::Stdout => "warn",
            Destination::Stderr => "error",
        }
    }
}

/// Initialize the global `tracing` subscriber for diagnostics.
///
/// Diagnostics always go to stderr without ANSI colours; `RUST_LOG`
/// overrides [`AdapterConfig::default_log_filter`].
pub fn init_tracing(config: &AdapterConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.destination, Destination::Stdout);
        assert_eq!(config.convention, Convention::Flux);
        assert_eq!(config.service, "fluxcd");
        assert_eq!(config.default_log_filter(), "warn");
        assert_eq!(config.converter(), Converter::default());
    }

    fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(AdapterConfig::from_lookup(lookup(&[])), Ok(AdapterConfig::default()));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AdapterConfig::from_lookup(lookup(&[
            (FLUX_LOG_ADAPTER_STDERR_ENV, "true"),
            (FLUX_LOG_ADAPTER_CONVENTION_ENV, "Legacy"),
            (FLUX_LOG_ADAPTER_SERVICE_ENV, "image-reflector"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            AdapterConfig {
                destination: Destination::Stderr,
                convention: Convention::Legacy,
                service: "image-reflector".to_string(),
            }
        );
    }

    #[test]
    fn invalid_convention_in_environment_is_an_error() {
        let err = AdapterConfig::from_lookup(lookup(&[(FLUX_LOG_ADAPTER_CONVENTION_ENV, "sideways")]))
            .unwrap_err();
        assert_eq!(err, UnknownConvention("sideways".to_string()));
    }

    #[test]
    fn stderr_destination_is_quieter() {
        let config = AdapterConfig {
            destination: Destination::Stderr,
            ..AdapterConfig::default()
        };
        assert_eq!(config.default_log_filter(), "error");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_tracing(&AdapterConfig::default());
        init_tracing(&AdapterConfig::default());
    }
}
