use crate::record::Severity;
use std::fmt;
use std::str::FromStr;

/// Field layout conventions seen in Flux log output.
///
/// The two conventions disagree on which of `warn`/`err` wins when both are
/// present and on whether `caller` is repeated among the dynamic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convention {
    /// `warn` > `err` > `msg` > `info` > `output`; `ts` and `caller` are
    /// left out of the dynamic fields.
    #[default]
    Flux,
    /// `err` > `warn` > `msg` > `info` > `output`; only `ts` is left out of
    /// the dynamic fields.
    Legacy,
}

const FLUX_PRIORITY: &[(&str, Severity)] = &[
    ("warn", Severity::Warning),
    ("err", Severity::Error),
    ("msg", Severity::Info),
    ("info", Severity::Info),
    ("output", Severity::Info),
];

const LEGACY_PRIORITY: &[(&str, Severity)] = &[
    ("err", Severity::Error),
    ("warn", Severity::Warning),
    ("msg", Severity::Info),
    ("info", Severity::Info),
    ("output", Severity::Info),
];

impl Convention {
    /// Message-bearing keys in the order they are tried, with the severity
    /// each one implies.
    pub fn message_keys(&self) -> &'static [(&'static str, Severity)] {
        match self {
            Convention::Flux => FLUX_PRIORITY,
            Convention::Legacy => LEGACY_PRIORITY,
        }
    }

    /// Whether `key` is dropped from the dynamic fields of an entry.
    pub fn excludes_from_tail(&self, key: &str) -> bool {
        match self {
            Convention::Flux => key == "ts" || key == "caller",
            Convention::Legacy => key == "ts",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Convention::Flux => "flux",
            Convention::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a convention name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log convention {0:?} (expected \"flux\" or \"legacy\")")]
pub struct UnknownConvention(pub String);

/// Parse a convention name, case-insensitively.
///
/// Examples:
/// - "flux" or "warn-first"
/// - "legacy" or "err-first"
pub fn parse_convention(name: &str) -> Result<Convention, UnknownConvention> {
    match name.trim().to_ascii_lowercase().as_str() {
        "flux" | "warn-first" => Ok(Convention::Flux),
        "legacy" | "err-first" => Ok(Convention::Legacy),
        _ => Err(UnknownConvention(name.to_string())),
    }
}

impl FromStr for Convention {
    type Err = UnknownConvention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_convention(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!(parse_convention("flux"), Ok(Convention::Flux));
        assert_eq!(parse_convention(" Warn-First "), Ok(Convention::Flux));
        assert_eq!(parse_convention("LEGACY"), Ok(Convention::Legacy));
        assert_eq!("err-first".parse::<Convention>(), Ok(Convention::Legacy));
        assert_eq!(
            parse_convention("stackdriver"),
            Err(UnknownConvention("stackdriver".to_string()))
        );
    }

    #[test]
    fn priority_orders_differ_only_at_the_top() {
        let flux: Vec<&str> = Convention::Flux.message_keys().iter().map(|(k, _)| *k).collect();
        let legacy: Vec<&str> = Convention::Legacy.message_keys().iter().map(|(k, _)| *k).collect();
        assert_eq!(flux, vec!["warn", "err", "msg", "info", "output"]);
        assert_eq!(legacy, vec!["err", "warn", "msg", "info", "output"]);
    }

    #[test]
    fn tail_exclusions() {
        assert!(Convention::Flux.excludes_from_tail("ts"));
        assert!(Convention::Flux.excludes_from_tail("caller"));
        assert!(!Convention::Flux.excludes_from_tail("msg"));
        assert!(Convention::Legacy.excludes_from_tail("ts"));
        assert!(!Convention::Legacy.excludes_from_tail("caller"));
    }

    #[test]
    fn default_is_flux() {
        assert_eq!(Convention::default(), Convention::Flux);
        assert_eq!(Convention::default().to_string(), "flux");
    }
}
