//! The fixed severity ordering shared by event parsing, configuration, and
//! filtering.

use std::fmt;

/// Severity of a log event, ordered most-to-least severe.
///
/// The derived `Ord` follows [`Severity::rank`], so `Error < Trace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Trace,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Trace,
    ];

    /// Position in [`Severity::ALL`]: 0 for `ERROR` up to 3 for `TRACE`.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Trace => "TRACE",
        }
    }

    /// Parse the exact upper-case name as it appears in log lines.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ERROR" => Some(Severity::Error),
            "WARN" => Some(Severity::Warn),
            "INFO" => Some(Severity::Info),
            "TRACE" => Some(Severity::Trace),
            _ => None,
        }
    }

    /// Parse a severity name in any letter case.
    pub fn parse_ignore_case(s: &str) -> Option<Self> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
    }

    /// True when `self` ranks below `threshold`, i.e. it is filtered out.
    pub fn is_less_severe_than(self, threshold: Severity) -> bool {
        self.rank() > threshold.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_fixed_order() {
        let ranks: Vec<usize> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(Severity::Error < Severity::Trace);
    }

    #[test]
    fn from_str_is_case_sensitive() {
        assert_eq!(Severity::from_str("WARN"), Some(Severity::Warn));
        assert_eq!(Severity::from_str("warn"), None);
        assert_eq!(Severity::from_str("DEBUG"), None);
    }

    #[test]
    fn parse_ignore_case() {
        assert_eq!(Severity::parse_ignore_case("trace"), Some(Severity::Trace));
        assert_eq!(Severity::parse_ignore_case("Info"), Some(Severity::Info));
        assert_eq!(Severity::parse_ignore_case("fatal"), None);
    }

    #[test]
    fn threshold_comparison() {
        assert!(Severity::Trace.is_less_severe_than(Severity::Info));
        assert!(!Severity::Info.is_less_severe_than(Severity::Info));
        assert!(!Severity::Error.is_less_severe_than(Severity::Warn));
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(format!("{}", Severity::Trace), "TRACE");
    }
}
