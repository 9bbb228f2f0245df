//! Crunch configuration file parser.
//!
//! The format is line oriented:
//!
//! ```text
//! # comments and blank lines are ignored
//! greplogconfig
//! loglevel = INFO
//! nonmatch = false
//! disk full on (\S+)
//! user (\w+) logged in
//! ```
//!
//! Every line that is not a comment, the marker, or a directive is a regex
//! pattern. Patterns keep their file order, which is their match priority.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParserError, Result};
use crate::severity::Severity;

static LOG_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*loglevel\s*=\s*(ERROR|WARN|INFO|TRACE)").expect("loglevel regex is valid")
});

static NON_MATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*nonmatch\s*=\s*(false|true)").expect("nonmatch regex is valid")
});

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)greplogconfig").expect("marker regex is valid"));

pub const DEFAULT_SEVERITY_THRESHOLD: Severity = Severity::Warn;
pub const DEFAULT_COUNT_NON_MATCHES: bool = true;

/// A parsed crunch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrunchConfig {
    /// Regex sources in priority order, verbatim from the file.
    pub patterns: Vec<String>,
    /// Events less severe than this skip pattern evaluation.
    pub severity_threshold: Severity,
    /// Count each distinct unmatched message under its own label.
    pub count_non_matches: bool,
    /// Human-readable notes about directives applied while loading.
    pub notes: Vec<String>,
}

impl Default for CrunchConfig {
    fn default() -> Self {
        CrunchConfig {
            patterns: Vec::new(),
            severity_threshold: DEFAULT_SEVERITY_THRESHOLD,
            count_non_matches: DEFAULT_COUNT_NON_MATCHES,
            notes: Vec::new(),
        }
    }
}

/// Parse a crunch configuration from a string.
///
/// Fails with [`ParserError::MissingMarker`] unless some line contains
/// `greplogconfig`, so that an arbitrary file is never mistaken for a config.
pub fn parse_config_str(input: &str) -> Result<CrunchConfig> {
    let mut config = CrunchConfig::default();
    let mut has_marker = false;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if MARKER.is_match(line) {
            has_marker = true;
        } else if let Some(caps) = LOG_LEVEL.captures(line) {
            let name = &caps[1];
            // The regex only admits the four names, in any case.
            if let Some(severity) = Severity::parse_ignore_case(name) {
                config.severity_threshold = severity;
                config.notes.push(format!("Config: loglevel set to {severity}"));
            }
        } else if let Some(caps) = NON_MATCH.captures(line) {
            let value = caps[1].eq_ignore_ascii_case("true");
            config.count_non_matches = value;
            config.notes.push(format!("Config: nonmatch set to {value}"));
        } else {
            config.patterns.push(line.to_string());
        }
    }

    if !has_marker {
        return Err(ParserError::MissingMarker);
    }
    Ok(config)
}

/// Read and parse a crunch configuration file.
pub fn parse_config_file(path: &Path) -> Result<CrunchConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}
