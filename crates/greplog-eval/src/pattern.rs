//! Ordered, first-match-wins pattern evaluation.
//!
//! Each configured pattern is compiled once. For every message the patterns
//! are tried in configured order with unanchored search; the first hit
//! decides the labels and no later pattern is consulted.

use greplog_parser::Severity;
use regex::Regex;

use crate::error::{EvalError, Result};

/// Separator between a base label and its captured values.
pub const GROUP_SEPARATOR: &str = " ==> ";

/// Prefix of labels counting messages that matched no pattern.
pub const NOMATCH_PREFIX: &str = "nomatch :: ";

/// A compiled pattern along with the source text used in its labels.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(source).map_err(|e| EvalError::InvalidRegex {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(CompiledPattern {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of capture groups, not counting the implicit whole match.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

/// The labels produced by evaluating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether any pattern matched.
    pub matched: bool,
    /// Labels to tick, in order. Empty for an uncounted non-match.
    pub labels: Vec<String>,
}

/// An ordered list of compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile `sources` in order. The first invalid regex aborts the build.
    pub fn compile<I, S>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = sources
            .into_iter()
            .map(|s| CompiledPattern::new(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(PatternSet { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Evaluate `message` logged at `severity`.
    ///
    /// On the first matching pattern the base label `"<SEVERITY> <pattern>"`
    /// is produced, followed by a group-qualified label when the pattern has
    /// capture groups. When nothing matches and `count_non_matches` is set, a
    /// single `"nomatch :: <SEVERITY> <message>"` label is produced.
    pub fn evaluate(&self, message: &str, severity: Severity, count_non_matches: bool) -> Evaluation {
        for pattern in &self.patterns {
            let Some(caps) = pattern.regex.captures(message) else {
                continue;
            };

            let base = base_label(severity, pattern.source());
            let qualified = (pattern.group_count() > 0).then(|| {
                let groups = caps.iter().skip(1).map(|g| g.map(|m| m.as_str()));
                qualified_label(&base, groups)
            });
            let mut labels = vec![base];
            labels.extend(qualified);
            return Evaluation {
                matched: true,
                labels,
            };
        }

        let labels = if count_non_matches {
            vec![nomatch_label(severity, message)]
        } else {
            Vec::new()
        };
        Evaluation {
            matched: false,
            labels,
        }
    }
}

/// `"<SEVERITY> <pattern source>"`.
pub fn base_label(severity: Severity, source: &str) -> String {
    format!("{severity} {source}")
}

/// Append each captured value as `" (( value )) "` after `" ==> "`.
///
/// Groups that did not participate in the match render as an empty value.
pub fn qualified_label<'a>(base: &str, groups: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut label = String::with_capacity(base.len() + 32);
    label.push_str(base);
    label.push_str(GROUP_SEPARATOR);
    for group in groups {
        label.push_str(" (( ");
        label.push_str(group.unwrap_or_default());
        label.push_str(" )) ");
    }
    label
}

/// `"nomatch :: <SEVERITY> <message>"`.
pub fn nomatch_label(severity: Severity, message: &str) -> String {
    format!("{NOMATCH_PREFIX}{severity} {message}")
}
