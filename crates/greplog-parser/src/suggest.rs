//! Regex suggestions scraped from logging call-sites in source files.
//!
//! A scanner first waits for a logger declaration of the form
//! `private static final Logger log = LoggerFactory.getLogger(Foo.class);`,
//! then turns every `log.info("text {} more")` call that follows into a
//! pattern with each `{}` placeholder replaced by a capture group.
//!
//! This is a line-level heuristic. Multi-line calls and string concatenation
//! are not understood.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static LOGGER_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" Logger (\w+).*LoggerFactory\.getLogger\((\w+)\.class\)")
        .expect("logger declaration regex is valid")
});

/// Placeholder used by slf4j-style message templates.
const PLACEHOLDER: &str = "{}";

/// Header emitted once at the start of a `suggest` run.
pub const SUGGEST_HEADER: [&str; 2] = [
    "# Automatically generated regex suggestions. Keep AFTER manually maintained regexes, or delete.",
    "# WARNING - these are extracted heuristically!",
];

/// A pattern suggested from one logging statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Class named in the logger declaration.
    pub logger_class: String,
    /// Regex source matching the logged message.
    pub regex: String,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.logger_class, self.regex)
    }
}

#[derive(Debug)]
struct Logger {
    class: String,
    statement: Regex,
}

/// Line-by-line scanner for a single source file.
#[derive(Debug, Default)]
pub struct SourceScanner {
    logger: Option<Logger>,
}

impl SourceScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The class of the detected logger, once a declaration has been seen.
    pub fn logger_class(&self) -> Option<&str> {
        self.logger.as_ref().map(|l| l.class.as_str())
    }

    /// Feed one line; returns a suggestion when the line is a logging call.
    pub fn scan_line(&mut self, line: &str) -> Option<Suggestion> {
        let Some(logger) = &self.logger else {
            self.logger = detect_logger(line);
            return None;
        };

        let caps = logger.statement.captures(line)?;
        let text = caps.get(2)?.as_str();
        Some(Suggestion {
            logger_class: logger.class.clone(),
            regex: template_to_regex(text),
        })
    }
}

fn detect_logger(line: &str) -> Option<Logger> {
    let caps = LOGGER_DECLARATION.captures(line)?;
    let variable = caps.get(1)?.as_str();
    let class = caps.get(2)?.as_str();
    // `\w+` captures contain no regex metacharacters.
    let statement = Regex::new(&format!(
        r#"{variable}\.(error|warn|info|trace)\("(.*)""#
    ))
    .ok()?;
    Some(Logger {
        class: class.to_string(),
        statement,
    })
}

/// Escape a message template and turn each `{}` into a `(.*)` group.
pub fn template_to_regex(template: &str) -> String {
    template
        .split(PLACEHOLDER)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("(.*)")
}

/// Scan a whole source text.
pub fn scan_source<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Suggestion> {
    let mut scanner = SourceScanner::new();
    lines
        .into_iter()
        .filter_map(|line| scanner.scan_line(line))
        .collect()
}

/// Render one file's suggestions under a `# <filename>` banner.
///
/// Returns no lines when `suggestions` is empty.
pub fn render_block(filename: &str, suggestions: &[Suggestion]) -> Vec<String> {
    if suggestions.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(suggestions.len() + 3);
    out.push("#".to_string());
    out.push(format!("# {filename}"));
    out.push("#".to_string());
    out.extend(suggestions.iter().map(ToString::to_string));
    out
}
