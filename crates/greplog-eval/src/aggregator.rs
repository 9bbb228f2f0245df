//! Per-line classification and metric accumulation.
//!
//! The `Aggregator` owns the metric table for a whole run. Statistics from
//! every file fed to it accumulate into the same table.

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate, NaiveDateTime};
use greplog_parser::event::DAY_FORMAT;
use greplog_parser::{CrunchConfig, EventLine, Severity, day_from_filename};
use tracing::warn;

use crate::error::Result;
use crate::io::LineProcessor;
use crate::metric::Metric;
use crate::pattern::PatternSet;

/// Label of the metric counting every event line.
pub const ITEMS_LABEL: &str = "items";

/// Label → metric mapping. Iteration order carries no meaning.
pub type MetricTable = HashMap<String, Metric>;

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not an event line; only the line count moved.
    Ignored,
    /// Counted under `items` and its severity, but less severe than the
    /// threshold so no pattern was tried.
    Filtered,
    /// A pattern matched.
    Matched,
    /// No pattern matched.
    Unmatched,
}

/// Classifies log lines and accumulates metrics under derived labels.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use greplog_eval::{Aggregator, LineOutcome, PatternSet};
/// use greplog_parser::Severity;
///
/// let patterns = PatternSet::compile([r"disk full on (\S+)"]).unwrap();
/// let mut agg = Aggregator::new(patterns, Severity::Warn, false)
///     .with_default_day(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
///
/// let outcome = agg.process_line("01:02:03.456 ERROR disk full on /dev/sda", "app.log").unwrap();
/// assert_eq!(outcome, LineOutcome::Matched);
/// assert_eq!(agg.metric("items").unwrap().count(), 1);
/// assert_eq!(agg.metric(r"ERROR disk full on (\S+)").unwrap().count(), 1);
/// ```
#[derive(Debug)]
pub struct Aggregator {
    patterns: PatternSet,
    severity_threshold: Severity,
    count_non_matches: bool,
    default_day: String,
    metrics: MetricTable,
    line_count: u64,
    out_of_order_sources: HashSet<String>,
}

impl Aggregator {
    /// Create an aggregator whose undated files resolve to today's date.
    pub fn new(patterns: PatternSet, severity_threshold: Severity, count_non_matches: bool) -> Self {
        Aggregator {
            patterns,
            severity_threshold,
            count_non_matches,
            default_day: format_day(Local::now().date_naive()),
            metrics: MetricTable::new(),
            line_count: 0,
            out_of_order_sources: HashSet::new(),
        }
    }

    /// Compile the patterns of a parsed configuration.
    pub fn from_config(config: &CrunchConfig) -> Result<Self> {
        let patterns = PatternSet::compile(&config.patterns)?;
        Ok(Self::new(
            patterns,
            config.severity_threshold,
            config.count_non_matches,
        ))
    }

    /// Day used for files whose name carries no `YYYY-MM-DD` date.
    pub fn with_default_day(mut self, day: NaiveDate) -> Self {
        self.default_day = format_day(day);
        self
    }

    /// Classify one line from `source` and tick the matching metrics.
    ///
    /// Lines without the event shape are counted and otherwise ignored. An
    /// error means the event's timestamp could not be composed; nothing but
    /// the line count was touched.
    pub fn process_line(&mut self, line: &str, source: &str) -> Result<LineOutcome> {
        self.line_count += 1;

        let Some(event_line) = EventLine::parse(line) else {
            return Ok(LineOutcome::Ignored);
        };
        let day = day_from_filename(source).unwrap_or(self.default_day.as_str());
        let event = event_line.resolve(day)?;
        let timestamp = event.timestamp;

        self.note_order(source, timestamp);
        self.tick(ITEMS_LABEL, timestamp);
        self.tick(event.severity.as_str(), timestamp);

        if event.severity.is_less_severe_than(self.severity_threshold) {
            return Ok(LineOutcome::Filtered);
        }

        let evaluation = self
            .patterns
            .evaluate(event.message, event.severity, self.count_non_matches);
        for label in &evaluation.labels {
            self.tick(label, timestamp);
        }

        Ok(if evaluation.matched {
            LineOutcome::Matched
        } else {
            LineOutcome::Unmatched
        })
    }

    fn tick(&mut self, label: &str, timestamp: NaiveDateTime) {
        if let Some(metric) = self.metrics.get_mut(label) {
            metric.tick(timestamp);
        } else {
            let mut metric = Metric::new();
            metric.tick(timestamp);
            self.metrics.insert(label.to_string(), metric);
        }
    }

    /// Warn once per source when its events go back in time.
    fn note_order(&mut self, source: &str, timestamp: NaiveDateTime) {
        let regressed = self
            .metrics
            .get(ITEMS_LABEL)
            .is_some_and(|items| items.is_regression(timestamp));
        if regressed && !self.out_of_order_sources.contains(source) {
            warn!(
                file = source,
                line = self.line_count,
                "Events are not in chronological order; rates for affected labels may be wrong"
            );
            self.out_of_order_sources.insert(source.to_string());
        }
    }

    /// Total lines fed, event-shaped or not.
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    pub fn metrics(&self) -> &MetricTable {
        &self.metrics
    }

    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.metrics.get(label)
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn severity_threshold(&self) -> Severity {
        self.severity_threshold
    }

    pub fn count_non_matches(&self) -> bool {
        self.count_non_matches
    }

    /// Consume the aggregator, keeping the line count and the metric table.
    pub fn into_parts(self) -> (u64, MetricTable) {
        (self.line_count, self.metrics)
    }
}

impl LineProcessor for Aggregator {
    fn process(&mut self, line: &str, source: &str) {
        if let Err(e) = self.process_line(line, source) {
            warn!(file = source, line = self.line_count, error = %e, "Skipping event line");
        }
    }
}

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
