//! End-of-run listings of the metric table.
//!
//! Two orderings are produced: by descending count (ties broken by label),
//! and alphabetically by label. Both render each entry as
//! `"<metric> = <label>"`.

use std::io;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregator::{Aggregator, MetricTable};
use crate::io::Sink;
use crate::metric::{Metric, Rates};

/// Width of the `=` banner framing each section title.
pub const BANNER_WIDTH: usize = 45;

pub const FREQUENCY_TITLE: &str = "BY FREQUENCY";
pub const ALPHABETIC_TITLE: &str = "ALPHABETIC";

/// One row of a report.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSummary {
    pub label: String,
    pub count: u64,
    pub first_seen: Option<NaiveDateTime>,
    pub last_seen: Option<NaiveDateTime>,
    pub rates: Option<Rates>,
    /// The metric's text rendering.
    pub rendered: String,
}

impl MetricSummary {
    fn new(label: &str, metric: &Metric) -> Self {
        MetricSummary {
            label: label.to_string(),
            count: metric.count(),
            first_seen: metric.first_seen(),
            last_seen: metric.last_seen(),
            rates: metric.rates(),
            rendered: metric.render(),
        }
    }

    /// `"<metric> = <label>"`.
    pub fn line(&self) -> String {
        format!("{} = {}", self.rendered, self.label)
    }
}

/// Both sorted views of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub line_count: u64,
    pub by_frequency: Vec<MetricSummary>,
    pub alphabetic: Vec<MetricSummary>,
}

impl Report {
    pub fn build(line_count: u64, table: &MetricTable) -> Self {
        Report {
            line_count,
            by_frequency: summarize(by_frequency(table)),
            alphabetic: summarize(alphabetic(table)),
        }
    }

    pub fn from_aggregator(aggregator: &Aggregator) -> Self {
        Self::build(aggregator.line_count(), aggregator.metrics())
    }

    /// Emit the text report: line count, then both framed sections.
    pub fn render<S: Sink + ?Sized>(&self, sink: &mut S) -> io::Result<()> {
        sink.emit(&format!("Line count: {}", self.line_count))?;
        render_section(sink, FREQUENCY_TITLE, &self.by_frequency)?;
        render_section(sink, ALPHABETIC_TITLE, &self.alphabetic)
    }

    /// The text report as a list of lines.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(&mut lines);
        lines
    }
}

fn render_section<S: Sink + ?Sized>(
    sink: &mut S,
    title: &str,
    rows: &[MetricSummary],
) -> io::Result<()> {
    let banner = "=".repeat(BANNER_WIDTH);
    sink.emit(&banner)?;
    sink.emit(&centered(title))?;
    sink.emit(&banner)?;
    for row in rows {
        sink.emit(&row.line())?;
    }
    Ok(())
}

fn summarize(entries: Vec<(&String, &Metric)>) -> Vec<MetricSummary> {
    entries
        .into_iter()
        .map(|(label, metric)| MetricSummary::new(label, metric))
        .collect()
}

/// Left-pad `title` so it sits in the middle of the banner.
fn centered(title: &str) -> String {
    let pad = BANNER_WIDTH.saturating_sub(title.len()) / 2;
    format!("{}{title}", " ".repeat(pad))
}

/// Entries by descending count; equal counts by ascending label.
pub fn by_frequency(table: &MetricTable) -> Vec<(&String, &Metric)> {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|(la, ma), (lb, mb)| mb.cmp(ma).then_with(|| la.cmp(lb)));
    entries
}

/// Entries by ascending label.
pub fn alphabetic(table: &MetricTable) -> Vec<(&String, &Metric)> {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|(la, _), (lb, _)| la.cmp(lb));
    entries
}
