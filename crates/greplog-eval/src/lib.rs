//! # greplog-eval
//!
//! Pattern matching and metric aggregation for the greplog log cruncher.
//!
//! Each input line is classified by its timestamp, severity, and the first
//! configured regex that matches its message. Metrics are ticked under
//! labels derived from those, and a report lists them by frequency and
//! alphabetically at the end of the run.
//!
//! ## Architecture
//!
//! - **[`Metric`]**: count plus first/last timestamps; renders capped rates.
//! - **[`PatternSet`]**: ordered, first-match-wins regex evaluation producing
//!   a base label and, when the pattern captures, a per-value label.
//! - **[`Aggregator`]**: the per-line handler owning the run's metric table.
//! - **[`Report`]**: the two sorted listings, as text or as serializable rows.
//!
//! ## Quick Start
//!
//! ```rust
//! use greplog_eval::{Aggregator, Report, feed_reader};
//! use greplog_parser::parse_config_str;
//!
//! let config = parse_config_str("greplogconfig\nnonmatch = false\ndisk full on (\\S+)\n").unwrap();
//! let mut aggregator = Aggregator::from_config(&config).unwrap();
//!
//! let log = "01:02:03.456 ERROR disk full on /dev/sda\n\
//!            01:02:04.000 ERROR disk full on /dev/sdb\n";
//! feed_reader(log.as_bytes(), "app-2023-05-01.log", &mut aggregator).unwrap();
//!
//! assert_eq!(aggregator.metric("items").unwrap().count(), 2);
//! assert_eq!(aggregator.metric(r"ERROR disk full on (\S+)").unwrap().count(), 2);
//!
//! let report = Report::from_aggregator(&aggregator);
//! assert_eq!(report.by_frequency[0].count, 2);
//! ```

pub mod aggregator;
pub mod error;
pub mod io;
pub mod metric;
pub mod pattern;
pub mod report;

// Re-export the most commonly used types and functions at crate root
pub use aggregator::{Aggregator, ITEMS_LABEL, LineOutcome, MetricTable};
pub use error::{EvalError, Result};
pub use io::{LineProcessor, Sink, WriterSink, feed_file, feed_reader};
pub use metric::{Metric, Rates};
pub use pattern::{CompiledPattern, Evaluation, PatternSet, base_label, nomatch_label, qualified_label};
pub use report::{MetricSummary, Report};
