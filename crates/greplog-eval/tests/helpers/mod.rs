#![allow(dead_code)]

use chrono::NaiveDate;
use greplog_eval::{Aggregator, Metric, PatternSet, feed_reader};
use greplog_parser::{Severity, parse_config_str};

pub fn fixed_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
}

pub fn aggregator(patterns: &[&str], threshold: Severity, nonmatch: bool) -> Aggregator {
    Aggregator::new(PatternSet::compile(patterns).unwrap(), threshold, nonmatch)
        .with_default_day(fixed_day())
}

pub fn aggregator_from_config(config: &str) -> Aggregator {
    let config = parse_config_str(config).unwrap();
    Aggregator::from_config(&config)
        .unwrap()
        .with_default_day(fixed_day())
}

pub fn feed(aggregator: &mut Aggregator, source: &str, log: &str) -> u64 {
    feed_reader(log.as_bytes(), source, aggregator).unwrap()
}

pub fn count(aggregator: &Aggregator, label: &str) -> u64 {
    aggregator.metric(label).map_or(0, Metric::count)
}
