//! Per-label occurrence counter with first/last timestamps and rates.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Format used for the first/last timestamps in rendered metrics.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Occurrence count for one label, plus the span over which it was seen.
///
/// Ticks are expected in non-decreasing timestamp order. Out-of-order ticks
/// are accepted and counted in [`Metric::regressions`]; `first_seen` is never
/// reordered, so such a stream can produce a zero or negative interval.
///
/// Metrics compare by `count` only.
#[derive(Debug, Clone, Default)]
pub struct Metric {
    count: u64,
    first_seen: Option<NaiveDateTime>,
    last_seen: Option<NaiveDateTime>,
    regressions: u64,
}

/// Extrapolated rates, each capped at the observed count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    pub per_millisecond: f64,
    pub per_second: f64,
    pub per_minute: f64,
    pub per_hour: f64,
    pub per_day: f64,
}

impl Metric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence at `timestamp`.
    pub fn tick(&mut self, timestamp: NaiveDateTime) {
        if self.is_regression(timestamp) {
            self.regressions += 1;
        }
        if self.first_seen.is_none() {
            self.first_seen = Some(timestamp);
        }
        self.last_seen = Some(timestamp);
        self.count += 1;
    }

    /// True if ticking `timestamp` now would move `last_seen` backwards.
    pub fn is_regression(&self, timestamp: NaiveDateTime) -> bool {
        self.last_seen.is_some_and(|last| timestamp < last)
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn first_seen(&self) -> Option<NaiveDateTime> {
        self.first_seen
    }

    pub fn last_seen(&self) -> Option<NaiveDateTime> {
        self.last_seen
    }

    /// Number of ticks that arrived earlier than the tick before them.
    pub fn regressions(&self) -> u64 {
        self.regressions
    }

    /// `last_seen - first_seen` in milliseconds; 0 before the first tick.
    pub fn elapsed_millis(&self) -> i64 {
        match (self.first_seen, self.last_seen) {
            (Some(first), Some(last)) => (last - first).num_milliseconds(),
            _ => 0,
        }
    }

    /// Rates over the observed interval, or `None` when the interval is zero.
    pub fn rates(&self) -> Option<Rates> {
        let elapsed = self.elapsed_millis();
        if elapsed == 0 {
            return None;
        }
        let count = self.count as f64;
        let per_ms = count / elapsed as f64;
        Some(Rates {
            per_millisecond: capped(per_ms, 1.0, count),
            per_second: capped(per_ms, MS_PER_SECOND, count),
            per_minute: capped(per_ms, MS_PER_MINUTE, count),
            per_hour: capped(per_ms, MS_PER_HOUR, count),
            per_day: capped(per_ms, MS_PER_DAY, count),
        })
    }

    /// Render as the bare count, or the count with rates and time span.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

/// Scale a per-millisecond rate to `unit_ms`, never exceeding `count`.
fn capped(per_ms: f64, unit_ms: f64, count: f64) -> f64 {
    let rate = per_ms * unit_ms;
    if rate <= count { rate } else { count }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(rates), Some(first), Some(last)) = (self.rates(), self.first_seen, self.last_seen)
        else {
            return write!(f, "{}", self.count);
        };
        write!(
            f,
            "{} ({:.2}/ms {:.2}/s {:.2}/min {:.2}/hr {:.2}/day from {} to {})",
            self.count,
            rates.per_millisecond,
            rates.per_second,
            rates.per_minute,
            rates.per_hour,
            rates.per_day,
            first.format(TIMESTAMP_FORMAT),
            last.format(TIMESTAMP_FORMAT),
        )
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
    }
}

impl Eq for Metric {}

impl PartialOrd for Metric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Metric {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count.cmp(&other.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn single_tick_renders_count_only() {
        let mut m = Metric::new();
        m.tick(at(10, 0, 0, 0));
        assert_eq!(m.count(), 1);
        assert_eq!(m.render(), "1");
        assert!(m.rates().is_none());
    }

    #[test]
    fn same_timestamp_renders_count_only() {
        let mut m = Metric::new();
        m.tick(at(10, 0, 0, 0));
        m.tick(at(10, 0, 0, 0));
        assert_eq!(m.render(), "2");
    }

    #[test]
    fn untouched_metric_renders_zero() {
        assert_eq!(Metric::new().render(), "0");
    }

    #[test]
    fn first_and_last_seen() {
        let mut m = Metric::new();
        m.tick(at(10, 0, 0, 0));
        m.tick(at(10, 0, 1, 0));
        m.tick(at(10, 0, 2, 500));
        assert_eq!(m.first_seen(), Some(at(10, 0, 0, 0)));
        assert_eq!(m.last_seen(), Some(at(10, 0, 2, 500)));
        assert_eq!(m.elapsed_millis(), 2_500);
    }

    #[test]
    fn render_with_rates() {
        let mut m = Metric::new();
        m.tick(at(1, 2, 3, 456));
        m.tick(at(1, 2, 4, 0));
        // 2 events over 544ms: 0.0037/ms, every coarser unit is capped at 2.
        assert_eq!(
            m.render(),
            "2 (0.00/ms 2.00/s 2.00/min 2.00/hr 2.00/day \
             from 2023-05-01 01:02:03.456 to 2023-05-01 01:02:04.000)"
        );
    }

    #[test]
    fn rates_below_cap_are_not_clamped() {
        let mut m = Metric::new();
        for i in 0..10 {
            m.tick(at(0, i, 0, 0));
        }
        // 10 events over 9 minutes.
        let rates = m.rates().unwrap();
        let per_ms = 10.0 / 540_000.0;
        assert!((rates.per_millisecond - per_ms).abs() < 1e-12);
        assert!((rates.per_second - per_ms * 1_000.0).abs() < 1e-9);
        assert!((rates.per_minute - per_ms * 60_000.0).abs() < 1e-9);
        assert!((rates.per_hour - 10.0).abs() < f64::EPSILON);
        assert!((rates.per_day - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_order_tick_is_counted_not_reordered() {
        let mut m = Metric::new();
        m.tick(at(10, 0, 5, 0));
        assert!(m.is_regression(at(10, 0, 0, 0)));
        m.tick(at(10, 0, 0, 0));
        assert_eq!(m.regressions(), 1);
        assert_eq!(m.first_seen(), Some(at(10, 0, 5, 0)));
        assert_eq!(m.last_seen(), Some(at(10, 0, 0, 0)));
        assert_eq!(m.elapsed_millis(), -5_000);
        // Negative rate is below the cap and rendered as-is.
        let rates = m.rates().unwrap();
        assert!(rates.per_second < 0.0);
    }

    #[test]
    fn compares_by_count_only() {
        let mut a = Metric::new();
        a.tick(at(10, 0, 0, 0));
        a.tick(at(11, 0, 0, 0));
        let mut b = Metric::new();
        b.tick(at(9, 0, 0, 0));
        b.tick(at(9, 0, 0, 0));
        let mut c = Metric::new();
        c.tick(at(9, 0, 0, 0));
        assert_eq!(a, b);
        assert!(c < a);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }
}
