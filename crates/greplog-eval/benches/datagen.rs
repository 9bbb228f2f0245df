//! Synthetic log lines and pattern lists for greplog-eval benchmarks.
//!
//! All generators are seeded for reproducibility.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed for reproducible benchmarks.
const SEED: u64 = 0x6EE9_1060;

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

const SEVERITIES: &[&str] = &["ERROR", "WARN", "INFO", "TRACE"];

const TEMPLATES: &[&str] = &[
    "disk full on /dev/sd{}",
    "user u{} logged in",
    "user u{} logged out",
    "connection to 10.0.0.{} timed out",
    "request {} completed",
    "cache miss for key k{}",
    "retrying job {} after failure",
    "unexpected message {}",
];

/// `n` patterns: the real ones first, padded with patterns that never match.
pub fn gen_patterns(n: usize) -> Vec<String> {
    let mut patterns = vec![
        r"disk full on (\S+)".to_string(),
        r"user (\w+) logged (in|out)".to_string(),
        r"connection to ([\d.]+) timed out".to_string(),
        r"request \d+ completed".to_string(),
        r"cache miss".to_string(),
    ];
    let mut i = 0;
    while patterns.len() < n {
        patterns.push(format!("never-matching-{i} (\\d+)"));
        i += 1;
    }
    patterns.truncate(n);
    patterns
}

/// `n` event lines in chronological order, with some non-event noise.
pub fn gen_log(n: usize) -> String {
    let mut rng = rng();
    let mut out = String::with_capacity(n * 48);
    let mut ms: u64 = 0;
    for _ in 0..n {
        ms += rng.random_range(0..500u64);
        if rng.random_range(0..20) == 0 {
            out.push_str("\tat com.example.Worker.run(Worker.java:42)\n");
            continue;
        }
        let severity = SEVERITIES[rng.random_range(0..SEVERITIES.len())];
        let template = TEMPLATES[rng.random_range(0..TEMPLATES.len())];
        let message = template.replace("{}", &rng.random_range(0..64u32).to_string());
        let total = ms % 86_400_000;
        out.push_str(&format!(
            "{:02}:{:02}:{:02}.{:03} {severity} {message}\n",
            total / 3_600_000,
            total / 60_000 % 60,
            total / 1_000 % 60,
            total % 1_000,
        ));
    }
    out
}
