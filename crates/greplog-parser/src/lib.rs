//! # greplog-parser
//!
//! Text-level parsing for the greplog log cruncher.
//!
//! - **Event lines**: the `HH:MM:SS.mmm SEVERITY message` shape, plus the
//!   day-of-file resolution that turns a time of day into a full timestamp
//! - **Crunch configuration**: the marker-guarded, line-oriented pattern file
//! - **Suggestions**: regexes scraped from slf4j-style logging call-sites
//!
//! ## Quick Start
//!
//! ```rust
//! use greplog_parser::{EventLine, Severity, parse_config_str};
//!
//! let config = parse_config_str("greplogconfig\nloglevel = INFO\ndisk full on (\\S+)\n").unwrap();
//! assert_eq!(config.severity_threshold, Severity::Info);
//! assert_eq!(config.patterns.len(), 1);
//!
//! let line = EventLine::parse("01:02:03.456 ERROR disk full on /dev/sda").unwrap();
//! let event = line.resolve("2023-05-01").unwrap();
//! assert_eq!(event.severity, Severity::Error);
//! assert_eq!(event.message, "disk full on /dev/sda");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod severity;
pub mod suggest;

pub use config::{CrunchConfig, parse_config_file, parse_config_str};
pub use error::{ParserError, Result};
pub use event::{EventLine, LogEvent, compose_timestamp, day_from_filename};
pub use severity::Severity;
pub use suggest::{SUGGEST_HEADER, SourceScanner, Suggestion, render_block, scan_source};
