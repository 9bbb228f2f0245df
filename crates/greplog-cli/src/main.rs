use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use greplog_eval::{Aggregator, LineProcessor, Report, Sink, WriterSink, feed_file};
use greplog_parser::{
    CrunchConfig, ParserError, SUGGEST_HEADER, SourceScanner, Suggestion, parse_config_file,
    render_block,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "greplog")]
#[command(about = "Count log lines per regex pattern and suggest patterns from source code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify log lines against a pattern config and report counts and rates
    ///
    /// Lines of the form `HH:MM:SS.mmm SEVERITY message` are counted per
    /// severity and per first matching pattern. A `YYYY-MM-DD` date in a log
    /// file's name sets the day for its events; otherwise today is used.
    Crunch {
        /// Pattern config file (must contain a `greplogconfig` marker line)
        config: PathBuf,

        /// Log files, processed in order into one set of statistics
        logs: Vec<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long, requires = "json")]
        pretty: bool,
    },

    /// Suggest patterns from slf4j-style logging calls in source files
    Suggest {
        /// Source files to scan
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Crunch {
            config,
            logs,
            json,
            pretty,
        } => cmd_crunch(config, logs, json, pretty),
        Commands::Suggest { sources } => cmd_suggest(sources),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_crunch(config_path: PathBuf, log_paths: Vec<PathBuf>, json: bool, pretty: bool) {
    let config = load_config(&config_path);
    let mut out = WriterSink::new(io::stdout().lock());

    let mut notes = config.notes.clone();
    notes.push(format!("Config: {} patterns loaded.", config.patterns.len()));
    for note in &notes {
        if json {
            eprintln!("{note}");
        } else {
            emit_or_exit(&mut out, note);
        }
    }

    let mut aggregator = match Aggregator::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error compiling patterns from {}: {e}", config_path.display());
            process::exit(1);
        }
    };

    for path in &log_paths {
        if let Err(e) = feed_file(path, &mut aggregator) {
            warn!(file = %path.display(), error = %e, "Skipping unreadable log file");
        }
    }

    let report = Report::from_aggregator(&aggregator);
    if json {
        print_json(&report, pretty);
    } else if let Err(e) = report.render(&mut out) {
        exit_on_write_error(e);
    }
    if let Err(e) = out.flush() {
        exit_on_write_error(e);
    }
}

fn cmd_suggest(source_paths: Vec<PathBuf>) {
    let mut out = WriterSink::new(io::stdout().lock());
    for line in SUGGEST_HEADER {
        emit_or_exit(&mut out, line);
    }

    for path in &source_paths {
        let mut collector = SuggestionCollector::default();
        if let Err(e) = feed_file(path, &mut collector) {
            warn!(file = %path.display(), error = %e, "Skipping unreadable source file");
            continue;
        }
        for line in render_block(&path.display().to_string(), &collector.suggestions) {
            emit_or_exit(&mut out, &line);
        }
    }
    if let Err(e) = out.flush() {
        exit_on_write_error(e);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Runs a fresh scanner over one source file.
#[derive(Default)]
struct SuggestionCollector {
    scanner: SourceScanner,
    suggestions: Vec<Suggestion>,
}

impl LineProcessor for SuggestionCollector {
    fn process(&mut self, line: &str, _source: &str) {
        self.suggestions.extend(self.scanner.scan_line(line));
    }
}

fn load_config(path: &Path) -> CrunchConfig {
    match parse_config_file(path) {
        Ok(c) => c,
        Err(ParserError::MissingMarker) => {
            eprintln!(
                "Config {} does not contain the \"greplogconfig\" marker line; refusing to use it.",
                path.display()
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading config {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn emit_or_exit<W: Write>(out: &mut WriterSink<W>, line: &str) {
    if let Err(e) = out.emit(line) {
        exit_on_write_error(e);
    }
}

fn exit_on_write_error(e: io::Error) -> ! {
    // A closed pipe (e.g. `| head`) is a normal way to stop reading.
    if e.kind() == io::ErrorKind::BrokenPipe {
        process::exit(0);
    }
    eprintln!("Error writing output: {e}");
    process::exit(1);
}

fn print_json(value: &impl serde::Serialize, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(j) => println!("{j}"),
        Err(e) => {
            eprintln!("JSON serialization error: {e}");
            process::exit(1);
        }
    }
}
