//! Line input and text output capabilities.
//!
//! Input and output are kept apart: a [`LineProcessor`] consumes raw lines
//! tagged with the file they came from, and a [`Sink`] receives rendered text
//! one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

/// Receives rendered output, one line per call.
pub trait Sink {
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

/// Collects lines in memory.
impl Sink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line plus a newline to any [`Write`].
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}

/// Consumes raw input lines.
///
/// `source` names the file the line was read from. Implementations handle
/// their own per-line failures; nothing a single line does stops a run.
pub trait LineProcessor {
    fn process(&mut self, line: &str, source: &str);
}

/// Feed every line of `reader` to `processor`, returning the number of lines.
///
/// A line ends at `\n`, `\r\n`, or a bare `\r`; the terminator is stripped.
/// Invalid UTF-8 is replaced rather than rejected so that one corrupt line
/// does not end the file.
pub fn feed_reader<R, P>(mut reader: R, source: &str, processor: &mut P) -> io::Result<u64>
where
    R: BufRead,
    P: LineProcessor + ?Sized,
{
    let mut buf = Vec::new();
    let mut lines = 0u64;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // `buf` holds at most one `\n`, always last. Any `\r` before it
        // ends a line of its own, except the one completing a `\r\n`.
        let mut chunk = buf.as_slice();
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        }
        if let Some(rest) = chunk.strip_suffix(b"\r") {
            chunk = rest;
        }
        for part in chunk.split(|&b| b == b'\r') {
            let line = String::from_utf8_lossy(part);
            processor.process(&line, source);
            lines += 1;
        }
    }
    Ok(lines)
}

/// Open `path` and feed all of its lines to `processor`.
pub fn feed_file<P>(path: &Path, processor: &mut P) -> io::Result<u64>
where
    P: LineProcessor + ?Sized,
{
    let file = File::open(path)?;
    let source = path.to_string_lossy();
    let lines = feed_reader(BufReader::new(file), &source, processor)?;
    debug!(file = %source, lines, "Finished reading file");
    Ok(lines)
}
