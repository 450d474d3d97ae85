//! Line-level input and output
//!
//! The parser only ever looks at the current line: there is no lookahead and
//! no seeking backwards. Sources report 1-based line numbers so that errors can
//! point at the opening line of a broken container.

use std::io::{self, BufRead, Write};

/// Sequential cursor over input lines.
pub trait LineSource {
    /// The current line without its line terminator. Empty once finished.
    fn current_line(&self) -> &str;

    /// Advance to the following line.
    fn next_line(&mut self);

    /// Whether every line has been consumed.
    fn finished(&self) -> bool;

    /// 1-based number of the current line.
    fn line_number(&self) -> usize;

    /// Release the underlying input.
    fn close(&mut self) {}

    /// The read error that ended the input early, if any.
    fn take_error(&mut self) -> Option<io::Error> {
        None
    }
}

/// In-memory line source, mostly for tests and string conversion.
#[derive(Debug, Clone)]
pub struct StringLines {
    lines: Vec<String>,
    index: usize,
}

impl StringLines {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            index: 0,
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            index: 0,
        }
    }
}

impl LineSource for StringLines {
    fn current_line(&self) -> &str {
        self.lines.get(self.index).map(String::as_str).unwrap_or("")
    }

    fn next_line(&mut self) {
        if self.index < self.lines.len() {
            self.index += 1;
        }
    }

    fn finished(&self) -> bool {
        self.index >= self.lines.len()
    }

    fn line_number(&self) -> usize {
        self.index + 1
    }
}

/// Line source over any buffered reader.
///
/// The current line is read when the previous one is consumed. A read error
/// ends the input; it is kept and surfaced through
/// [`LineSource::take_error`] so the parser itself never sees I/O errors.
pub struct LineReader<R: BufRead> {
    reader: Option<R>,
    current: String,
    number: usize,
    finished: bool,
    error: Option<io::Error>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        let mut source = Self {
            reader: Some(reader),
            current: String::new(),
            number: 0,
            finished: false,
            error: None,
        };
        source.read();
        source
    }

    fn read(&mut self) {
        self.current.clear();
        let Some(reader) = self.reader.as_mut() else {
            self.finished = true;
            return;
        };
        match reader.read_line(&mut self.current) {
            Ok(0) => self.finished = true,
            Ok(_) => {
                self.number += 1;
                let trimmed = self.current.trim_end_matches(['\n', '\r']).len();
                self.current.truncate(trimmed);
            }
            Err(err) => {
                self.error = Some(err);
                self.finished = true;
                self.current.clear();
            }
        }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn current_line(&self) -> &str {
        &self.current
    }

    fn next_line(&mut self) {
        if !self.finished {
            self.read();
        }
    }

    fn finished(&self) -> bool {
        self.finished
    }

    fn line_number(&self) -> usize {
        if self.finished {
            self.number + 1
        } else {
            self.number
        }
    }

    fn close(&mut self) {
        self.reader = None;
        self.finished = true;
        self.current.clear();
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

/// Writes output text line by line.
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    /// Write a block of text, one line per output line.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            self.write_line(line)?;
        }
        Ok(())
    }

    pub fn close(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn string_lines_walks_every_line() {
        let mut source = StringLines::new("one\ntwo\n");
        assert_eq!(source.current_line(), "one");
        assert_eq!(source.line_number(), 1);
        source.next_line();
        assert_eq!(source.current_line(), "two");
        source.next_line();
        assert!(source.finished());
        assert_eq!(source.current_line(), "");
        source.next_line();
        assert!(source.finished());
    }

    #[test]
    fn reader_strips_line_terminators() {
        let mut source = LineReader::new(Cursor::new("a\r\nb\n\nc"));
        let mut seen = Vec::new();
        while !source.finished() {
            seen.push((source.line_number(), source.current_line().to_string()));
            source.next_line();
        }
        assert_eq!(
            seen,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, String::new()),
                (4, "c".to_string())
            ]
        );
        assert!(source.take_error().is_none());
    }

    struct Failing;

    impl io::Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn read_errors_end_input() {
        let mut source = LineReader::new(io::BufReader::new(Failing));
        assert!(source.finished());
        assert_eq!(source.take_error().unwrap().to_string(), "disk on fire");
        assert!(source.take_error().is_none());
    }

    #[test]
    fn closed_reader_is_finished() {
        let mut source = LineReader::new(Cursor::new("a\nb\n"));
        source.close();
        assert!(source.finished());
        assert_eq!(source.current_line(), "");
    }

    #[test]
    fn writer_appends_newlines() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write_line("<p>").unwrap();
        writer.write_text("a\nb").unwrap();
        let bytes = writer.close().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "<p>\na\nb\n");
    }
}
