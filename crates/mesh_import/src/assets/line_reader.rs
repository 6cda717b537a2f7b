//! Terminator-aware line reader
//!
//! Splits a byte stream on `\r`, `\n` and `\r\n`, treating `\r\n` as a single
//! boundary. Unlike [`BufRead::lines`] a lone `\r` also ends a line, which
//! covers files written with classic Mac line endings.

use std::io::{self, BufRead};

/// Line reader over any buffered byte source
pub struct LineReader<R> {
    inner: R,
    lines_read: usize,
    finished: bool,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lines_read: 0,
            finished: false,
        }
    }

    /// Number of lines returned so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Read the next line without its terminator
    ///
    /// Returns `Ok(None)` at end of stream, and keeps returning it on every
    /// later call. Bytes that are not valid UTF-8 are replaced.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.finished {
            return Ok(None);
        }

        let mut bytes = Vec::new();
        let mut saw_any = false;

        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if buf.is_empty() {
                self.finished = true;
                if !saw_any {
                    return Ok(None);
                }
                break;
            }
            saw_any = true;

            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let terminator = buf[pos];
                    bytes.extend_from_slice(&buf[..pos]);
                    self.inner.consume(pos + 1);
                    if terminator == b'\r' {
                        self.skip_lf_after_cr()?;
                    }
                    break;
                }
                None => {
                    let len = buf.len();
                    bytes.extend_from_slice(buf);
                    self.inner.consume(len);
                }
            }
        }

        self.lines_read += 1;
        Ok(Some(match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }))
    }

    /// Consume a `\n` directly following a `\r`, and nothing else
    fn skip_lf_after_cr(&mut self) -> io::Result<()> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => {
                    if buf.first() == Some(&b'\n') {
                        self.inner.consume(1);
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
