use memchr::memchr;

use crate::errors::StreamError;

/// Default ceiling on bytes retained between chunks (1 MiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Turns an arbitrarily-chunked byte stream into complete lines.
///
/// Bytes after the last terminator are carried forward to the next `feed`
/// call, so after every pass the buffer holds either nothing or exactly one
/// partial line. A partial line that outgrows the capacity ceiling is an
/// explicit `Overflow` error rather than a silent truncation.
#[derive(Debug)]
pub struct LineDecoder {
    buffer: Vec<u8>,
    capacity: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LineDecoder {
            buffer: Vec::new(),
            capacity,
        }
    }

    /// Append `bytes` and drain every complete line, in arrival order.
    ///
    /// Lines are split on `\n`; a trailing `\r` is stripped. A line that is
    /// not valid UTF-8 is skipped, in line with the policy that one bad frame
    /// never aborts a live stream.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<String>, StreamError> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            let mut line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            line.pop(); // the \n itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            match String::from_utf8(line) {
                Ok(text) => lines.push(text),
                Err(err) => {
                    tracing::debug!(%err, "skipping non-UTF-8 stream line");
                }
            }
        }

        if self.buffer.len() > self.capacity {
            return Err(StreamError::Overflow {
                size: self.buffer.len(),
                capacity: self.capacity,
            });
        }

        Ok(lines)
    }

    /// Bytes of the partial line currently carried forward.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Classification of one decoded line of the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine<'a> {
    /// A data event carrying a candidate payload document.
    Data(&'a str),
    /// The stream termination sentinel.
    Done,
    /// Blank keep-alives, comments and other fields.
    Ignored,
}

/// Classify one line. Both `data: {...}` and `data:{...}` spacings occur in
/// the wild and are accepted.
pub fn parse_line(line: &str) -> SseLine<'_> {
    match line.strip_prefix("data:").map(str::trim_start) {
        Some("[DONE]") => SseLine::Done,
        Some(payload) => SseLine::Data(payload),
        None => SseLine::Ignored,
    }
}
