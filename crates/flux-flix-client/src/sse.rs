//! Incremental server-sent events decoder.
//!
//! Bytes arrive in arbitrary chunks. [`SseDecoder`] buffers them, splits
//! complete lines (`\n` or `\r\n`) and emits one [`SseFrame`] per blank
//! line that follows at least one `data` field. Comment lines (leading
//! `:`) are skipped. A partial line stays buffered until its terminator
//! arrives, so multi-byte UTF-8 split across chunks decodes correctly.
//!
//! Bytes already searched for a terminator are not searched again, and a
//! partial line longer than [`MAX_LINE_BYTES`] is an error.

/// Longest line the decoder will buffer while waiting for its terminator.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Errors from [`SseDecoder::push`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SseError {
    /// A line grew past the limit without a terminator.
    #[error("event stream line exceeds {limit} bytes")]
    LineTooLong {
        /// The limit that was exceeded.
        limit: usize,
    },
}

/// One dispatched server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// The `event` field, if present.
    pub event: Option<String>,
    /// All `data` fields, joined with `\n`.
    pub data: String,
    /// The `id` field, if present.
    pub id: Option<String>,
}

/// Stateful decoder fed with raw response bytes.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` known to hold no `\n`.
    scanned: usize,
    max_line: usize,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty decoder that rejects lines longer than `max_line`.
    pub const fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            max_line,
            event: None,
            data: Vec::new(),
            id: None,
        }
    }

    /// Feed `chunk` and return every frame it completes, in order.
    ///
    /// # Errors
    ///
    /// [`SseError::LineTooLong`] when the unterminated tail of the buffer
    /// exceeds the line limit. The buffered bytes are discarded.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, SseError> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.next_line_end() {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.scanned = 0;
            let line = raw.strip_suffix(b"\n").unwrap_or(&raw);
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let line = String::from_utf8_lossy(line);

            if line.is_empty() {
                if let Some(frame) = self.dispatch() {
                    frames.push(frame);
                }
            } else {
                self.field(&line);
            }
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line {
            self.buffer.clear();
            self.scanned = 0;
            return Err(SseError::LineTooLong {
                limit: self.max_line,
            });
        }
        Ok(frames)
    }

    /// Index of the next `\n`, searching only bytes not yet scanned.
    fn next_line_end(&self) -> Option<usize> {
        self.buffer
            .get(self.scanned..)?
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| i.saturating_add(self.scanned))
    }

    fn field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }

        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);

        match name {
            "data" => self.data.push(value.to_owned()),
            "event" => self.event = Some(value.to_owned()),
            "id" => self.id = Some(value.to_owned()),
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let id = self.id.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame { event, data, id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn push(decoder: &mut SseDecoder, chunk: &[u8]) -> Vec<SseFrame> {
        decoder.push(chunk).unwrap()
    }

    #[test]
    fn decodes_single_frame() {
        let mut decoder = SseDecoder::new();
        let frames = push(&mut decoder, b"data: {\"a\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, "{\"a\":1}");
        assert_eq!(frames[0].event, None);
    }

    #[test]
    fn frame_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(push(&mut decoder, b"da").is_empty());
        assert!(push(&mut decoder, b"ta:hel").is_empty());
        assert!(push(&mut decoder, b"lo\n").is_empty());
        let frames = push(&mut decoder, b"\n");
        assert_eq!(frames[0].data, "hello");
    }

    #[test]
    fn utf8_split_inside_a_character() {
        let bytes = "data: Vélo\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        assert!(push(&mut decoder, &bytes[..8]).is_empty());
        let frames = push(&mut decoder, &bytes[8..]);
        assert_eq!(frames[0].data, "Vélo");
    }

    #[test]
    fn crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let frames = push(
            &mut decoder,
            b": keep-alive\r\n\r\nevent: tick\r\nid: 7\r\ndata: x\r\n\r\n",
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event.as_deref(), Some("tick"));
        assert_eq!(frames[0].id.as_deref(), Some("7"));
        assert_eq!(frames[0].data, "x");
    }

    #[test]
    fn multiple_data_lines_are_joined() {
        let mut decoder = SseDecoder::new();
        let frames = push(&mut decoder, b"data: one\ndata: two\n\ndata: three\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, "one\ntwo");
        assert_eq!(frames[1].data, "three");
    }

    #[test]
    fn blank_line_without_data_dispatches_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(push(&mut decoder, b"event: orphan\n\n").is_empty());
        let frames = push(&mut decoder, b"data: next\n\n");
        assert_eq!(frames[0].event, None);
    }

    #[test]
    fn long_line_trickled_in_small_chunks() {
        let payload = "x".repeat(10_000);
        let bytes = format!("data: {payload}\n\n").into_bytes();
        let mut decoder = SseDecoder::new();

        let mut frames = Vec::new();
        for chunk in bytes.chunks(7) {
            frames.extend(push(&mut decoder, chunk));
            assert!(decoder.scanned <= decoder.buffer.len());
        }

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, payload);
        assert!(decoder.buffer.is_empty());
    }

    #[test]
    fn unterminated_line_over_limit_is_an_error() {
        let mut decoder = SseDecoder::with_max_line(16);
        assert!(push(&mut decoder, b"data: 0123456789").is_empty());

        let err = decoder.push(b"abcdef").unwrap_err();
        assert_eq!(err, SseError::LineTooLong { limit: 16 });
        assert!(decoder.buffer.is_empty());

        let frames = push(&mut decoder, b"data: ok\n\n");
        assert_eq!(frames[0].data, "ok");
    }

    #[test]
    fn short_lines_decode_under_a_small_limit() {
        let mut decoder = SseDecoder::with_max_line(16);
        let frames = push(&mut decoder, b"data: a\n\ndata: b\n\ndata: c\n\n");
        assert_eq!(frames.len(), 3);
    }
}
