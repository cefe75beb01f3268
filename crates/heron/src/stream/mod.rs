//! Incremental decoding of a streamed chat completion: raw bytes are framed
//! into lines, lines are classified as data events or noise, and data
//! payloads are merged into the answer text and at most one tool call.

mod decoder;
mod merge;

pub use decoder::{parse_line, LineDecoder, SseLine, DEFAULT_BUFFER_CAPACITY};
pub use merge::{
    ChatChunk, ChunkChoice, Delta, FunctionDelta, ResponseAccumulator, StreamOutcome,
    ToolCallDelta, ToolCallRecord,
};

use crate::errors::StreamError;

/// The per-request decode state: one line decoder plus one accumulator.
/// Created for each outbound request and dropped with it; nothing here is
/// shared across requests.
#[derive(Debug, Default)]
pub struct StreamSession {
    decoder: LineDecoder,
    accumulator: ResponseAccumulator,
    done: bool,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        StreamSession {
            decoder: LineDecoder::with_capacity(capacity),
            accumulator: ResponseAccumulator::new(),
            done: false,
        }
    }

    /// Push one received chunk through decode → classify → merge, invoking
    /// `on_content` for every content fragment as it is recognized. Returns
    /// true once the termination sentinel has been seen; later bytes are
    /// ignored.
    pub fn feed(
        &mut self,
        bytes: &[u8],
        on_content: &mut dyn FnMut(&str),
    ) -> Result<bool, StreamError> {
        for line in self.decoder.feed(bytes)? {
            if self.done {
                break;
            }
            match parse_line(&line) {
                SseLine::Done => self.done = true,
                SseLine::Data(payload) => match serde_json::from_str::<ChatChunk>(payload) {
                    Ok(chunk) => {
                        if let Some(fragment) = self.accumulator.apply(&chunk) {
                            on_content(&fragment);
                        }
                    }
                    // Tolerate noise: one bad frame never aborts a live stream.
                    Err(err) => tracing::debug!(%err, "skipping malformed stream payload"),
                },
                SseLine::Ignored => {}
            }
        }
        Ok(self.done)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn finish(self) -> StreamOutcome {
        self.accumulator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(session: &mut StreamSession, bytes: &[u8]) -> Vec<String> {
        let mut fragments = Vec::new();
        session
            .feed(bytes, &mut |fragment| fragments.push(fragment.to_string()))
            .unwrap();
        fragments
    }

    const TOOL_CALL_STREAM: &[u8] = b"data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"id\":\"1\",\"function\":{\"name\":\"list_dir\",\"arguments\":\"{\\\"di\"}}]}}]}\n\
data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"function\":{\"arguments\":\"rpath\\\":\\\".\\\"}\"}}]}}]}\n\
data: [DONE]\n";

    #[test]
    fn test_content_stream_end_to_end() {
        let mut session = StreamSession::new();
        let fragments = collect(
            &mut session,
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\
data: [DONE]\n",
        );
        assert_eq!(fragments, vec!["Hel", "lo"]);
        assert!(session.is_done());

        let outcome = session.finish();
        assert_eq!(outcome.text, "Hello");
        assert!(outcome.tool_call.is_none());
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let body: &[u8] = b"data: {\"choices\":[{\"delta\":{\"content\":\"one \"}}]}\n\
data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n\
data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"id\":\"9\",\"function\":{\"name\":\"bash\",\"arguments\":\"{\\\"command\\\":\\\"ls\\\"}\"}}]}}]}\n\
data: [DONE]\n";

        let mut whole = StreamSession::new();
        let whole_fragments = collect(&mut whole, body);

        let mut split = StreamSession::new();
        let mut split_fragments = Vec::new();
        for byte in body {
            split
                .feed(&[*byte], &mut |fragment| {
                    split_fragments.push(fragment.to_string())
                })
                .unwrap();
        }

        assert_eq!(whole_fragments, split_fragments);
        assert_eq!(whole.finish(), split.finish());
    }

    #[test]
    fn test_noise_tolerance() {
        let mut session = StreamSession::new();
        let fragments = collect(
            &mut session,
            b"data: {\"choices\":[{\"delta\":{\"content\":\"first\"}}]}\n\
data: {this is not json\n\
data: {\"choices\":[{\"delta\":{\"content\":\"second\"}}]}\n\
data: [DONE]\n",
        );
        assert_eq!(fragments, vec!["first", "second"]);
        assert_eq!(session.finish().text, "firstsecond");
    }

    #[test]
    fn test_tool_call_stream() {
        let mut session = StreamSession::new();
        let fragments = collect(&mut session, TOOL_CALL_STREAM);
        assert!(fragments.is_empty());

        let outcome = session.finish();
        let request = outcome.tool_call.expect("tool call");
        assert_eq!(request.id, "1");
        assert_eq!(request.name, "list_dir");
        assert_eq!(request.arguments, r#"{"dirpath":"."}"#);
    }

    #[test]
    fn test_bytes_after_done_ignored() {
        let mut session = StreamSession::new();
        collect(&mut session, b"data: [DONE]\n");
        let fragments = collect(
            &mut session,
            b"data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n",
        );
        assert!(fragments.is_empty());
        assert_eq!(session.finish().text, "");
    }

    #[test]
    fn test_keep_alives_between_events() {
        let mut session = StreamSession::new();
        let fragments = collect(
            &mut session,
            b": ping\n\
\n\
data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\
\n\
data: [DONE]\n",
        );
        assert_eq!(fragments, vec!["ok"]);
    }
}
