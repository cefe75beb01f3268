use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::base::{OnContent, Provider};
use crate::errors::ProviderError;
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::stream::{StreamOutcome, StreamSession};

/// One scripted exchange: either a raw event-stream body, replayed through
/// the real decode path in the given chunking, or a failure.
pub enum MockExchange {
    Stream(Vec<Vec<u8>>),
    Fail(ProviderError),
}

impl MockExchange {
    /// A body delivered as a single chunk.
    pub fn body(body: &str) -> Self {
        MockExchange::Stream(vec![body.as_bytes().to_vec()])
    }
}

/// A provider that replays pre-scripted event-stream bodies, for testing the
/// orchestration loop against the real frame decoder and delta merger.
pub struct MockProvider {
    exchanges: Arc<Mutex<Vec<MockExchange>>>,
    requests_seen: Arc<Mutex<Vec<usize>>>,
}

// Clones share the script and the request log, so a test can keep a handle
// while the agent owns the provider.
impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            exchanges: Arc::clone(&self.exchanges),
            requests_seen: Arc::clone(&self.requests_seen),
        }
    }
}

impl MockProvider {
    pub fn new(exchanges: Vec<MockExchange>) -> Self {
        Self {
            exchanges: Arc::new(Mutex::new(exchanges)),
            requests_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Message counts of each request issued so far, in order.
    pub fn request_message_counts(&self) -> Vec<usize> {
        self.requests_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn stream_reply(
        &self,
        _model: &str,
        messages: &[Message],
        _tools: &[Tool],
        on_content: OnContent<'_>,
    ) -> Result<StreamOutcome, ProviderError> {
        self.requests_seen.lock().unwrap().push(messages.len());

        let next = {
            let mut exchanges = self.exchanges.lock().unwrap();
            if exchanges.is_empty() {
                None
            } else {
                Some(exchanges.remove(0))
            }
        };

        match next {
            // Out of script: behave like a model with nothing more to say.
            None => Ok(StreamSession::new().finish()),
            Some(MockExchange::Fail(error)) => Err(error),
            Some(MockExchange::Stream(chunks)) => {
                let mut session = StreamSession::new();
                for chunk in chunks {
                    if session.feed(&chunk, &mut *on_content)? {
                        break;
                    }
                }
                Ok(session.finish())
            }
        }
    }
}
