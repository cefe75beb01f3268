use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::stream::StreamOutcome;

/// Callback invoked with each content fragment as it is decoded, for live
/// display. Tool-call fragments are not surfaced here; they are reassembled
/// into the returned outcome.
pub type OnContent<'a> = &'a mut (dyn FnMut(&str) + Send);

/// A chat completion backend that streams its response.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one streamed completion request carrying the full turn history
    /// and the tool declarations, decode the response as it arrives, and
    /// return what it produced. Exactly one request is in flight at a time
    /// per conversation; the caller does not issue the next one until this
    /// returns.
    async fn stream_reply(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[Tool],
        on_content: OnContent<'_>,
    ) -> Result<StreamOutcome, ProviderError>;
}
