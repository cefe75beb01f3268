use serde::Deserialize;

use crate::models::message::ToolRequest;

/// One parsed payload document from a data event. Only the fields the merger
/// reads are modeled; unknown fields are ignored by serde.
#[derive(Debug, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

/// The single tool call being reassembled from fragments. The protocol sends
/// no "arguments complete" signal; the record is only considered complete
/// once the surrounding stream has ended.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ToolCallRecord {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

impl ToolCallRecord {
    /// Merge one fragment: id and name are first-write-wins, arguments are
    /// strictly appended.
    fn merge(&mut self, delta: &ToolCallDelta) {
        if self.id.is_none() {
            if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
                self.id = Some(id.to_string());
            }
        }
        if let Some(function) = &delta.function {
            if self.name.is_none() {
                if let Some(name) = function.name.as_deref().filter(|name| !name.is_empty()) {
                    self.name = Some(name.to_string());
                }
            }
            if let Some(arguments) = &function.arguments {
                self.arguments.push_str(arguments);
            }
        }
    }

    pub fn call_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn function_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// A record is dispatchable only with a function name and a non-empty
    /// argument document.
    fn into_request(self) -> Option<ToolRequest> {
        match self.name {
            Some(name) if !self.arguments.is_empty() => Some(ToolRequest {
                id: self.id.unwrap_or_default(),
                name,
                arguments: self.arguments,
            }),
            _ => None,
        }
    }
}

/// Accumulates the deltas of one streamed response: content fragments into
/// the final answer text, tool-call fragments into a single `ToolCallRecord`.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    text: String,
    tool_call: Option<ToolCallRecord>,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one payload document. Returns the content fragment, if any, so
    /// the caller can surface it immediately for live display.
    pub fn apply(&mut self, chunk: &ChatChunk) -> Option<String> {
        let choice = chunk.choices.first()?;

        // Only the first tool call of the delta array is tracked; this
        // protocol emits a single call per turn.
        if let Some(delta) = choice.delta.tool_calls.as_ref().and_then(|calls| calls.first()) {
            self.tool_call.get_or_insert_with(ToolCallRecord::default).merge(delta);
        }

        match choice.delta.content.as_deref() {
            Some(content) if !content.is_empty() => {
                self.text.push_str(content);
                Some(content.to_string())
            }
            _ => None,
        }
    }

    pub fn tool_call(&self) -> Option<&ToolCallRecord> {
        self.tool_call.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve the accumulated response at stream end.
    pub fn finish(self) -> StreamOutcome {
        let tool_call = self.tool_call.and_then(ToolCallRecord::into_request);
        StreamOutcome {
            text: self.text,
            tool_call,
        }
    }
}

/// What one completed stream produced: the concatenated answer text and, if
/// the model invoked a capability, the reassembled call.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOutcome {
    pub text: String,
    pub tool_call: Option<ToolRequest>,
}
