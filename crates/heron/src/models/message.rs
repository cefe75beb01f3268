use super::role::Role;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A tool invocation requested by the model. `arguments` is the raw argument
/// document exactly as reassembled from the stream; it is only parsed at
/// dispatch time so an unparsable document can still be recorded in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// The text produced by executing a tool, linked back to the request by id.
/// Execution failures are represented as readable text here, never as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: String,
    pub text: String,
}

/// Content carried by a single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    ToolRequest(ToolRequest),
    ToolResponse(ToolResponse),
}

impl MessageContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn tool_request<I, N, A>(id: I, name: N, arguments: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: Into<String>,
    {
        MessageContent::ToolRequest(ToolRequest {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        })
    }

    pub fn tool_response<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        MessageContent::ToolResponse(ToolResponse {
            id: id.into(),
            text: text.into(),
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        match self {
            MessageContent::ToolRequest(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_tool_response(&self) -> Option<&ToolResponse> {
        match self {
            MessageContent::ToolResponse(response) => Some(response),
            _ => None,
        }
    }
}

/// One conversation turn. Immutable once appended to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<MessageContent>,
}

impl Message {
    fn new(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new system message with the current timestamp
    pub fn system() -> Self {
        Message::new(Role::System)
    }

    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message::new(Role::User)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message::new(Role::Assistant)
    }

    /// Create a new tool-result message with the current timestamp
    pub fn tool() -> Self {
        Message::new(Role::Tool)
    }

    /// Add any MessageContent to the message
    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(MessageContent::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request(self, request: ToolRequest) -> Self {
        self.with_content(MessageContent::ToolRequest(request))
    }

    /// Add a tool response to the message
    pub fn with_tool_response<I: Into<String>, T: Into<String>>(self, id: I, text: T) -> Self {
        self.with_content(MessageContent::tool_response(id, text))
    }

    /// Concatenated text content of the message
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| content.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The first tool request carried by this message, if any
    pub fn tool_request(&self) -> Option<&ToolRequest> {
        self.content
            .iter()
            .find_map(|content| content.as_tool_request())
    }
}
