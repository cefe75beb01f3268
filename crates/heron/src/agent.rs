use serde_json::Value;

use crate::conversation::Conversation;
use crate::errors::ProviderError;
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;
use crate::providers::utils::is_valid_function_name;
use crate::systems::System;

/// Ceiling on tool-dispatch cycles within one user turn. The model can in
/// principle keep calling tools forever; we surface `ToolLoopExceeded`
/// instead of recursing indefinitely.
pub const DEFAULT_MAX_TOOL_CYCLES: usize = 25;

/// Receives the observable events of one reply as they happen: content
/// fragments for live echo and tool invocations for display.
pub trait ReplyHandler: Send {
    fn on_content_delta(&mut self, fragment: &str);
    fn on_tool_call(&mut self, name: &str);
}

/// Terminal outcome of one user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The model produced a final answer, now appended to the conversation.
    Answer(String),
    /// The stream ended with nothing actionable; no turn was appended.
    Silent,
}

/// Drives the request → (maybe tool call) → tool execution → follow-up loop
/// for one conversation. Owns the conversation exclusively; one request is in
/// flight at a time.
pub struct Agent {
    provider: Box<dyn Provider>,
    systems: Vec<Box<dyn System>>,
    conversation: Conversation,
    model: String,
    max_tool_cycles: usize,
}

impl Agent {
    pub fn new<M, S>(provider: Box<dyn Provider>, model: M, system_prompt: S) -> Self
    where
        M: Into<String>,
        S: Into<String>,
    {
        Self {
            provider,
            systems: Vec::new(),
            conversation: Conversation::new(system_prompt),
            model: model.into(),
            max_tool_cycles: DEFAULT_MAX_TOOL_CYCLES,
        }
    }

    /// Add a system to the agent
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    pub fn with_max_tool_cycles(mut self, max_tool_cycles: usize) -> Self {
        self.max_tool_cycles = max_tool_cycles;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model<M: Into<String>>(&mut self, model: M) {
        self.model = model.into();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// All tool declarations across systems, sent with every request.
    fn tools(&self) -> Vec<Tool> {
        self.systems
            .iter()
            .flat_map(|system| system.tools().iter().cloned())
            .collect()
    }

    fn system_for_tool(&self, name: &str) -> Option<&dyn System> {
        self.systems
            .iter()
            .find(|system| system.tools().iter().any(|tool| tool.name == name))
            .map(|system| &**system)
    }

    /// Route a named tool call. A result text is always produced: unknown
    /// tools and execution failures come back as readable error text for the
    /// model, never as an error of the orchestrator.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> String {
        if !is_valid_function_name(name) {
            return format!(
                "Error: the tool name '{}' has invalid characters, it must match [a-zA-Z0-9_-]+",
                name
            );
        }
        let Some(system) = self.system_for_tool(name) else {
            return format!("Error: no tool named '{}' is available", name);
        };
        match system.call(ToolCall::new(name, arguments)).await {
            Ok(text) => text,
            Err(error) => format!("The tool call returned the following error:\n{}", error),
        }
    }

    async fn dispatch(&self, request: &ToolRequest) -> String {
        tracing::info!(tool = %request.name, "dispatching tool call");
        let arguments: Value = match serde_json::from_str(&request.arguments) {
            Ok(value) => value,
            Err(error) => {
                return format!("Error: could not parse tool arguments: {}", error);
            }
        };
        self.call_tool(&request.name, arguments).await
    }

    /// Process one user input to a terminal outcome.
    ///
    /// The user turn is committed to the conversation only once the first
    /// stream of the reply ends cleanly, so a failed attempt leaves history
    /// exactly as it was and the same input can be retried without
    /// duplicated turns.
    pub async fn reply(
        &mut self,
        user_text: &str,
        handler: &mut dyn ReplyHandler,
    ) -> Result<ReplyOutcome, ProviderError> {
        let mut pending_user = Some(Message::user().with_text(user_text));
        let tools = self.tools();
        let mut cycles = 0;

        loop {
            let outcome = {
                let mut request_messages = self.conversation.messages().to_vec();
                if let Some(user) = &pending_user {
                    request_messages.push(user.clone());
                }
                let mut on_content = |fragment: &str| handler.on_content_delta(fragment);
                self.provider
                    .stream_reply(&self.model, &request_messages, &tools, &mut on_content)
                    .await?
            };

            // The stream ended cleanly; the user turn is now part of history.
            if let Some(user) = pending_user.take() {
                self.conversation.push(user);
            }

            match outcome.tool_call {
                Some(request) => {
                    if cycles >= self.max_tool_cycles {
                        return Err(ProviderError::ToolLoopExceeded(self.max_tool_cycles));
                    }
                    cycles += 1;

                    handler.on_tool_call(&request.name);
                    self.conversation
                        .push(Message::assistant().with_tool_request(request.clone()));
                    let result_text = self.dispatch(&request).await;
                    self.conversation
                        .push(Message::tool().with_tool_response(&request.id, result_text));
                    // Re-enter Sending with the tool result in context.
                }
                None => {
                    if outcome.text.is_empty() {
                        return Ok(ReplyOutcome::Silent);
                    }
                    self.conversation
                        .push(Message::assistant().with_text(&outcome.text));
                    return Ok(ReplyOutcome::Answer(outcome.text));
                }
            }
        }
    }
}
