use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};

/// A set of capabilities the model can operate. Systems advertise tools and
/// execute calls routed to them by the agent; results are plain text that is
/// fed back into the conversation.
#[async_trait]
pub trait System: Send + Sync {
    /// Get the name of the system
    fn name(&self) -> &str;

    /// Get the system description
    fn description(&self) -> &str;

    /// Get system instructions to include in the model's context
    fn instructions(&self) -> &str;

    /// Get available tools
    fn tools(&self) -> &[Tool];

    /// Call a tool with already-parsed arguments
    async fn call(&self, tool_call: ToolCall) -> AgentResult<String>;
}
