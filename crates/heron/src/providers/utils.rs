use regex::Regex;
use serde_json::{json, Value};

use crate::models::message::{Message, MessageContent};
use crate::models::tool::Tool;

/// Convert the internal turn history to the chat completions message
/// specification, in history order. Assistant tool requests become
/// `tool_calls` entries; tool responses become `role: "tool"` messages linked
/// by `tool_call_id`.
pub fn messages_to_wire_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role
        });

        let mut output = Vec::new();

        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.is_empty() {
                        converted["content"] = json!(text);
                    }
                }
                MessageContent::ToolRequest(request) => {
                    let tool_calls = converted
                        .as_object_mut()
                        .unwrap()
                        .entry("tool_calls")
                        .or_insert(json!([]));

                    tool_calls.as_array_mut().unwrap().push(json!({
                        "id": request.id,
                        "type": "function",
                        "function": {
                            "name": request.name,
                            "arguments": request.arguments,
                        }
                    }));
                }
                MessageContent::ToolResponse(response) => {
                    output.push(json!({
                        "role": "tool",
                        "content": response.text,
                        "tool_call_id": response.id
                    }));
                }
            }
        }

        if converted.get("content").is_some() || converted.get("tool_calls").is_some() {
            output.insert(0, converted);
        }
        messages_spec.extend(output);
    }

    messages_spec
}

/// Convert the internal tool declarations to the chat completions tool
/// specification.
pub fn tools_to_wire_spec(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

pub fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::ToolRequest;
    use serde_json::json;

    #[test]
    fn test_messages_to_wire_spec_text() {
        let message = Message::user().with_text("Hello");
        let spec = messages_to_wire_spec(&[message]);

        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["role"], "user");
        assert_eq!(spec[0]["content"], "Hello");
    }

    #[test]
    fn test_messages_to_wire_spec_tool_round_trip() {
        let messages = vec![
            Message::system().with_text("sys"),
            Message::user().with_text("list the current directory"),
            Message::assistant().with_tool_request(ToolRequest {
                id: "call_7".into(),
                name: "list_dir".into(),
                arguments: r#"{"dirpath":"."}"#.into(),
            }),
            Message::tool().with_tool_response("call_7", "two entries"),
            Message::assistant().with_text("There are two entries."),
        ];

        let spec = messages_to_wire_spec(&messages);

        assert_eq!(spec.len(), 5);
        assert_eq!(spec[0]["role"], "system");
        assert_eq!(spec[1]["role"], "user");
        assert_eq!(spec[2]["role"], "assistant");
        assert_eq!(spec[2]["tool_calls"][0]["id"], "call_7");
        assert_eq!(spec[2]["tool_calls"][0]["function"]["name"], "list_dir");
        assert_eq!(
            spec[2]["tool_calls"][0]["function"]["arguments"],
            r#"{"dirpath":"."}"#
        );
        assert_eq!(spec[3]["role"], "tool");
        assert_eq!(spec[3]["tool_call_id"], "call_7");
        assert_eq!(spec[3]["content"], "two entries");
        assert_eq!(spec[4]["content"], "There are two entries.");
    }

    #[test]
    fn test_empty_text_turn_emits_nothing() {
        let spec = messages_to_wire_spec(&[Message::assistant()]);
        assert!(spec.is_empty());
    }

    #[test]
    fn test_tools_to_wire_spec() {
        let tool = Tool::new(
            "read_file",
            "Read a file",
            json!({
                "type": "object",
                "required": ["filepath"],
                "properties": {
                    "filepath": { "type": "string" }
                }
            }),
        );

        let spec = tools_to_wire_spec(&[tool]);

        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["type"], "function");
        assert_eq!(spec[0]["function"]["name"], "read_file");
        assert_eq!(
            spec[0]["function"]["parameters"]["required"],
            json!(["filepath"])
        );
    }

    #[test]
    fn test_is_valid_function_name() {
        assert!(is_valid_function_name("read_file"));
        assert!(is_valid_function_name("list-dir2"));
        assert!(!is_valid_function_name("rm -rf"));
        assert!(!is_valid_function_name(""));
    }
}
