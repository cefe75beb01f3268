use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::base::{OnContent, Provider};
use super::configs::XaiProviderConfig;
use super::utils::{messages_to_wire_spec, tools_to_wire_spec};
use crate::errors::ProviderError;
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::stream::{StreamOutcome, StreamSession};

pub struct XaiProvider {
    client: Client,
    config: XaiProviderConfig,
}

impl XaiProvider {
    pub fn new(config: XaiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for XaiProvider {
    async fn stream_reply(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[Tool],
        on_content: OnContent<'_>,
    ) -> Result<StreamOutcome, ProviderError> {
        let mut payload = json!({
            "model": model,
            "messages": messages_to_wire_spec(messages),
            "stream": true,
            "max_tokens": self.config.max_tokens,
        });
        if !tools.is_empty() {
            payload
                .as_object_mut()
                .unwrap()
                .insert("tools".to_string(), json!(tools_to_wire_spec(tools)));
        }

        let response = self
            .client
            .post(self.url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Capture whatever body the server sent; it usually explains the
            // failure better than the status line.
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let mut session = StreamSession::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if session.feed(&chunk, &mut *on_content)? {
                break;
            }
        }

        Ok(session.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_provider(server: &MockServer) -> XaiProvider {
        let config = XaiProviderConfig {
            host: server.uri(),
            api_key: "test_api_key".to_string(),
            max_tokens: 4096,
        };
        XaiProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_stream_reply_content() {
        let server = MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\
data: [DONE]\n";
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test_api_key"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let provider = setup_provider(&server).await;
        let messages = vec![Message::user().with_text("Hi")];

        let mut fragments = Vec::new();
        let mut on_content = |fragment: &str| fragments.push(fragment.to_string());
        let outcome = provider
            .stream_reply("grok-code-fast-1", &messages, &[], &mut on_content)
            .await
            .unwrap();

        assert_eq!(fragments, vec!["Hel", "lo"]);
        assert_eq!(outcome.text, "Hello");
        assert!(outcome.tool_call.is_none());
    }

    #[tokio::test]
    async fn test_stream_reply_tool_call() {
        let server = MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"tool_calls\":[{\"id\":\"1\",\"function\":{\"name\":\"list_dir\",\"arguments\":\"{\\\"dirpath\\\":\\\".\\\"}\"}}]}}]}\n\
data: [DONE]\n";
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"),
            )
            .mount(&server)
            .await;

        let provider = setup_provider(&server).await;
        let tools = vec![Tool::new("list_dir", "List a directory", json!({"type": "object"}))];
        let messages = vec![Message::user().with_text("what's here?")];

        let mut on_content = |_: &str| {};
        let outcome = provider
            .stream_reply("grok-code-fast-1", &messages, &tools, &mut on_content)
            .await
            .unwrap();

        let request = outcome.tool_call.expect("tool call");
        assert_eq!(request.id, "1");
        assert_eq!(request.name, "list_dir");
        assert_eq!(request.arguments, r#"{"dirpath":"."}"#);
    }

    #[tokio::test]
    async fn test_stream_reply_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"),
            )
            .mount(&server)
            .await;

        let provider = setup_provider(&server).await;
        let messages = vec![Message::user().with_text("Hi")];

        let mut on_content = |_: &str| {};
        let error = provider
            .stream_reply("grok-code-fast-1", &messages, &[], &mut on_content)
            .await
            .unwrap_err();

        match error {
            ProviderError::Status { code, body } => {
                assert_eq!(code, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
