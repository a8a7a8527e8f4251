//! OpenAI-compatible Chat Completions client implementing `LlmClient`.
//!
//! Talks to any endpoint that speaks the Chat Completions API (hosted NIM, vLLM,
//! OpenAI). Temperature defaults to 0 so tool-call triggering is stable across
//! retries; the output budget comes from each call's `InvokeOptions`.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionTools,
        CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::llm::{InvokeOptions, LlmClient, LlmResponse, LlmUsage};
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// Sampling is deterministic for every call.
const TEMPERATURE: f32 = 0.0;

/// Chat Completions client. Cheap to share behind an `Arc`.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Vec<ToolSpec>,
}

impl ChatOpenAI {
    /// Client for `base_url` (e.g. `http://host:8000/v1`) with a bearer `api_key`.
    pub fn new(base_url: &str, api_key: &str, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url.trim_end_matches('/'))
            .with_api_key(api_key);
        Self::with_config(config, model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: Vec::new(),
        }
    }

    /// Tools offered to the model as function tools.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_error(e: impl std::fmt::Display) -> AgentError {
        AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
    }

    fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, AgentError> {
        let converted = match message {
            Message::System { content } => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(content.as_str()),
            ),
            Message::User { content } => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage::from(content.as_str()),
            ),
            Message::Assistant {
                content,
                tool_calls,
            } => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if !content.is_empty() {
                    args.content(content.as_str());
                }
                if !tool_calls.is_empty() {
                    let calls: Vec<ChatCompletionMessageToolCalls> = tool_calls
                        .iter()
                        .map(|c| {
                            ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
                                id: c.id.clone(),
                                function: FunctionCall {
                                    name: c.name.clone(),
                                    arguments: Value::Object(c.args.clone()).to_string(),
                                },
                            })
                        })
                        .collect();
                    args.tool_calls(calls);
                }
                ChatCompletionRequestMessage::Assistant(args.build().map_err(Self::build_error)?)
            }
            Message::Tool {
                tool_call_id,
                content,
                ..
            } => ChatCompletionRequestMessage::Tool(
                ChatCompletionRequestToolMessageArgs::default()
                    .content(content.as_str())
                    .tool_call_id(tool_call_id.as_str())
                    .build()
                    .map_err(Self::build_error)?,
            ),
        };
        Ok(converted)
    }

    fn chat_tools(&self) -> Vec<ChatCompletionTools> {
        self.tools
            .iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: Some(t.input_schema.clone()),
                        ..Default::default()
                    },
                })
            })
            .collect()
    }
}

/// Some OpenAI-compatible servers omit tool call ids; tool replies still need one to correlate.
fn non_empty_call_id(id: String) -> String {
    if id.trim().is_empty() {
        format!("call_{}", uuid::Uuid::new_v4().simple())
    } else {
        id
    }
}

/// Parses a tool call's raw `arguments` into a JSON object.
///
/// Some servers double-encode the object as a JSON string; that is unwrapped once.
/// Anything that is not an object ends up as an empty map (the tool then reports
/// the missing fields).
pub(crate) fn parse_tool_arguments(arguments: &str) -> Map<String, Value> {
    if arguments.trim().is_empty() {
        return Map::new();
    }
    let parsed = match serde_json::from_str::<Value>(arguments) {
        Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner),
        other => other,
    };
    match parsed {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(arguments = %arguments, kind = ?other, "tool arguments are not an object");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
            Map::new()
        }
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(
        &self,
        messages: &[Message],
        options: &InvokeOptions,
    ) -> Result<LlmResponse, AgentError> {
        let request_messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone())
            .messages(request_messages)
            .temperature(TEMPERATURE);
        if !self.tools.is_empty() {
            args.tools(self.chat_tools());
        }
        if let Some(max) = options.max_completion_tokens {
            args.max_completion_tokens(max);
        }
        let request = args.build().map_err(Self::build_error)?;

        debug!(
            model = %self.model,
            message_count = messages.len(),
            tools_count = self.tools.len(),
            max_completion_tokens = ?options.max_completion_tokens,
            "chat completion request"
        );
        if let Ok(js) = serde_json::to_string(&request) {
            trace!(request = %js, "chat completion request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        // No choices is treated like an empty reply so the caller's retry applies.
        let Some(choice) = response.choices.into_iter().next() else {
            debug!("chat completion returned no choices");
            return Ok(LlmResponse {
                usage,
                ..LlmResponse::default()
            });
        };

        let msg = choice.message;
        let tool_calls = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall::new(
                    non_empty_call_id(f.id),
                    f.function.name,
                    parse_tool_arguments(&f.function.arguments),
                )),
                _ => None,
            })
            .collect::<Vec<_>>();
        debug!(
            content_len = msg.content.as_deref().map_or(0, str::len),
            tool_calls = tool_calls.len(),
            ?usage,
            "chat completion response"
        );

        Ok(LlmResponse {
            content: msg.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}
