use crate::error::{Result, StaffingError};
use crate::intent::ParsedCommand;
use crate::llm::prompts::SYSTEM_PROMPT;
use crate::llm::CommandParser;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Chat-completions client that turns free text into a [`ParsedCommand`].
///
/// The response is constrained to the schemars-generated schema of
/// [`ParsedCommand`]; a brace-slice fallback still handles models that wrap
/// the JSON in prose or fences.
#[derive(Clone)]
pub struct OpenAiParser {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: String,
}

impl OpenAiParser {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the default system prompt (e.g. for a different vocabulary).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    async fn complete(&self, command: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let schema = serde_json::to_value(ParsedCommand::generate_json_schema())?;
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt },
                { "role": "user", "content": command },
            ],
            "temperature": 0.1,
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": "parsed_command", "schema": schema },
            },
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StaffingError::Upstream(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: ChatCompletionResponse = res.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| StaffingError::Upstream("Empty completion response".to_string()))
    }
}

#[async_trait]
impl CommandParser for OpenAiParser {
    async fn parse(&self, command: &str) -> Result<ParsedCommand> {
        let content = self.complete(command).await?;
        parse_command_json(&content)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Parses the model output, tolerating prose or fences around the JSON
/// object.
fn parse_command_json(content: &str) -> Result<ParsedCommand> {
    if let Ok(parsed) = serde_json::from_str(content) {
        return Ok(parsed);
    }
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if start < end {
            if let Ok(parsed) = serde_json::from_str(&content[start..=end]) {
                return Ok(parsed);
            }
        }
    }
    Err(StaffingError::Upstream(
        "Model response not readable as JSON".to_string(),
    ))
}
