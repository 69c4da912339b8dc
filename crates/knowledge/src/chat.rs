use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encyclopedia::Encyclopedia;
use crate::error::KnowledgeError;
use crate::source::AnswerSource;
use crate::text::{find_country, fold};

pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Answer shown when the completion call fails for any reason.
pub const CHAT_ERROR_TEXT: &str = "OpenAI API çağrısında hata";

const SYSTEM_PROMPT: &str = "Sen Keşif Küresi yapay zekasısın. Dünya ülkeleri, tarih, coğrafya ve kültür hakkındaki soruları kısa ve anlaşılır Türkçe ile yanıtla.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, KnowledgeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KnowledgeError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn headers(&self) -> Result<HeaderMap, KnowledgeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| KnowledgeError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| KnowledgeError::Config(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Sends the role-tagged history and returns the first choice's text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, KnowledgeError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KnowledgeError::Parse("no completion choices".to_string()))
    }
}

/// Answers questions with the chat model, grounded by an encyclopedia summary when the
/// question names a known country.
pub struct ChatAnswerSource {
    client: ChatClient,
    encyclopedia: Option<Arc<dyn Encyclopedia>>,
}

impl ChatAnswerSource {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            encyclopedia: None,
        }
    }

    pub fn with_grounding(mut self, encyclopedia: Arc<dyn Encyclopedia>) -> Self {
        self.encyclopedia = Some(encyclopedia);
        self
    }

    async fn grounding(&self, question: &str) -> Option<String> {
        let encyclopedia = self.encyclopedia.as_ref()?;
        let country = find_country(&fold(question))?;
        match encyclopedia.summary(country.canonical).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(country = country.canonical, error = %err, "summary lookup failed");
                None
            }
        }
    }

    pub async fn messages_for(&self, question: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        if let Some(context) = self.grounding(question).await {
            messages.push(ChatMessage::system(format!("Bağlam: {context}")));
        }
        messages.push(ChatMessage::user(question));
        messages
    }
}

#[async_trait]
impl AnswerSource for ChatAnswerSource {
    async fn answer(&self, question: &str) -> String {
        let messages = self.messages_for(question).await;
        match self.client.complete(&messages).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "chat completion failed");
                CHAT_ERROR_TEXT.to_string()
            }
        }
    }
}
