use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use knowledge::chat::{DEFAULT_CHAT_BASE_URL, DEFAULT_CHAT_MODEL};
use knowledge::encyclopedia::{DEFAULT_EXTRACT_MAX_CHARS, DEFAULT_LANGUAGE};
use knowledge::{ChatConfig, WikiConfig};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9200";

/// Which engine answers `/sessions/:id/ask`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnswerSourceKind {
    Router,
    Chat,
}

impl FromStr for AnswerSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "router" => Ok(Self::Router),
            "chat" => Ok(Self::Chat),
            other => Err(format!("unknown answer source {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub answer_source: AnswerSourceKind,
    pub wiki: WikiConfig,
    pub chat: ChatConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let addr: SocketAddr = env::var("DISCOVERY_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|e| format!("invalid DISCOVERY_ADDR: {e}"))?;
        let answer_source = env::var("ANSWER_SOURCE")
            .unwrap_or_else(|_| "router".to_string())
            .parse()?;
        let timeout = Duration::from_secs(env_var_u64("HTTP_TIMEOUT_SECS", 15));

        let wiki = WikiConfig {
            language: env::var("WIKI_LANG").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
            base_url: env::var("WIKI_BASE_URL").ok(),
            extract_max_chars: env_var_usize("WIKI_EXTRACT_MAX_CHARS", DEFAULT_EXTRACT_MAX_CHARS),
            timeout,
        };

        let chat = ChatConfig {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_CHAT_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            timeout,
            ..ChatConfig::default()
        };

        Ok(Self {
            addr,
            answer_source,
            wiki,
            chat,
        })
    }
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
