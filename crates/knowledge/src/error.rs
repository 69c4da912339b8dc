use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for KnowledgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            KnowledgeError::Parse(e.to_string())
        } else {
            KnowledgeError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for KnowledgeError {
    fn from(e: serde_json::Error) -> Self {
        KnowledgeError::Parse(e.to_string())
    }
}
