use async_trait::async_trait;

/// Anything that can turn a question into an answer string.
///
/// Implementations never fail: lookup problems degrade to a readable apology.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn answer(&self, question: &str) -> String;
}
