mod config;
mod routes;
mod view;

use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use knowledge::{AnswerSource, ChatAnswerSource, ChatClient, Encyclopedia, KnowledgeRouter, SystemClock, WikipediaClient};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AnswerSourceKind, ServerConfig};
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;

    let wiki: Arc<dyn Encyclopedia> =
        Arc::new(WikipediaClient::new(config.wiki.clone()).context("building encyclopedia client")?);
    let chat = ChatClient::new(config.chat.clone()).context("building chat client")?;

    let answers: Arc<dyn AnswerSource> = match config.answer_source {
        AnswerSourceKind::Router => Arc::new(KnowledgeRouter::new(wiki, Arc::new(SystemClock))),
        AnswerSourceKind::Chat => Arc::new(ChatAnswerSource::new(chat.clone()).with_grounding(wiki)),
    };
    if config.chat.api_key.is_none() {
        info!("OPENAI_API_KEY not set; /chat will answer with an error");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = router(AppState::new(answers, chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(answer_source = ?config.answer_source, "discovery server listening on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
