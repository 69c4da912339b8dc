use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::KnowledgeError;

pub const DEFAULT_LANGUAGE: &str = "tr";
pub const DEFAULT_EXTRACT_MAX_CHARS: usize = 1200;

/// Result of a search-then-extract lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    NotFound,
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Searches `term` and returns the best page's plain-text extract.
    async fn lookup(&self, term: &str) -> Result<Lookup, KnowledgeError>;

    /// Short summary of the page titled `title`, if one exists.
    async fn summary(&self, title: &str) -> Result<Option<String>, KnowledgeError>;
}

#[derive(Debug, Clone)]
pub struct WikiConfig {
    pub language: String,
    /// Overrides `https://{language}.wikipedia.org`.
    pub base_url: Option<String>,
    pub extract_max_chars: usize,
    pub timeout: Duration,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: None,
            extract_max_chars: DEFAULT_EXTRACT_MAX_CHARS,
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    base_url: String,
    extract_max_chars: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    extract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    extract: Option<String>,
}

impl WikipediaClient {
    pub fn new(config: WikiConfig) -> Result<Self, KnowledgeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KnowledgeError::Config(e.to_string()))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| format!("https://{}.wikipedia.org", config.language));

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            extract_max_chars: config.extract_max_chars,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }

    async fn search(&self, term: &str) -> Result<Option<u64>, KnowledgeError> {
        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("origin", "*"),
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("format", "json"),
            ])
            .send()
            .await?;
        let body: SearchResponse = check_status(response).await?.json().await?;
        Ok(body.query.search.first().map(|hit| hit.pageid))
    }

    async fn extract(&self, page_id: u64) -> Result<String, KnowledgeError> {
        let id = page_id.to_string();
        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("origin", "*"),
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("pageids", id.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;
        let mut body: ExtractResponse = check_status(response).await?.json().await?;

        body.query
            .pages
            .remove(&id)
            .and_then(|page| page.extract)
            .ok_or_else(|| KnowledgeError::Parse(format!("page {id} has no extract")))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn lookup(&self, term: &str) -> Result<Lookup, KnowledgeError> {
        debug!(%term, "wikipedia search");
        let Some(page_id) = self.search(term).await? else {
            return Ok(Lookup::NotFound);
        };
        let extract = self.extract(page_id).await?;
        Ok(Lookup::Found(truncate_chars(&extract, self.extract_max_chars)))
    }

    async fn summary(&self, title: &str) -> Result<Option<String>, KnowledgeError> {
        let mut url = reqwest::Url::parse(&format!("{}/api/rest_v1/page/summary", self.base_url))
            .map_err(|e| KnowledgeError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| KnowledgeError::Config(format!("{} cannot be a base url", self.base_url)))?
            .push(title);

        debug!(%title, "wikipedia summary");
        let response = self.http.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: SummaryResponse = check_status(response).await?.json().await?;
        Ok(body.extract.filter(|e| !e.is_empty()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, KnowledgeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(KnowledgeError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::{Encyclopedia, Lookup, WikiConfig, WikipediaClient, truncate_chars};
    use crate::error::KnowledgeError;

    const LONG_EXTRACT_CHARS: usize = 1500;

    async fn api(Query(params): Query<HashMap<String, String>>) -> Response {
        if params.get("list").map(String::as_str) == Some("search") {
            let term = params.get("srsearch").cloned().unwrap_or_default();
            let hits = match term.as_str() {
                "Türkiye" => json!([{ "pageid": 42, "title": "Türkiye" }]),
                "uzun" => json!([{ "pageid": 7, "title": "Uzun" }]),
                "bozuk" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
                _ => json!([]),
            };
            return Json(json!({ "query": { "search": hits } })).into_response();
        }

        let id = params.get("pageids").cloned().unwrap_or_default();
        let extract = match id.as_str() {
            "42" => "Türkiye, Anadolu ve Trakya'da yer alan bir ülkedir.".to_string(),
            _ => "ş".repeat(LONG_EXTRACT_CHARS),
        };
        Json(json!({ "query": { "pages": { id: { "pageid": 0, "extract": extract } } } })).into_response()
    }

    async fn summary(Path(title): Path<String>) -> Response {
        if title == "Japonya" {
            Json(json!({ "title": title, "extract": "Japonya bir ada ülkesidir." })).into_response()
        } else {
            (StatusCode::NOT_FOUND, "missing").into_response()
        }
    }

    /// Serves a minimal imitation of the MediaWiki endpoints on an ephemeral port.
    pub(crate) async fn spawn_fake_wiki() -> SocketAddr {
        let app = Router::new()
            .route("/w/api.php", get(api))
            .route("/api/rest_v1/page/summary/:title", get(summary));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client(base_url: String) -> WikipediaClient {
        WikipediaClient::new(WikiConfig {
            base_url: Some(base_url),
            timeout: Duration::from_secs(5),
            ..WikiConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn search_then_extract() {
        let addr = spawn_fake_wiki().await;
        let wiki = client(format!("http://{addr}"));

        let found = wiki.lookup("Türkiye").await.unwrap();
        assert_eq!(
            found,
            Lookup::Found("Türkiye, Anadolu ve Trakya'da yer alan bir ülkedir.".to_string())
        );
        assert_eq!(wiki.lookup("yokyok").await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn long_extracts_are_truncated() {
        let addr = spawn_fake_wiki().await;
        let wiki = client(format!("http://{addr}/"));

        let Lookup::Found(text) = wiki.lookup("uzun").await.unwrap() else {
            panic!("expected an extract");
        };
        assert_eq!(text.chars().count(), 1200 + 3);
        assert!(text.ends_with("..."));
    }

    #[tokio::test]
    async fn server_errors_surface_as_api_errors() {
        let addr = spawn_fake_wiki().await;
        let wiki = client(format!("http://{addr}"));

        let err = wiki.lookup("bozuk").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let wiki = client(format!("http://{addr}"));
        let err = wiki.lookup("Türkiye").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Network(_)));
    }

    #[tokio::test]
    async fn page_summary() {
        let addr = spawn_fake_wiki().await;
        let wiki = client(format!("http://{addr}"));

        assert_eq!(
            wiki.summary("Japonya").await.unwrap().as_deref(),
            Some("Japonya bir ada ülkesidir.")
        );
        assert_eq!(wiki.summary("Atlantis").await.unwrap(), None);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("çğüşöı", 3), "çğü...");
        assert_eq!(truncate_chars("kısa", 10), "kısa");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }
}
