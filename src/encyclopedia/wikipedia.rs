//! Wikipedia summary lookup via the MediaWiki action API.

use super::ArticleSource;
use crate::config::ArticleSettings;
use crate::error::{RadioError, Result};
use crate::http::{create_client_with_timeout, endpoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Wikipedia client returning plain-text introductions.
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
    auto_suggest: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

impl WikipediaClient {
    /// Create a client from settings.
    pub fn new(settings: &ArticleSettings) -> Result<Self> {
        let base_url = settings.base_url.replace("{language}", &settings.language);
        endpoint(&base_url, "w/api.php")?;

        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(settings.timeout_secs))?,
            base_url,
            auto_suggest: settings.auto_suggest,
        })
    }

    /// Base URL with the language already applied.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<QueryBody> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "w/api.php")?)
            .query(&[("action", "query"), ("format", "json")])
            .query(params)
            .send()
            .await
            .map_err(|e| RadioError::Article(format!("Wikipedia request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RadioError::Article(format!(
                "Wikipedia returned status {}",
                response.status()
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| RadioError::Article(format!("Invalid Wikipedia response: {}", e)))?;

        body.query
            .ok_or_else(|| RadioError::Article("Wikipedia response has no query body".to_string()))
    }

    /// Best matching title for a free-form search.
    async fn suggest(&self, topic: &str) -> Result<String> {
        let body = self
            .query(&[("list", "search"), ("srsearch", topic), ("srlimit", "1")])
            .await?;

        body.search
            .into_iter()
            .next()
            .map(|hit| hit.title)
            .ok_or_else(|| RadioError::Article(format!("No article matches '{}'", topic)))
    }
}

#[async_trait]
impl ArticleSource for WikipediaClient {
    #[instrument(skip(self))]
    async fn fetch_summary(&self, topic: &str) -> Result<String> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RadioError::InvalidTopic("Invalid/Empty article".to_string()));
        }

        let title = if self.auto_suggest {
            self.suggest(topic).await?
        } else {
            topic.to_string()
        };

        debug!(title = %title, "Fetching Wikipedia summary");

        let body = self
            .query(&[
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title.as_str()),
            ])
            .await?;

        let page = body
            .pages
            .into_values()
            .next()
            .ok_or_else(|| RadioError::Article(format!("No page returned for '{}'", title)))?;

        if page.missing.is_some() || page.invalid.is_some() {
            return Err(RadioError::Article(format!(
                "Page id \"{}\" does not match any pages",
                page.title
            )));
        }

        if page.pageprops.and_then(|p| p.disambiguation).is_some() {
            return Err(RadioError::Article(format!(
                "\"{}\" may refer to several articles; use a more specific topic",
                page.title
            )));
        }

        let summary = page.extract.unwrap_or_default().trim().to_string();
        info!(title = %page.title, chars = summary.chars().count(), "Fetched article");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(base_url: &str) -> ArticleSettings {
        ArticleSettings {
            base_url: base_url.to_string(),
            ..ArticleSettings::default()
        }
    }

    #[test]
    fn test_language_placeholder() {
        let client = WikipediaClient::new(&ArticleSettings::default()).unwrap();
        assert_eq!(client.base_url(), "https://en.wikipedia.org");
    }

    #[tokio::test]
    async fn test_fetch_summary_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("titles", "Photosynthesis"))
            .and(query_param("explaintext", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "batchcomplete": "",
                "query": {
                    "pages": {
                        "24544": {
                            "pageid": 24544,
                            "ns": 0,
                            "title": "Photosynthesis",
                            "extract": "Photosynthesis is a biological process. It converts light."
                        }
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = WikipediaClient::new(&settings_for(&server.uri())).unwrap();
        let summary = client.fetch_summary("  Photosynthesis ").await.unwrap();
        assert_eq!(summary, "Photosynthesis is a biological process. It converts light.");
    }

    #[tokio::test]
    async fn test_missing_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {
                    "pages": {
                        "-1": {"ns": 0, "title": "Qwxzzy", "missing": ""}
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(&settings_for(&server.uri())).unwrap();
        let err = client.fetch_summary("Qwxzzy").await.unwrap_err();
        assert!(matches!(err, RadioError::Article(_)));
    }

    #[tokio::test]
    async fn test_disambiguation_page_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {
                    "pages": {
                        "123": {
                            "title": "Mercury",
                            "extract": "Mercury may refer to:",
                            "pageprops": {"disambiguation": ""}
                        }
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(&settings_for(&server.uri())).unwrap();
        let err = client.fetch_summary("Mercury").await.unwrap_err();
        assert!(err.to_string().contains("several articles"));
    }

    #[tokio::test]
    async fn test_empty_topic_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = WikipediaClient::new(&settings_for(&server.uri())).unwrap();
        let err = client.fetch_summary("   ").await.unwrap_err();
        assert!(matches!(err, RadioError::InvalidTopic(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = WikipediaClient::new(&settings_for(&server.uri())).unwrap();
        assert!(client.fetch_summary("Test").await.is_err());
    }

    #[tokio::test]
    async fn test_auto_suggest_resolves_title_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("list", "search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {"search": [{"title": "Photosynthesis"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("titles", "Photosynthesis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": {"pages": {"1": {"title": "Photosynthesis", "extract": "Light to sugar."}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = settings_for(&server.uri());
        settings.auto_suggest = true;
        let client = WikipediaClient::new(&settings).unwrap();
        let summary = client.fetch_summary("photosynthesys").await.unwrap();
        assert_eq!(summary, "Light to sugar.");
    }
}
