// src/board/http.rs

//! Board source backed by the public read-only JSON API.
//!
//! ```text
//! {api_base}/{board}/catalog.json
//! {api_base}/{board}/thread/{no}.json
//! ```

use async_trait::async_trait;
use reqwest::Client;

use crate::board::BoardSource;
use crate::error::Result;
use crate::models::{CatalogPage, Thread};
use crate::utils::http::get_json;

/// JSON API client for a single board.
pub struct HttpBoard {
    client: Client,
    api_base: String,
    board: String,
}

impl HttpBoard {
    pub fn new(client: Client, api_base: &str, board: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            board: board.trim_matches('/').to_string(),
        }
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/{}/catalog.json", self.api_base, self.board)
    }

    pub fn thread_url(&self, thread_no: u64) -> String {
        format!("{}/{}/thread/{}.json", self.api_base, self.board, thread_no)
    }
}

#[async_trait]
impl BoardSource for HttpBoard {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogPage>> {
        get_json(&self.client, &self.catalog_url()).await
    }

    async fn fetch_thread(&self, thread_no: u64) -> Result<Thread> {
        get_json(&self.client, &self.thread_url(thread_no)).await
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::HttpConfig;
    use crate::utils::http::create_client;

    async fn board(server: &MockServer) -> HttpBoard {
        let client = create_client(&HttpConfig::default()).unwrap();
        HttpBoard::new(client, &server.uri(), "mu")
    }

    #[test]
    fn test_urls() {
        let board = HttpBoard::new(Client::new(), "https://a.4cdn.org/", "/mu/");
        assert_eq!(board.catalog_url(), "https://a.4cdn.org/mu/catalog.json");
        assert_eq!(
            board.thread_url(12345),
            "https://a.4cdn.org/mu/thread/12345.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_catalog_and_thread() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mu/catalog.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"page": 1, "threads": [{"no": 1, "sub": "/daily/"}, {"no": 2}]}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mu/thread/1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [{"no": 1, "name": "Anonymous", "com": "youtu.be/_lOT2p_FCvA", "closed": 1}]
            })))
            .mount(&server)
            .await;

        let board = board(&server).await;
        let catalog = board.fetch_catalog().await.unwrap();
        assert_eq!(catalog[0].threads.len(), 2);
        assert_eq!(catalog[0].threads[0].subject(), "/daily/");

        let thread = board.fetch_thread(1).await.unwrap();
        assert!(thread.is_closed());
    }

    #[tokio::test]
    async fn test_missing_thread_is_gone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mu/thread/404.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = board(&server).await.fetch_thread(404).await.unwrap_err();
        assert!(err.is_gone());
        assert!(err.to_string().ends_with("/mu/thread/404.json"));
    }
}
