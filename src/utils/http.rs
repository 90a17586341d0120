// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request and decode a JSON body.
///
/// Non-success statuses become [`AppError::Status`]; connection resets become
/// [`AppError::ConnectionReset`].
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T> {
    let response = request.send().await.map_err(AppError::from_transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::status(url, status.as_u16()));
    }
    let text = response.text().await.map_err(AppError::from_transport)?;
    Ok(serde_json::from_str(&text)?)
}

/// Fetch a JSON document with a plain GET.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    send_json(client.get(url), url).await
}
