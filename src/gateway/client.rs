//! Reqwest-backed client that relays validated requests to the ShareIt server

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method},
    response::Response,
};
use serde_json::Value;

use crate::{
    api::SHARER_USER_ID,
    config::GatewayConfig,
    error::{AppError, AppResult},
};

/// Forwarding client bound to one upstream base URL
#[derive(Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ServerClient {
    /// Build a client with the configured request timeout
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `method path?query` upstream and relay status, content type and body verbatim
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        user_id: Option<i64>,
        body: Option<&Value>,
    ) -> AppResult<Response> {
        let url = match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", self.base_url, path, query),
            None => format!("{}{}", self.base_url, path),
        };
        tracing::debug!("Forwarding {} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(user_id) = user_id {
            request = request.header(SHARER_USER_ID, user_id);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let upstream = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Server request to {} failed: {}", url, e)))?;

        let status = upstream.status();
        let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Reading server response failed: {}", e)))?;

        tracing::debug!("Server answered {} for {}", status, url);

        let mut builder = Response::builder().status(status);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder
            .body(Body::from(bytes))
            .map_err(|e| AppError::Internal(format!("Building relayed response failed: {}", e)))
    }

    pub async fn get(&self, path: &str, query: Option<&str>, user_id: Option<i64>) -> AppResult<Response> {
        self.forward(Method::GET, path, query, user_id, None).await
    }

    pub async fn post(&self, path: &str, user_id: Option<i64>, body: &Value) -> AppResult<Response> {
        self.forward(Method::POST, path, None, user_id, Some(body)).await
    }

    pub async fn patch(
        &self,
        path: &str,
        query: Option<&str>,
        user_id: Option<i64>,
        body: Option<&Value>,
    ) -> AppResult<Response> {
        self.forward(Method::PATCH, path, query, user_id, body).await
    }

    pub async fn put(&self, path: &str, user_id: Option<i64>, body: &Value) -> AppResult<Response> {
        self.forward(Method::PUT, path, None, user_id, Some(body)).await
    }

    pub async fn delete(&self, path: &str, user_id: Option<i64>) -> AppResult<Response> {
        self.forward(Method::DELETE, path, None, user_id, None).await
    }
}
