// ABOUTME: Thin HTTP request wrapper used by the connectivity page and CLI
// Failures of any kind come back as HttpEvent::Failed, there are no retries

use std::time::Duration;

use reqwest::{Client, Method};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use url::Url;

/// Request failures, surfaced uniformly to callers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Extra request settings
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

/// Captured response, detached from the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome delivered by `HttpRequester::make_request`
#[derive(Debug, Clone)]
pub enum HttpEvent {
    Completed(HttpResponse),
    Failed(HttpError),
}

/// Parse an HTTP method name, case-insensitive
pub fn parse_method(name: &str) -> Result<Method, HttpError> {
    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes())
        .map_err(|e| HttpError::Other(format!("invalid method '{name}': {e}")))
}

/// Request wrapper with a stored default URL and method
#[derive(Debug, Clone)]
pub struct HttpRequester {
    url: String,
    method: Method,
    client: Client,
    events: mpsc::UnboundedSender<HttpEvent>,
}

impl HttpRequester {
    pub fn from_url(
        url: impl Into<String>,
        method: Method,
    ) -> (Self, mpsc::UnboundedReceiver<HttpEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let requester = Self {
            url: url.into(),
            method,
            client: Client::new(),
            events,
        };
        (requester, rx)
    }

    /// Build the URL as `protocol://host:port/path`
    pub fn from_parts(
        protocol: &str,
        host: &str,
        port: u16,
        path: &str,
        method: Method,
    ) -> (Self, mpsc::UnboundedReceiver<HttpEvent>) {
        let url = format!("{}://{}:{}/{}", protocol, host, port, path.trim_start_matches('/'));
        Self::from_url(url, method)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Perform the request; empty or missing arguments fall back to the stored ones
    pub async fn send(
        &self,
        url: Option<&str>,
        method: Option<Method>,
        options: RequestOptions,
    ) -> Result<HttpResponse, HttpError> {
        let url = url.filter(|u| !u.trim().is_empty()).unwrap_or(self.url.as_str());
        let method = method.unwrap_or_else(|| self.method.clone());

        let parsed = Url::parse(url.trim()).map_err(|e| HttpError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!("{} {}", method, parsed);
        let mut builder = self.client.request(method, parsed);
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        debug!("{} answered {} with {} bytes", final_url, status, body.len());
        Ok(HttpResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }

    /// Like `send`, but reports the outcome on the event channel
    pub async fn make_request(
        &self,
        url: Option<&str>,
        method: Option<Method>,
        options: RequestOptions,
    ) {
        let event = match self.send(url, method, options).await {
            Ok(response) => HttpEvent::Completed(response),
            Err(e) => {
                warn!("Request failed: {}", e);
                HttpEvent::Failed(e)
            }
        };

        if self.events.send(event).is_err() {
            warn!("Request finished but nobody is listening");
        }
    }
}
