use std::time::Duration;

use async_trait::async_trait;
use rquest::Client;
use url::Url;

use super::http::{create_client, ClientType};
use crate::config::ScannerConfig;
use crate::error::{AppError, Result};

/// Retrieves the raw HTML of a page.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    /// Body of `url`, verbatim.
    ///
    /// Fails with `InvalidUrl` before any I/O when the URL is malformed or not http(s),
    /// and with `FetchFailed` on transport errors, timeouts and non-2xx responses.
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ScannerConfig) -> anyhow::Result<Self> {
        let client = create_client(
            config.client_type(),
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        Ok(Self::new(client))
    }
}

/// Parses `raw` and accepts only http and https.
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| AppError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            raw, scheme
        ))),
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let url = validate_url(url)?;
        log::debug!("[FETCH] GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| AppError::fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("[FETCH] {} answered {}", url, status.as_u16());
            return Err(AppError::fetch(format!("{} returned HTTP {}", url, status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch(format!("{}: failed to read body: {}", url, e)))?;

        log::debug!("[FETCH] {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(create_client(ClientType::Standard, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_returns_body_verbatim() {
        let mut server = Server::new_async().await;
        let body = "<html>\n  <body>  <p>Spaced   out</p>  </body>\n</html>\n";
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        let html = fetcher().fetch(&server.url()).await.unwrap();
        assert_eq!(html, body);
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_failure() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        match fetcher().fetch(&url).await {
            Err(AppError::FetchFailed(msg)) => assert!(msg.contains("404")),
            other => panic!("expected fetch failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_urls_rejected_before_io() {
        for url in ["not a url", "ftp://example.com/file", "mailto:someone@example.com", ""] {
            assert!(
                matches!(fetcher().fetch(url).await, Err(AppError::InvalidUrl(_))),
                "{url} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_failure() {
        // Port 9 on loopback is the discard service and is almost never listening.
        let result = fetcher().fetch("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(AppError::FetchFailed(_))));
    }

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
    }
}
