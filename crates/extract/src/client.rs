use std::{sync::Arc, time::Duration};

use redlens_types::{listing::ListingResponse, post::Post};
use tokio_util::sync::CancellationToken;

use super::{
    error::Error,
    listing::{self, ListingRequest},
    post,
    sink::{Event, EventSink, TracingSink},
};

/// Configuration for the client.
/// timeout: Per-request deadline. (default: 12s)
/// api_base: Origin the JSON endpoints are fetched from. (default: https://www.reddit.com)
/// api_user_agent / html_user_agent: User-Agent for JSON and page requests.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub timeout: Option<Duration>,
    pub api_base: Option<String>,
    pub api_user_agent: Option<String>,
    pub html_user_agent: Option<String>,
}

impl Config {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);
    const DEFAULT_API_BASE: &'static str = "https://www.reddit.com";
    const DEFAULT_API_USER_AGENT: &'static str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
    const DEFAULT_HTML_USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(Self::DEFAULT_TIMEOUT)
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(Self::DEFAULT_API_BASE)
    }

    pub fn api_user_agent(&self) -> &str {
        self.api_user_agent
            .as_deref()
            .unwrap_or(Self::DEFAULT_API_USER_AGENT)
    }

    pub fn html_user_agent(&self) -> &str {
        self.html_user_agent
            .as_deref()
            .unwrap_or(Self::DEFAULT_HTML_USER_AGENT)
    }
}

/// Entry point for both extractors. Holds no per-call state; clones share
/// the underlying connection pool and sink.
#[derive(Debug, Clone)]
pub struct Client {
    cfg: Config,
    http: reqwest::Client,
    sink: Arc<dyn EventSink>,
}

impl Client {
    pub fn new(cfg: Option<Config>) -> Self {
        Self {
            cfg: cfg.unwrap_or_default(),
            http: reqwest::Client::new(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    pub(crate) fn record(&self, event: Event) {
        self.sink.record(&event);
    }

    /// Extracts a single post, trying the JSON API first and the rendered
    /// page second.
    pub async fn extract_post(&self, url: &str, cancel: &CancellationToken) -> Result<Post, Error> {
        post::extract(self, url, cancel).await
    }

    /// Fetches one page of a forum listing.
    pub async fn extract_listing(
        &self,
        request: &ListingRequest,
        cancel: &CancellationToken,
    ) -> Result<ListingResponse, Error> {
        listing::extract(self, request, cancel).await
    }

    /// Issues a GET and returns the response whatever its status.
    pub(crate) async fn send(
        &self,
        url: &str,
        user_agent: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, Error> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.record(Event::Fetching {
            url: url.to_string(),
        });
        let request = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(self.cfg.timeout());
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            resp = request.send() => Ok(resp?),
        }
    }

    /// Reads the whole body, observing cancellation during and after the read.
    pub(crate) async fn read_text(
        &self,
        resp: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            text = resp.text() => text?,
        };
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(text)
    }

    /// GET that treats anything but 200 as an error.
    pub(crate) async fn get_text(
        &self,
        url: &str,
        user_agent: &str,
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        let resp = self.send(url, user_agent, cancel).await?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(Error::StatusCode(resp.status().as_u16()));
        }
        self.read_text(resp, cancel).await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tracing_test::traced_test]
    #[test]
    fn test_config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(12));
        assert_eq!(cfg.api_base(), "https://www.reddit.com");
        assert!(cfg.html_user_agent().contains("Chrome"));
        assert!(!cfg.api_user_agent().contains("Chrome"));
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_config_overrides() {
        let cfg = Config {
            timeout: Some(Duration::from_millis(250)),
            api_base: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.timeout(), Duration::from_millis(250));
        assert_eq!(cfg.api_base(), "http://127.0.0.1:9");
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn test_send_observes_prior_cancellation() {
        let client = Client::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client
            .send("http://127.0.0.1:9/never", "ua", &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
