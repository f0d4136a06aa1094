use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use tracing::{debug, info};

use crate::{error::ForecastError, model::Forecast};

use super::ForecastSource;

/// Gridpoint forecast for Milwaukee/Sullivan, WI.
pub const DEFAULT_FORECAST_URL: &str = "https://api.weather.gov/gridpoints/MKX/88,63/forecast";

/// api.weather.gov rejects requests without a User-Agent.
pub const DEFAULT_USER_AGENT: &str = concat!("weather-rules/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// National Weather Service gridpoint forecast over HTTP.
#[derive(Debug, Clone)]
pub struct NwsForecastSource {
    url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct NwsForecastSourceBuilder {
    url: String,
    user_agent: String,
    timeout: Duration,
}

impl NwsForecastSourceBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<NwsForecastSource, ForecastError> {
        let http = Client::builder()
            .user_agent(self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(ForecastError::Client)?;

        Ok(NwsForecastSource { url: self.url, http })
    }
}

impl NwsForecastSource {
    pub fn builder(url: impl Into<String>) -> NwsForecastSourceBuilder {
        NwsForecastSourceBuilder {
            url: url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new(url: impl Into<String>) -> Result<Self, ForecastError> {
        Self::builder(url).build()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport(&self, source: reqwest::Error) -> ForecastError {
        ForecastError::Transport {
            url: self.url.clone(),
            source,
        }
    }
}

#[async_trait]
impl ForecastSource for NwsForecastSource {
    async fn fetch(&self) -> Result<Forecast, ForecastError> {
        info!(url = %self.url, "fetching forecast");

        let res = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.transport(e))?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                url: self.url.clone(),
                status,
                body: truncate_body(&body),
            });
        }

        let forecast: Forecast = serde_json::from_str(&body)?;
        debug!(periods = forecast.periods().len(), "forecast parsed");

        Ok(forecast)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Serve a single canned HTTP response and return the URL to hit.
    async fn serve_once(status_line: &str, content_type: &str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: {content_type}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{addr}/gridpoints/MKX/88,63/forecast")
    }

    #[tokio::test]
    async fn parses_successful_response() {
        let body = r#"{"properties":{"periods":[{"name":"Today","temperature":77}]}}"#;
        let url = serve_once("200 OK", "application/geo+json", body.to_string()).await;

        let forecast = NwsForecastSource::new(url).unwrap().fetch().await.unwrap();
        assert_eq!(forecast.today().unwrap().temperature, Some(77.0));
    }

    #[tokio::test]
    async fn error_status_is_reported_with_truncated_body() {
        let body = "upstream unavailable ".repeat(40);
        let url = serve_once("503 Service Unavailable", "text/plain", body).await;

        let err = NwsForecastSource::new(url.clone())
            .unwrap()
            .fetch()
            .await
            .unwrap_err();

        match &err {
            ForecastError::Status {
                url: failed,
                status,
                body,
            } => {
                assert_eq!(failed, &url);
                assert_eq!(*status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.chars().count(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("forecast unavailable"));
    }

    #[tokio::test]
    async fn html_body_with_ok_status_is_malformed() {
        let url = serve_once(
            "200 OK",
            "text/html",
            "<html><body>Maintenance</body></html>".to_string(),
        )
        .await;

        let err = NwsForecastSource::new(url).unwrap().fetch().await.unwrap_err();
        assert!(matches!(err, ForecastError::Malformed(_)));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "°".repeat(300);
        let out = truncate_body(&body);
        assert_eq!(out.chars().count(), 203);
        assert!(out.ends_with("..."));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        // Grab a free port, then release it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{port}/gridpoints/MKX/88,63/forecast");
        let source = NwsForecastSource::builder(url.clone())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let err = source.fetch().await.unwrap_err();
        match &err {
            ForecastError::Transport { url: failed, .. } => assert_eq!(failed, &url),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("forecast unavailable"));
    }
}
