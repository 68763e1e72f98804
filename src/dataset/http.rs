//! HTTP dataset source: `GET {base}/{year}.json`.

use crate::dataset::source::{parse_year_body, DatasetSource, YearOutcome};
use crate::error::{ChronicleError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const USER_AGENT: &str = concat!("incident-chronicle/", env!("CARGO_PKG_VERSION"));

/// Retrieves per-year chunks from a static file host
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url`; `timeout` bounds each request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ChronicleError::invalid_argument(format!(
                "dataset URL must be http(s): {}",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ChronicleError::http("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resource URL for one year's chunk
    pub fn year_url(&self, year: u16) -> String {
        format!("{}/{}.json", self.base_url, year)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch_year(&self, year: u16) -> YearOutcome {
        let url = self.year_url(year);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return YearOutcome::Missing,
            Err(err) => return YearOutcome::Failed(format!("request to {} failed: {}", url, err)),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return YearOutcome::Missing;
        }
        if !status.is_success() {
            return YearOutcome::Failed(format!("{} returned {}", url, status));
        }

        // Static hosts commonly answer unknown paths with an HTML fallback page
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !is_json_content_type(content_type) {
                return YearOutcome::Malformed(format!(
                    "{} served content type {}",
                    url, content_type
                ));
            }
        }

        match response.bytes().await {
            Ok(body) => parse_year_body(&body),
            Err(err) if err.is_timeout() => YearOutcome::Missing,
            Err(err) => YearOutcome::Failed(format!("reading {} failed: {}", url, err)),
        }
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json") || mime == "text/json"
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const RECORDS: &str = r#"[{"id":"inc-2013-1","date":"2013-04-02","organization":"Port Authority",
        "sector":"Transportation","incidentType":"Ransomware","severity":"High"}]"#;

    fn canned_response(path: &str) -> (&'static str, &'static str, &'static str) {
        match path {
            "/data/2010.json" => ("404 Not Found", "text/plain", "not found"),
            // Static hosts answer unknown paths with their index page
            "/data/2011.json" => ("200 OK", "text/html; charset=utf-8", "<!doctype html><html></html>"),
            "/data/2012.json" => ("500 Internal Server Error", "text/plain", "boom"),
            "/data/2013.json" => ("200 OK", "application/json", RECORDS),
            "/data/2014.json" => ("200 OK", "application/json", "[{\"id\": "),
            _ => ("404 Not Found", "text/plain", ""),
        }
    }

    async fn answer(mut stream: TcpStream) {
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&chunk[..n]),
            }
        }
        let head = String::from_utf8_lossy(&request);
        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

        if path == "/data/2016.json" {
            // Never answers within the client deadline
            tokio::time::sleep(Duration::from_secs(5)).await;
        }

        let (status, content_type, body) = canned_response(&path);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }

    /// Serve canned per-year responses on an ephemeral port; returns the base URL
    async fn canned_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(answer(stream));
            }
        });
        format!("http://{}/data", addr)
    }

    #[tokio::test]
    async fn test_fetch_year_outcomes() {
        let base = canned_server().await;
        let source = HttpSource::new(base, Duration::from_millis(500)).unwrap();

        let fetch = |year| {
            let source = source.clone();
            async move {
                tokio::time::timeout(Duration::from_secs(5), source.fetch_year(year))
                    .await
                    .expect("fetch did not finish")
            }
        };

        assert_eq!(fetch(2010).await, YearOutcome::Missing);
        assert!(matches!(fetch(2011).await, YearOutcome::Malformed(cause) if cause.contains("text/html")));
        assert!(matches!(fetch(2012).await, YearOutcome::Failed(cause) if cause.contains("500")));
        assert!(matches!(fetch(2014).await, YearOutcome::Malformed(_)));

        match fetch(2013).await {
            YearOutcome::Loaded(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].id, "inc-2013-1");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_timeout_is_missing() {
        let base = canned_server().await;
        let source = HttpSource::new(base, Duration::from_millis(100)).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(3), source.fetch_year(2016))
            .await
            .expect("client deadline was not applied");
        assert_eq!(outcome, YearOutcome::Missing);
    }

    #[test]
    fn test_year_url_joins_base() {
        let source = HttpSource::new("https://example.org/data/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.year_url(2010), "https://example.org/data/2010.json");
        assert_eq!(source.describe(), "https://example.org/data");
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let err = HttpSource::new("ftp://example.org", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ChronicleError::InvalidArgument { .. }));
    }

    #[test]
    fn test_content_type_detection() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(is_json_content_type("application/vnd.api+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type("text/plain"));
    }
}
