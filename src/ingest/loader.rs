//! Documentation loader
//!
//! Fetches the pages of the selected components over HTTP. Pages that fail
//! to download are skipped with a warning so one broken link does not stop
//! indexing.

use crate::config::{AppConfig, Component};
use crate::errors::{AgentError, Result};
use crate::types::{Document, DocumentMetadata};
use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-page fetch timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Pages fetched concurrently
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Loads documentation pages for configured components
pub struct DocumentLoader {
    client: Client,
    components: Vec<Component>,
}

impl DocumentLoader {
    /// Create a loader over the configured components
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::with_components(config.components.clone())
    }

    /// Create a loader over an explicit component list
    pub fn with_components(components: Vec<Component>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(AgentError::HttpError)?;

        Ok(Self { client, components })
    }

    /// Resolve the requested component names
    ///
    /// `None` selects every configured component. Otherwise components come
    /// back in request order and all unknown names are reported together.
    pub fn select_components(&self, requested: Option<&[String]>) -> Result<Vec<Component>> {
        let Some(requested) = requested else {
            return Ok(self.components.clone());
        };

        let mut selected = Vec::new();
        let mut missing = Vec::new();
        for name in requested {
            match self.components.iter().find(|c| &c.name == name) {
                Some(component) => {
                    if !selected.iter().any(|c: &Component| &c.name == name) {
                        selected.push(component.clone());
                    }
                }
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(AgentError::UnknownComponents(missing));
        }

        Ok(selected)
    }

    /// Fetch every page of the selected components
    pub async fn load_documents(&self, requested: Option<&[String]>) -> Result<Vec<Document>> {
        let targets = self.select_components(requested)?;

        let jobs: Vec<(String, String)> = targets
            .iter()
            .flat_map(|c| c.urls.iter().map(move |url| (c.name.clone(), url.clone())))
            .collect();

        // `buffered` keeps configuration order while fetching in parallel
        let documents: Vec<Option<Document>> = stream::iter(jobs)
            .map(|(component, url)| async move { self.fetch(&url, &component).await })
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        Ok(documents.into_iter().flatten().collect())
    }

    async fn fetch(&self, url: &str, component: &str) -> Option<Document> {
        debug!("Fetching {} ({})", url, component);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {} ({})", url, e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {} ({})", url, e);
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(Document::new(body, DocumentMetadata::new(url, component))),
            Err(e) => {
                warn!("Failed to read body of {} ({})", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_components;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn loader() -> DocumentLoader {
        DocumentLoader::with_components(default_components()).unwrap()
    }

    #[test]
    fn test_select_all_when_none_requested() {
        let selected = loader().select_components(None).unwrap();
        let names: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["architecture", "planning", "perception"]);
    }

    #[test]
    fn test_select_subset_in_request_order() {
        let requested = vec!["perception".to_string(), "planning".to_string()];
        let selected = loader().select_components(Some(&requested)).unwrap();
        let names: Vec<&str> = selected.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["perception", "planning"]);
    }

    #[test]
    fn test_select_reports_all_unknown() {
        let requested = vec![
            "planning".to_string(),
            "control".to_string(),
            "localization".to_string(),
        ];
        let err = loader().select_components(Some(&requested)).unwrap_err();
        assert_eq!(err.to_string(), "Unknown components: control, localization");
    }

    #[test]
    fn test_select_empty_request_selects_nothing() {
        let selected = loader().select_components(Some(&[])).unwrap();
        assert!(selected.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_pages_are_skipped() {
        let loader = DocumentLoader::with_components(vec![Component::new(
            "local",
            vec!["http://127.0.0.1:9/unreachable".to_string()],
        )])
        .unwrap();
        let docs = loader.load_documents(None).await.unwrap();
        assert!(docs.is_empty());
    }

    /// Serves `/page/<delay_ms>` after that delay and 404 for anything else.
    /// Returns the base URL and the peak number of requests in flight.
    async fn serve_pages() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let peak_seen = peak.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let active = active.clone();
                let peak = peak_seen.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    let delay = path.strip_prefix("/page/").and_then(|d| d.parse::<u64>().ok());
                    if let Some(ms) = delay {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                    }
                    active.fetch_sub(1, Ordering::SeqCst);

                    let (status, body) = match delay {
                        Some(_) => ("200 OK", format!("content of {}", path)),
                        None => ("404 Not Found", "not found".to_string()),
                    };
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\
                         Connection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (base, peak)
    }

    #[tokio::test]
    async fn test_fetches_keep_configuration_order() {
        let (base, peak) = serve_pages().await;
        let url = |path: &str| format!("{}{}", base, path);
        let loader = DocumentLoader::with_components(vec![
            Component::new(
                "planning",
                vec![url("/page/300"), url("/missing"), url("/page/10")],
            ),
            Component::new(
                "perception",
                vec![url("/page/150"), url("/page/0"), url("/page/50"), url("/page/200")],
            ),
        ])
        .unwrap();

        let docs = loader.load_documents(None).await.unwrap();

        let sources: Vec<&str> = docs.iter().map(|d| d.metadata.source_url.as_str()).collect();
        let expected = [
            url("/page/300"),
            url("/page/10"),
            url("/page/150"),
            url("/page/0"),
            url("/page/50"),
            url("/page/200"),
        ];
        assert_eq!(sources, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(!sources.iter().any(|s| s.ends_with("/missing")));

        let components: Vec<&str> = docs.iter().map(|d| d.metadata.component.as_str()).collect();
        assert_eq!(
            components,
            vec!["planning", "planning", "perception", "perception", "perception", "perception"]
        );
        assert_eq!(docs[0].content, "content of /page/300");

        let peak = peak.load(Ordering::SeqCst);
        assert!(peak >= 2, "pages were fetched one at a time");
        assert!(peak <= MAX_CONCURRENT_FETCHES, "{} requests in flight", peak);
    }

    #[tokio::test]
    #[ignore] // Integration test - requires network access
    async fn test_fetch_default_components() {
        let docs = loader().load_documents(None).await.unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].metadata.component, "architecture");
    }
}
