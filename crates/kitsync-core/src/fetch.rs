//! Remote artifact retrieval
//!
//! Blocking HTTP fetch of each tracked artifact's serialized state. A
//! connection failure, timeout, or non-success status yields a transport
//! error; the engine treats the artifact's remote side as absent for the
//! rest of the run. No retries at this layer.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::ArtifactSpec;
use crate::{Error, Result};

/// Retrieval of the current serialized state of a tracked artifact.
pub trait Fetch {
    /// Fetch the raw serialized content of `spec` from the remote endpoint.
    fn fetch(&self, spec: &ArtifactSpec) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher against the serving endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Build a fetcher with an explicit per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, spec: &ArtifactSpec) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            spec.remote_path.trim_start_matches('/')
        )
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, spec: &ArtifactSpec) -> Result<Vec<u8>> {
        let url = self.url_for(spec);
        debug!(artifact = %spec.name, %url, "fetching remote artifact");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Error::Transport {
                artifact: spec.name.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                artifact: spec.name.clone(),
                message: format!("endpoint returned status {status}"),
            });
        }

        let body = response.bytes().map_err(|e| Error::Transport {
            artifact: spec.name.clone(),
            message: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_spec() -> ArtifactSpec {
        ArtifactSpec {
            name: "firstIAiditem".to_string(),
            remote_path: "download/firstIAiditem.json".to_string(),
            local_file: "firstIAiditem.json".to_string(),
            kind: ArtifactKind::ItemCatalog,
        }
    }

    // The fetcher is blocking, so it runs on a spawn_blocking thread while
    // the wiremock server lives on the test runtime.
    async fn fetch_from(server_uri: String) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || {
            let fetcher = HttpFetcher::new(server_uri, Duration::from_secs(5))?;
            fetcher.fetch(&catalog_spec())
        })
        .await
        .expect("fetch task panicked")
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download/firstIAiditem.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items": []}"#))
            .mount(&server)
            .await;

        let raw = fetch_from(server.uri()).await.unwrap();
        assert_eq!(raw, br#"{"items": []}"#);
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download/firstIAiditem.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        match fetch_from(server.uri()).await {
            Err(Error::Transport { artifact, message }) => {
                assert_eq!(artifact, "firstIAiditem");
                assert!(message.contains("500"), "message was: {message}");
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Nothing listens on this port once the server is dropped.
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        match fetch_from(uri).await {
            Err(Error::Transport { artifact, .. }) => assert_eq!(artifact, "firstIAiditem"),
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let fetcher =
            HttpFetcher::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            fetcher.url_for(&catalog_spec()),
            "http://localhost:8000/download/firstIAiditem.json"
        );
    }
}
