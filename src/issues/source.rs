use super::{Issue, StoreError};
use log::*;
use rand::Rng;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const BUNDLED_FIXTURE: &str = include_str!("fixture.json");

/// Provides the ordered issue collection. Any provider returning the issue
/// schema satisfies the contract; fetches may fail.
///
#[allow(async_fn_in_trait)]
pub trait IssueSource {
    /// Return every issue in source order.
    ///
    async fn fetch_all(&self) -> Result<Vec<Issue>, StoreError>;

    /// Return the issue with the given identifier, or `None` if absent.
    ///
    async fn fetch_one(&self, identifier: &str) -> Result<Option<Issue>, StoreError> {
        Ok(self
            .fetch_all()
            .await?
            .into_iter()
            .find(|issue| issue.identifier == identifier))
    }
}

/// Decode a JSON array of issues, rejecting duplicate identifiers.
///
pub fn decode_issues(json: &str) -> Result<Vec<Issue>, StoreError> {
    let issues: Vec<Issue> = serde_json::from_str(json)?;
    ensure_unique(&issues)?;
    Ok(issues)
}

fn ensure_unique(issues: &[Issue]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for issue in issues {
        if !seen.insert(issue.identifier.as_str()) {
            return Err(StoreError::DuplicateIdentifier(issue.identifier.clone()));
        }
    }
    Ok(())
}

/// Where a fixture reads its issues from.
///
#[derive(Clone)]
enum Origin {
    Bundled,
    File(PathBuf),
    Memory(Arc<Vec<Issue>>),
}

/// Serves a static issue collection with simulated latency. Files are read
/// and decoded on every fetch, so a bad file surfaces as a failed query.
///
#[derive(Clone)]
pub struct FixtureSource {
    origin: Origin,
    latency: Duration,
    detail_latency: Duration,
}

impl FixtureSource {
    fn new(origin: Origin) -> Self {
        FixtureSource {
            origin,
            latency: Duration::ZERO,
            detail_latency: Duration::ZERO,
        }
    }

    /// Return a source over the fixture bundled with the binary.
    ///
    pub fn bundled() -> Self {
        Self::new(Origin::Bundled)
    }

    /// Return a source over a JSON issues file.
    ///
    pub fn from_file(path: &Path) -> Self {
        Self::new(Origin::File(path.to_path_buf()))
    }

    /// Return a source over the given issues with no latency.
    ///
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self::new(Origin::Memory(Arc::new(issues)))
    }

    /// Delay list fetches by `latency` and single-issue fetches by
    /// `detail_latency`, each with up to 10% jitter.
    ///
    pub fn with_latency(mut self, latency: Duration, detail_latency: Duration) -> Self {
        self.latency = latency;
        self.detail_latency = detail_latency;
        self
    }

    async fn load(&self) -> Result<Arc<Vec<Issue>>, StoreError> {
        match &self.origin {
            Origin::Bundled => Ok(Arc::new(decode_issues(BUNDLED_FIXTURE)?)),
            Origin::File(path) => {
                debug!("Reading issues from {}...", path.display());
                let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                    StoreError::ReadFailed {
                        path: path.clone(),
                        source: e,
                    }
                })?;
                Ok(Arc::new(decode_issues(&contents)?))
            }
            Origin::Memory(issues) => Ok(Arc::clone(issues)),
        }
    }

    async fn simulate(latency: Duration) {
        if latency.is_zero() {
            return;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=latency.as_millis() as u64 / 10);
        tokio::time::sleep(latency + Duration::from_millis(jitter_ms)).await;
    }
}

impl IssueSource for FixtureSource {
    async fn fetch_all(&self) -> Result<Vec<Issue>, StoreError> {
        Self::simulate(self.latency).await;
        Ok(self.load().await?.as_ref().clone())
    }

    async fn fetch_one(&self, identifier: &str) -> Result<Option<Issue>, StoreError> {
        Self::simulate(self.detail_latency).await;
        Ok(self
            .load()
            .await?
            .iter()
            .find(|issue| issue.identifier == identifier)
            .cloned())
    }
}

/// Fetches the issue collection as a JSON array from a URL.
///
pub struct HttpSource {
    url: String,
    http_client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> Self {
        HttpSource {
            url: url.to_owned(),
            http_client: reqwest::Client::new(),
        }
    }
}

impl IssueSource for HttpSource {
    async fn fetch_all(&self) -> Result<Vec<Issue>, StoreError> {
        debug!("Requesting issues from {}...", self.url);
        let response = self.http_client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }
        let issues: Vec<Issue> = response.json().await?;
        ensure_unique(&issues)?;
        Ok(issues)
    }
}

/// The source selected by configuration.
///
pub enum AnySource {
    Fixture(FixtureSource),
    Http(HttpSource),
}

impl IssueSource for AnySource {
    async fn fetch_all(&self) -> Result<Vec<Issue>, StoreError> {
        match self {
            AnySource::Fixture(source) => source.fetch_all().await,
            AnySource::Http(source) => source.fetch_all().await,
        }
    }

    async fn fetch_one(&self, identifier: &str) -> Result<Option<Issue>, StoreError> {
        match self {
            AnySource::Fixture(source) => source.fetch_one(identifier).await,
            AnySource::Http(source) => source.fetch_one(identifier).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::tests::issue;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn bundled_fixture_decodes() {
        let issues = FixtureSource::bundled().fetch_all().await.unwrap();
        assert!(!issues.is_empty());
        assert_eq!(issues[0].identifier, "ENG-1");
    }

    #[test]
    fn decode_rejects_duplicate_identifiers() {
        let issues = vec![issue("ENG-1"), issue("ENG-1")];
        let json = serde_json::to_string(&issues).unwrap();
        assert!(matches!(
            decode_issues(&json),
            Err(StoreError::DuplicateIdentifier(id)) if id == "ENG-1"
        ));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(matches!(
            decode_issues("{not json"),
            Err(StoreError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_fails_the_fetch() {
        let source = FixtureSource::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(
            source.fetch_all().await,
            Err(StoreError::ReadFailed { .. })
        ));
        assert!(matches!(
            source.fetch_one("ENG-1").await,
            Err(StoreError::ReadFailed { .. })
        ));
    }

    #[tokio::test]
    async fn file_is_reread_on_every_fetch() {
        let path = std::env::temp_dir().join(format!(
            "issue-dash-source-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, serde_json::to_string(&vec![issue("ENG-1")]).unwrap()).unwrap();
        let source = FixtureSource::from_file(&path);
        assert_eq!(source.fetch_all().await.unwrap().len(), 1);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            source.fetch_all().await,
            Err(StoreError::Deserialization(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn fixture_fetch_one_finds_by_identifier() {
        let source = FixtureSource::from_issues(vec![issue("ENG-1"), issue("ENG-2")]);
        let found = source.fetch_one("ENG-2").await.unwrap();
        assert_eq!(found.unwrap().identifier, "ENG-2");
        assert!(source.fetch_one("ENG-3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fixture_fetch_all_preserves_order() {
        let source = FixtureSource::from_issues(vec![issue("ENG-2"), issue("ENG-1")]);
        let ids: Vec<String> = source
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.identifier)
            .collect();
        assert_eq!(ids, vec!["ENG-2", "ENG-1"]);
    }

    #[tokio::test]
    async fn http_source_fetches_issues() {
        let server = MockServer::start_async().await;
        let issues = vec![issue("ENG-1"), issue("ENG-2")];
        let body = serde_json::to_value(&issues).unwrap();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/issues.json");
                then.status(200).json_body(body);
            })
            .await;

        let source = HttpSource::new(&server.url("/issues.json"));
        let fetched = source.fetch_all().await.unwrap();
        mock.assert_async().await;
        assert_eq!(fetched, issues);

        let one = source.fetch_one("ENG-2").await.unwrap();
        assert_eq!(one.map(|i| i.identifier), Some("ENG-2".to_string()));
    }

    #[tokio::test]
    async fn http_source_surfaces_status_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/issues.json");
                then.status(503);
            })
            .await;

        let source = HttpSource::new(&server.url("/issues.json"));
        let result = source.fetch_all().await;
        assert!(matches!(result, Err(StoreError::Status { status: 503 })));
    }
}
