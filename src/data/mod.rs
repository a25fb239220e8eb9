//! Data access layer.
//!
//! Wraps an `IssueSource` with a query cache and exposes the two reads the
//! dashboard needs. Failures stay inside this boundary: the network handler
//! turns them into `QueryState::Error` for the UI.

mod cache;

pub use cache::{CacheLookup, QueryCache, QueryKey};

use crate::issues::{Issue, IssueSource, StoreError};
use log::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a fetched result is served without revalidation.
pub const STALE_TIME: Duration = Duration::from_secs(5 * 60);
/// How long the issue list stays cached after its last use.
pub const ISSUES_GC_TIME: Duration = Duration::from_secs(10 * 60);
/// How long a single issue stays cached after its last use.
pub const ISSUE_GC_TIME: Duration = Duration::from_secs(5 * 60);

/// Result of a query as seen by the UI.
///
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    /// The query is disabled, e.g. no issue is open.
    Idle,
    Loading,
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Convert a fetch result into the state shown to consumers.
    ///
    pub fn from_result(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => QueryState::Success(data),
            Err(e) => QueryState::Error(e.to_string()),
        }
    }
}

/// Cached, asynchronous reads over an issue source.
///
pub struct DataClient<S> {
    source: S,
    issues: QueryCache<Arc<Vec<Issue>>>,
    details: QueryCache<Option<Issue>>,
}

impl<S: IssueSource> DataClient<S> {
    pub fn new(source: S) -> Self {
        DataClient {
            source,
            issues: QueryCache::new(STALE_TIME, ISSUES_GC_TIME),
            details: QueryCache::new(STALE_TIME, ISSUE_GC_TIME),
        }
    }

    /// Return every issue, from cache while fresh.
    ///
    pub async fn issues(&mut self) -> Result<Arc<Vec<Issue>>, StoreError> {
        let now = Instant::now();
        self.collect_garbage(now);
        match self.issues.lookup(&QueryKey::Issues, now) {
            CacheLookup::Fresh(issues) => {
                debug!("Serving {} issues from cache.", issues.len());
                return Ok(issues);
            }
            CacheLookup::Stale(_) => debug!("Cached issues are stale, revalidating..."),
            CacheLookup::Miss => debug!("No cached issues, fetching..."),
        }
        let issues = Arc::new(self.source.fetch_all().await?);
        self.issues
            .insert(QueryKey::Issues, Arc::clone(&issues), Instant::now());
        Ok(issues)
    }

    /// Return the issue with the given identifier. A `None` identifier is the
    /// disabled state: nothing is fetched and nothing is cached.
    ///
    pub async fn issue(&mut self, identifier: Option<&str>) -> Result<Option<Issue>, StoreError> {
        let Some(identifier) = identifier else {
            return Ok(None);
        };
        let now = Instant::now();
        self.collect_garbage(now);
        let key = QueryKey::Issue(identifier.to_owned());
        if let CacheLookup::Fresh(issue) = self.details.lookup(&key, now) {
            debug!("Serving issue {} from cache.", identifier);
            return Ok(issue);
        }
        let issue = self.source.fetch_one(identifier).await?;
        if issue.is_none() {
            info!("Issue {} not found.", identifier);
        }
        self.details.insert(key, issue.clone(), Instant::now());
        Ok(issue)
    }

    /// Drop the cached issue list so the next read refetches it.
    ///
    pub fn invalidate_issues(&mut self) {
        self.issues.remove(&QueryKey::Issues);
    }

    fn collect_garbage(&mut self, now: Instant) {
        let evicted = self.issues.collect_garbage(now) + self.details.collect_garbage(now);
        if evicted > 0 {
            debug!("Evicted {} unused cache entries.", evicted);
        }
    }
}
