use crate::data::{DataClient, QueryState};
use crate::issues::IssueSource;
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FetchIssues,
    RefetchIssues,
    FetchIssue { identifier: String },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a, S> {
    state: &'a Arc<Mutex<State>>,
    client: &'a mut DataClient<S>,
}

impl<'a, S: IssueSource> Handler<'a, S> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, client: &'a mut DataClient<S>) -> Self {
        Handler { state, client }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::FetchIssues => self.issues().await?,
            Event::RefetchIssues => {
                self.client.invalidate_issues();
                self.issues().await?
            }
            Event::FetchIssue { identifier } => self.issue(identifier).await?,
        }
        Ok(())
    }

    /// Update state with the issue list.
    ///
    async fn issues(&mut self) -> Result<()> {
        info!("Fetching issues...");
        let result = self.client.issues().await;
        match &result {
            Ok(issues) => info!("Loaded {} issues.", issues.len()),
            Err(e) => error!("Failed to fetch issues: {}", e),
        }
        let mut state = self.state.lock().await;
        state.set_issues(QueryState::from_result(result));
        Ok(())
    }

    /// Update state with the detail of one issue.
    ///
    async fn issue(&mut self, identifier: String) -> Result<()> {
        info!("Fetching issue {}...", identifier);
        let result = self.client.issue(Some(&identifier)).await;
        if let Err(e) = &result {
            error!("Failed to fetch issue {}: {}", identifier, e);
        }
        let mut state = self.state.lock().await;
        state.set_issue_query(identifier, QueryState::from_result(result));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::tests::issue;
    use crate::issues::FixtureSource;
    use crate::logger::LogBuffer;
    use crate::state::{Link, MemoryStorage, ViewStore};
    use crate::ui::Theme;

    fn shared_state() -> Arc<Mutex<State>> {
        Arc::new(Mutex::new(State::new(
            ViewStore::load(Box::new(MemoryStorage::new())),
            Link::default(),
            None,
            LogBuffer::default(),
            Theme::default(),
            Theme::tokyo_night(),
        )))
    }

    #[tokio::test]
    async fn fetch_issues_populates_state() {
        let state = shared_state();
        let mut client = DataClient::new(FixtureSource::from_issues(vec![
            issue("ENG-1"),
            issue("ENG-2"),
        ]));
        let mut handler = Handler::new(&state, &mut client);
        handler.handle(Event::FetchIssues).await.unwrap();
        assert_eq!(state.lock().await.issues().len(), 2);
    }

    #[tokio::test]
    async fn fetch_issue_stores_result_for_open_issue() {
        let state = shared_state();
        state.lock().await.open_issue("ENG-2".to_string());
        let wanted = issue("ENG-2");
        let mut client = DataClient::new(FixtureSource::from_issues(vec![
            issue("ENG-1"),
            wanted.clone(),
        ]));
        let mut handler = Handler::new(&state, &mut client);
        handler
            .handle(Event::FetchIssue {
                identifier: "ENG-2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            state.lock().await.open_issue_query(),
            QueryState::Success(Some(wanted))
        );
    }

    #[tokio::test]
    async fn unreadable_issues_file_becomes_error_state() {
        let state = shared_state();
        let mut client = DataClient::new(FixtureSource::from_file(std::path::Path::new(
            "/nonexistent/issues.json",
        )));
        let mut handler = Handler::new(&state, &mut client);
        handler.handle(Event::FetchIssues).await.unwrap();
        assert!(matches!(
            state.lock().await.issues_query(),
            QueryState::Error(message) if message.contains("/nonexistent/issues.json")
        ));
    }

    #[tokio::test]
    async fn unknown_issue_is_absent_not_an_error() {
        let state = shared_state();
        state.lock().await.open_issue("ENG-404".to_string());
        let mut client = DataClient::new(FixtureSource::from_issues(vec![issue("ENG-1")]));
        let mut handler = Handler::new(&state, &mut client);
        handler
            .handle(Event::FetchIssue {
                identifier: "ENG-404".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            state.lock().await.open_issue_query(),
            QueryState::Success(None)
        );
    }
}
