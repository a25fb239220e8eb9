//! Shareable link synchronisation.
//!
//! The link is a query string carrying three view state slices. It is
//! adopted once at startup and rewritten in place whenever one of those
//! slices changes.

use super::view::ViewStore;
use crate::issues::IssueField;
use log::*;
use std::fmt;
use url::form_urlencoded;

pub const ISSUE_ID_PARAM: &str = "issueId";
pub const SEARCH_PARAM: &str = "search";
pub const GROUP_BY_PARAM: &str = "groupBy";

/// Ordered query parameters.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    params: Vec<(String, String)>,
}

impl Link {
    /// Parse `?a=b&c=d` or `a=b&c=d`. Anything before a `?` is ignored, so a
    /// full URL works as well.
    ///
    pub fn parse(input: &str) -> Link {
        let query = match input.split_once('?') {
            Some((_, query)) => query,
            None => input,
        };
        Link {
            params: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a parameter, replacing every existing value for it.
    ///
    pub fn set(&mut self, name: &str, value: &str) {
        match self.params.iter().position(|(k, _)| k == name) {
            Some(index) => {
                self.params[index].1 = value.to_owned();
                let mut seen = false;
                self.params.retain(|(k, _)| {
                    if k != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.params.push((name.to_owned(), value.to_owned())),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.params.retain(|(k, _)| k != name);
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return Ok(());
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        write!(f, "?{}", query)
    }
}

/// Navigation entries. Synchronisation only ever replaces the current one.
///
#[derive(Debug)]
pub struct History {
    entries: Vec<Link>,
}

impl History {
    pub fn new(initial: Link) -> Self {
        History {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &Link {
        // `entries` is never empty.
        &self.entries[self.entries.len() - 1]
    }

    /// Overwrite the current entry without adding a new one.
    ///
    pub fn replace(&mut self, link: Link) {
        let last = self.entries.len() - 1;
        self.entries[last] = link;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps `issueId`, `search` and `groupBy` in step with the view store.
///
#[derive(Debug, Default)]
pub struct LinkSync {
    adopted: bool,
}

impl LinkSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt link values into the store. Only the first call has any effect;
    /// later edits to the link are not re-applied.
    ///
    pub fn adopt(&mut self, store: &mut ViewStore, link: &Link) {
        if self.adopted {
            return;
        }
        self.adopted = true;

        if let Some(identifier) = link.get(ISSUE_ID_PARAM).filter(|v| !v.is_empty()) {
            if store.open_issue_id() != Some(identifier) {
                debug!("Adopting issue {} from link.", identifier);
                store.set_open_issue_id(Some(identifier.to_owned()));
            }
        }
        if let Some(search) = link.get(SEARCH_PARAM).filter(|v| !v.is_empty()) {
            if store.search() != search {
                debug!("Adopting search '{}' from link.", search);
                store.set_search(search.to_owned());
            }
        }
        if let Some(name) = link.get(GROUP_BY_PARAM).filter(|v| !v.is_empty()) {
            match IssueField::from_name(name) {
                Some(field) if store.group_by() != Some(field) => {
                    debug!("Adopting group by '{}' from link.", name);
                    store.set_group_by(Some(field));
                }
                Some(_) => {}
                None => warn!("Ignoring unknown groupBy '{}' in link.", name),
            }
        }
    }

    /// Mirror the tracked slices into the current history entry. Absent or
    /// empty values remove their parameter; other parameters are kept.
    ///
    pub fn publish(&self, store: &ViewStore, history: &mut History) {
        let mut link = history.current().clone();
        match store.open_issue_id() {
            Some(identifier) => link.set(ISSUE_ID_PARAM, identifier),
            None => link.remove(ISSUE_ID_PARAM),
        }
        match store.search() {
            "" => link.remove(SEARCH_PARAM),
            search => link.set(SEARCH_PARAM, search),
        }
        match store.group_by() {
            Some(field) => link.set(GROUP_BY_PARAM, field.name()),
            None => link.remove(GROUP_BY_PARAM),
        }
        history.replace(link);
    }
}
