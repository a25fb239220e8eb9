//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that holds query results and UI state
//! - Persisted view state slices and their storage
//! - Shareable link synchronisation
//! - State error handling

mod error;
mod link;
mod navigation;
mod storage;
mod view;

pub use error::StateError;
pub use link::{History, Link, LinkSync, GROUP_BY_PARAM, ISSUE_ID_PARAM, SEARCH_PARAM};
pub use navigation::{Mode, Row, TablePage};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use view::{
    FilterCategory, Filters, Slice, SortDirection, ViewState, ViewStateUpdate, ViewStore,
    DEFAULT_PAGE_SIZE, PAGE_SIZES,
};

// State struct, methods and tests are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{State, GROUP_BY_CHOICES, SEARCH_DEBOUNCE, SORTABLE_FIELDS};
