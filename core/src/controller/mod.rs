//! View controllers.
//!
//! # Design
//! Each controller owns its view state and moves through
//! `Idle → Loading → Ready | Errored`. Loads take `&mut self`, so at most one
//! load per controller is in flight and a late response can never overwrite
//! the result of a newer request.

mod detail;
mod list;

pub use detail::DetailController;
pub use list::{sort_rows, ListController};

use crate::error::ApiError;

/// Lifecycle of one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Errored(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

/// User-facing text for `err`, or `fallback` when the error carries none.
fn user_message(err: &ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
