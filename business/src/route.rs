//! Navigation requests emitted by the panel.
//!
//! The panel does not own routing. It records where the operator wants to go and the app
//! shell takes the request and opens it.

use roster_states::State;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationRequest {
    pending: Option<String>,
    /// Every path requested so far, oldest first.
    pub history: Vec<String>,
}

impl NavigationRequest {
    /// `/users/{id}`, with the id percent-encoded so it stays a single segment.
    pub fn user_detail_path(user_id: &str) -> String {
        format!("/users/{}", urlencoding::encode(user_id))
    }

    pub fn request(&mut self, path: String) {
        self.history.push(path.clone());
        self.pending = Some(path);
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl State for NavigationRequest {}
