//! Permission checks for row actions.
//!
//! The panel asks a [`PolicyEngine`] before enabling an action. The engine is stored in the
//! context as [`PolicyState`] so it can be swapped at startup or in tests.

use std::fmt::Debug;
use std::sync::Arc;

use roster_states::State;

use crate::users::{Role, User};

pub trait PolicyEngine: Debug + Send + Sync {
    fn can(&self, action: &str, subject: &str) -> bool;
}

/// Grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PolicyEngine for AllowAll {
    fn can(&self, _action: &str, _subject: &str) -> bool {
        true
    }
}

/// Grants nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl PolicyEngine for DenyAll {
    fn can(&self, _action: &str, _subject: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct PolicyState {
    engine: Arc<dyn PolicyEngine>,
}

impl Default for PolicyState {
    fn default() -> Self {
        Self::new(AllowAll)
    }
}

impl PolicyState {
    pub fn new(engine: impl PolicyEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &dyn PolicyEngine {
        self.engine.as_ref()
    }
}

impl State for PolicyState {}

/// Whether the row actions of `user` are enabled.
///
/// Admin rows need the `manage all` grant, every other role is always editable.
pub fn can_edit(policy: &dyn PolicyEngine, user: &User) -> bool {
    policy.can("manage", "all") || user.role != Role::Admin
}
