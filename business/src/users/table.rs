use std::hash::{DefaultHasher, Hash, Hasher};

use log::debug;
use roster_states::State;
use ustr::Ustr;

use crate::policy::{PolicyEngine, can_edit};
use crate::route::NavigationRequest;

use super::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Email,
    Role,
    Plan,
    Actions,
}

impl Column {
    pub const ALL: [Self; 4] = [Self::Email, Self::Role, Self::Plan, Self::Actions];

    pub fn title(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Role => "Role",
            Self::Plan => "Plan",
            Self::Actions => "Actions",
        }
    }
}

/// Everything one table row needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserRow {
    pub id: Ustr,
    pub email: String,
    pub detail_href: String,
    pub created_display: String,
    pub role_display: String,
    pub plan_display: String,
    pub selected: bool,
    pub can_edit: bool,
}

/// Rows in server order. No filtering, sorting or paging happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UserTableModel {
    pub rows: Vec<UserRow>,
}

impl UserTableModel {
    pub fn from_users(users: &[User], selected: Option<Ustr>, policy: &dyn PolicyEngine) -> Self {
        let rows = users
            .iter()
            .map(|user| UserRow {
                id: Ustr::from(&user.id),
                email: user.email.clone(),
                detail_href: NavigationRequest::user_detail_path(&user.id),
                created_display: user.created_display(),
                role_display: user.role.to_string(),
                plan_display: user.plan_display().to_owned(),
                selected: selected.is_some_and(|id| id.as_str() == user.id),
                can_edit: can_edit(policy, user),
            })
            .collect();
        Self { rows }
    }

    /// Logs one line per row. Meant for development builds only.
    pub fn log_diagnostics(&self) {
        for row in &self.rows {
            debug!(
                "row {} email={} role={} plan={} selected={} can_edit={}",
                row.id, row.email, row.role_display, row.plan_display, row.selected, row.can_edit
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Remembers which table model was last written to the diagnostics log, so a model that is
/// redrawn every frame is logged once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableDiagnostics {
    last_logged: Option<u64>,
}

impl TableDiagnostics {
    pub fn is_current(&self, model: &UserTableModel) -> bool {
        self.last_logged == Some(model.fingerprint())
    }

    /// Logs `model` unless it equals the last logged one. Returns whether it logged.
    pub fn log_if_changed(&mut self, model: &UserTableModel) -> bool {
        if self.is_current(model) {
            return false;
        }
        model.log_diagnostics();
        self.last_logged = Some(model.fingerprint());
        true
    }
}

impl State for TableDiagnostics {}
