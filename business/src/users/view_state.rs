use std::fmt::{Display, Formatter};

use roster_states::State;
use thiserror::Error;
use ustr::Ustr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PageSize {
    Ten,
    #[default]
    Twenty,
    Fifty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unsupported page size {0}, expected 10, 20 or 50")]
pub struct UnsupportedPageSize(pub u32);

impl PageSize {
    pub const ALL: [Self; 3] = [Self::Ten, Self::Twenty, Self::Fifty];

    pub fn get(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = UnsupportedPageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(UnsupportedPageSize(value))
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[default]
    Email,
    CreatedAt,
    Role,
}

impl SortBy {
    pub const ALL: [Self; 3] = [Self::Email, Self::CreatedAt, Self::Role];

    /// Value sent as the `sortBy` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::CreatedAt => "createdAt",
            Self::Role => "role",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::CreatedAt => "Created",
            Self::Role => "Role",
        }
    }
}

/// Parameters of one list request. Two requests with equal params hit the same rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsersQueryParams {
    pub limit: u32,
    pub search: String,
    pub sort_by: SortBy,
    pub desc: bool,
}

impl Default for UsersQueryParams {
    fn default() -> Self {
        UsersViewState::default().query_params()
    }
}

impl UsersQueryParams {
    pub fn to_query(&self) -> [(&'static str, String); 4] {
        [
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
            ("sortBy", self.sort_by.as_param().to_owned()),
            ("desc", self.desc.to_string()),
        ]
    }
}

/// Local state of the users view. Dropped together with the view's context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersViewState {
    pub page_size: PageSize,
    pub search: String,
    pub sort_by: SortBy,
    pub desc: bool,
    /// May point at a row that is no longer listed; that row simply is not highlighted.
    pub selected_row_id: Option<Ustr>,
}

impl UsersViewState {
    pub fn query_params(&self) -> UsersQueryParams {
        UsersQueryParams {
            limit: self.page_size.get(),
            search: self.search.clone(),
            sort_by: self.sort_by,
            desc: self.desc,
        }
    }

    pub fn is_selected(&self, user_id: &str) -> bool {
        self.selected_row_id.is_some_and(|id| id.as_str() == user_id)
    }
}

impl State for UsersViewState {}

/// Last observed window focus, used to detect a focus regain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFocus {
    pub focused: Option<bool>,
}

impl ViewFocus {
    /// Records `focused` and reports whether it was a transition from unfocused to focused.
    pub fn observe(&mut self, focused: bool) -> bool {
        let regained = self.focused == Some(false) && focused;
        self.focused = Some(focused);
        regained
    }
}

impl State for ViewFocus {}
