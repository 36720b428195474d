//! The users list cache entry and the effect that keeps it in step with the view.
//!
//! There is one entry for the whole view, keyed [`USERS_QUERY_KEY`]. Whatever parameters
//! were used, the response that settles last owns the entry. Readers can check
//! [`UsersQueryCompute::settled_params`] to see which request produced the rows.

use std::any::TypeId;

use chrono::{DateTime, Utc};
use log::debug;
use roster_states::{Compute, ComputeDeps, Dep, State, Updater};

use super::api::FetchError;
use super::commands::{FetchUsersCommand, InvalidateUsersQueryCommand};
use super::model::{User, UsersPayload};
use super::view_state::{UsersQueryParams, UsersViewState};

pub const USERS_QUERY_KEY: &str = "users";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Success(UsersPayload),
    Error(FetchError),
}

/// Cache entry for the users list, written only by the query commands.
#[derive(Debug, Clone, Default)]
pub struct UsersQueryCompute {
    pub state: QueryState,
    pub stale: bool,
    pub settled_params: Option<UsersQueryParams>,
    /// Issue time of the request that settled the entry.
    pub requested_at: Option<DateTime<Utc>>,
    /// How many times the entry was invalidated.
    pub invalidations: u64,
    fetches_in_flight: u32,
    /// Last good payload, kept while the entry shows an error.
    previous: Option<UsersPayload>,
}

impl UsersQueryCompute {
    pub fn key(&self) -> &'static str {
        USERS_QUERY_KEY
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }

    /// A request is in flight, including background revalidation of shown rows.
    pub fn is_fetching(&self) -> bool {
        self.fetches_in_flight > 0
    }

    pub fn users(&self) -> Option<&[User]> {
        match &self.state {
            QueryState::Success(payload) => Some(payload.data.as_slice()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&UsersPayload> {
        match &self.state {
            QueryState::Success(payload) => Some(payload),
            _ => self.previous.as_ref(),
        }
    }

    fn has_shown_data(&self) -> bool {
        self.payload().is_some()
    }

    /// Pretty JSON of the current payload, `null` when nothing has loaded yet.
    pub fn debug_dump(&self) -> String {
        let value = self
            .payload()
            .map_or(serde_json::Value::Null, |payload| payload.raw.clone());
        serde_json::to_string_pretty(&value).unwrap_or_else(|err| format!("<{err}>"))
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
        self.invalidations += 1;
    }

    pub fn begin_fetch(&mut self) {
        self.fetches_in_flight += 1;
        if !self.has_shown_data() {
            self.state = QueryState::Loading;
        }
    }

    pub fn settle_success(
        &mut self,
        payload: UsersPayload,
        params: UsersQueryParams,
        at: DateTime<Utc>,
    ) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        self.previous = None;
        self.state = QueryState::Success(payload);
        self.finish(params, at);
    }

    pub fn settle_error(&mut self, err: FetchError, params: UsersQueryParams, at: DateTime<Utc>) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        if let QueryState::Success(payload) = std::mem::take(&mut self.state) {
            self.previous = Some(payload);
        }
        self.state = QueryState::Error(err);
        self.finish(params, at);
    }

    fn finish(&mut self, params: UsersQueryParams, at: DateTime<Utc>) {
        self.stale = false;
        self.settled_params = Some(params);
        self.requested_at = Some(at);
    }
}

impl State for UsersQueryCompute {}

impl Compute for UsersQueryCompute {
    fn deps(&self) -> ComputeDeps {
        Vec::new()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // Network work happens in commands only.
    }
}

/// Derives the request parameters from the view and invalidates the list when they change.
///
/// The first run issues the initial fetch. Each later run with different parameters
/// enqueues exactly one [`InvalidateUsersQueryCommand`].
#[derive(Debug, Clone, Default)]
pub struct UsersQueryParamsCompute {
    pub params: Option<UsersQueryParams>,
}

impl State for UsersQueryParamsCompute {}

impl Compute for UsersQueryParamsCompute {
    fn deps(&self) -> ComputeDeps {
        vec![TypeId::of::<UsersViewState>()]
    }

    fn compute(&self, deps: Dep<'_>, updater: Updater) {
        let next = deps.get_state_ref::<UsersViewState>().query_params();

        match &self.params {
            None => {
                debug!("Initial users query with {next:?}");
                updater.set(Self { params: Some(next) });
                updater.enqueue_command::<FetchUsersCommand>();
            }
            Some(current) if *current != next => {
                debug!("Users query params changed to {next:?}");
                updater.set(Self { params: Some(next) });
                updater.enqueue_command::<InvalidateUsersQueryCommand>();
            }
            Some(_) => {}
        }
    }
}
