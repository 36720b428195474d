//! Commands of the users view.
//!
//! UI code follows the usual pattern:
//! - set input via `ctx.update::<UsersActionInput>(...)` when the command needs a target
//! - enqueue or dispatch the command
//! - read the outcome via `ctx.cached::<UsersQueryCompute>()` on a later frame
//!
//! None of these commands cancel an older run of themselves. Two list fetches in flight
//! both settle, and the one finishing last owns the cache entry.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use roster_states::{CancellationToken, Command, CommandFuture, CommandSnapshot, State, Time, Updater};
use ustr::Ustr;

use crate::BusinessConfig;

use super::api::{self, FetchError};
use super::model::UsersPayload;
use super::query::UsersQueryCompute;
use super::view_state::{UsersQueryParams, UsersViewState};

/// Target of the next row action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersActionInput {
    pub user_id: Option<Ustr>,
}

impl State for UsersActionInput {}

/// Contents of the debug dump window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugDumpState {
    pub open: bool,
    pub text: String,
}

impl DebugDumpState {
    pub fn close(&mut self) {
        self.open = false;
    }
}

impl State for DebugDumpState {}

/// Loads the users list with the current view parameters, retrying failed attempts.
///
/// On success with exactly one row, that row becomes the selected row.
#[derive(Debug, Default)]
pub struct FetchUsersCommand;

impl Command for FetchUsersCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, cancel: CancellationToken) -> CommandFuture {
        let params = snap.state::<UsersViewState>().query_params();
        let config = snap.state::<BusinessConfig>().clone();
        let issued_at = *snap.state::<Time>().as_ref();

        Box::pin(async move {
            updater.update::<UsersQueryCompute>(UsersQueryCompute::begin_fetch);
            info!("Fetching users with {params:?}");

            let outcome = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Users fetch cancelled before it settled");
                    return;
                }
                outcome = fetch_with_retry(&config, &params) => outcome,
            };

            settle(&updater, outcome, params, issued_at);
        })
    }
}

fn settle(
    updater: &Updater,
    outcome: Result<UsersPayload, FetchError>,
    params: UsersQueryParams,
    issued_at: DateTime<Utc>,
) {
    match outcome {
        Ok(payload) => {
            info!("Users fetch settled with {} row(s)", payload.data.len());
            let only_row = payload.single_row_id().map(Ustr::from);
            updater.update::<UsersQueryCompute>(move |query| {
                query.settle_success(payload, params, issued_at);
            });
            if let Some(id) = only_row {
                debug!("Auto-selecting the only row {id}");
                updater.update::<UsersViewState>(move |view| view.selected_row_id = Some(id));
            }
        }
        Err(err) => {
            error!("Users fetch failed: {err}");
            updater.update::<UsersQueryCompute>(move |query| {
                query.settle_error(err, params, issued_at);
            });
        }
    }
}

async fn fetch_with_retry(
    config: &BusinessConfig,
    params: &UsersQueryParams,
) -> Result<UsersPayload, FetchError> {
    let api_url = config.api_url();
    let policy = config.retry;
    let mut attempt = 0;

    loop {
        match api::list_users(&api_url, params, config.request_timeout).await {
            Ok(payload) => return Ok(payload),
            Err(err) if attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                warn!(
                    "Users fetch attempt {attempt}/{} failed: {err}, retrying in {delay:?}",
                    policy.total_attempts()
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Marks the users entry stale and fetches it again in the background.
#[derive(Debug, Default)]
pub struct InvalidateUsersQueryCommand;

impl Command for InvalidateUsersQueryCommand {
    fn run(&self, _snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        Box::pin(async move {
            debug!("Invalidating users query");
            updater.update::<UsersQueryCompute>(UsersQueryCompute::mark_stale);
            updater.enqueue_command::<FetchUsersCommand>();
        })
    }
}

/// Operator-triggered reload of the whole list.
#[derive(Debug, Default)]
pub struct ReloadUsersCommand;

impl Command for ReloadUsersCommand {
    fn run(&self, _snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        Box::pin(async move {
            info!("Reloading users list");
            updater.enqueue_command::<InvalidateUsersQueryCommand>();
        })
    }
}

/// Asks the server to refresh one user, then reloads the list. Failures are only logged.
#[derive(Debug, Default)]
pub struct RefreshUserCommand;

impl Command for RefreshUserCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let target = snap.state::<UsersActionInput>().user_id;
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            let Some(user_id) = target else {
                warn!("Refresh requested without a target user");
                return;
            };

            match api::refresh_user(&config.api_url(), &user_id, config.request_timeout).await {
                Ok(()) => {
                    info!("Refreshed user {user_id}");
                    updater.enqueue_command::<InvalidateUsersQueryCommand>();
                }
                Err(err) => warn!("Refreshing user {user_id} failed: {err}"),
            }
        })
    }
}

/// Deletes one user. The list is left as it is until something else reloads it.
#[derive(Debug, Default)]
pub struct DeleteUserCommand;

impl Command for DeleteUserCommand {
    fn run(&self, snap: CommandSnapshot, _updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let target = snap.state::<UsersActionInput>().user_id;
        let config = snap.state::<BusinessConfig>().clone();

        Box::pin(async move {
            let Some(user_id) = target else {
                warn!("Delete requested without a target user");
                return;
            };

            match api::delete_user(&config.api_url(), &user_id, config.request_timeout).await {
                Ok(()) => info!("Sent delete for user {user_id}"),
                Err(err) => warn!("Deleting user {user_id} failed: {err}"),
            }
        })
    }
}

/// Opens the debug window with the current payload as pretty JSON.
#[derive(Debug, Default)]
pub struct DebugDumpCommand;

impl Command for DebugDumpCommand {
    fn run(&self, snap: CommandSnapshot, updater: Updater, _cancel: CancellationToken) -> CommandFuture {
        let text = snap.compute::<UsersQueryCompute>().debug_dump();

        Box::pin(async move {
            updater.set(DebugDumpState { open: true, text });
        })
    }
}
