//! Users list: model, view state, the cached query and the row actions.

pub mod api;
pub mod commands;
pub mod controls;
pub mod model;
pub mod query;
pub mod table;
pub mod view_state;


use roster_states::StateCtx;

pub use api::FetchError;
pub use commands::{
    DebugDumpCommand, DebugDumpState, DeleteUserCommand, FetchUsersCommand,
    InvalidateUsersQueryCommand, RefreshUserCommand, ReloadUsersCommand, UsersActionInput,
};
pub use model::{PLACEHOLDER, Plan, Role, User, UsersPayload};
pub use query::{QueryState, USERS_QUERY_KEY, UsersQueryCompute, UsersQueryParamsCompute};
pub use table::{Column, TableDiagnostics, UserRow, UserTableModel};
pub use view_state::{PageSize, SortBy, UsersQueryParams, UsersViewState, ViewFocus};

/// Registers every state, compute and command of the users view.
///
/// `BusinessConfig`, `Environment`, `PolicyState` and `Time` are expected to be added by
/// the caller.
pub fn register(ctx: &mut StateCtx) {
    ctx.add_state(UsersViewState::default());
    ctx.add_state(ViewFocus::default());
    ctx.add_state(UsersActionInput::default());
    ctx.add_state(DebugDumpState::default());
    ctx.add_state(TableDiagnostics::default());
    ctx.add_state(crate::NavigationRequest::default());

    ctx.record_compute(UsersQueryCompute::default());
    ctx.record_compute(UsersQueryParamsCompute::default());

    ctx.record_command(FetchUsersCommand);
    ctx.record_command(InvalidateUsersQueryCommand);
    ctx.record_command(ReloadUsersCommand);
    ctx.record_command(RefreshUserCommand);
    ctx.record_command(DeleteUserCommand);
    ctx.record_command(DebugDumpCommand);
}
