//! Operator intents of the users view, applied to a [`StateCtx`].
//!
//! Widgets call these instead of poking states directly. Commands enqueued here are spawned
//! by the next `run_computed`/`flush_commands`, at the latest at the end of the frame.

use log::{debug, info};
use roster_states::StateCtx;
use ustr::Ustr;

use crate::BusinessConfig;
use crate::route::NavigationRequest;

use super::commands::{
    DebugDumpCommand, DebugDumpState, DeleteUserCommand, InvalidateUsersQueryCommand,
    RefreshUserCommand, ReloadUsersCommand, UsersActionInput,
};
use super::view_state::{PageSize, SortBy, UsersViewState, ViewFocus};

pub fn set_search(ctx: &mut StateCtx, search: String) {
    ctx.update::<UsersViewState>(|view| view.search = search);
}

pub fn set_sort_by(ctx: &mut StateCtx, sort_by: SortBy) {
    ctx.update::<UsersViewState>(|view| view.sort_by = sort_by);
}

pub fn set_desc(ctx: &mut StateCtx, desc: bool) {
    ctx.update::<UsersViewState>(|view| view.desc = desc);
}

pub fn set_page_size(ctx: &mut StateCtx, page_size: PageSize) {
    ctx.update::<UsersViewState>(|view| view.page_size = page_size);
}

pub fn select_row(ctx: &mut StateCtx, user_id: Ustr) {
    ctx.update::<UsersViewState>(|view| view.selected_row_id = Some(user_id));
}

/// Selects the row and asks for its detail page.
pub fn open_user(ctx: &mut StateCtx, user_id: Ustr) {
    select_row(ctx, user_id);
    let path = NavigationRequest::user_detail_path(&user_id);
    info!("Navigating to {path}");
    ctx.update::<NavigationRequest>(|nav| nav.request(path));
}

pub fn request_refresh(ctx: &mut StateCtx, user_id: Ustr) {
    ctx.update::<UsersActionInput>(|input| input.user_id = Some(user_id));
    ctx.enqueue_command::<RefreshUserCommand>();
}

pub fn request_delete(ctx: &mut StateCtx, user_id: Ustr) {
    ctx.update::<UsersActionInput>(|input| input.user_id = Some(user_id));
    ctx.enqueue_command::<DeleteUserCommand>();
}

pub fn reload_all(ctx: &mut StateCtx) {
    ctx.enqueue_command::<ReloadUsersCommand>();
}

pub fn open_debug_dump(ctx: &mut StateCtx) {
    ctx.enqueue_command::<DebugDumpCommand>();
}

pub fn close_debug_dump(ctx: &mut StateCtx) {
    ctx.update::<DebugDumpState>(DebugDumpState::close);
}

/// Feeds the current window focus. A regain invalidates the list when enabled in config.
pub fn observe_focus(ctx: &mut StateCtx, focused: bool) {
    let mut regained = false;
    ctx.update::<ViewFocus>(|focus| regained = focus.observe(focused));

    if regained && ctx.state::<BusinessConfig>().refetch_on_focus {
        debug!("Window focus regained, invalidating users query");
        ctx.enqueue_command::<InvalidateUsersQueryCommand>();
    }
}
