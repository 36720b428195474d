//! Business layer of the roster admin panel: the users list, its cached query, row actions,
//! configuration and the HTTP client they share.

mod config;
mod env;
pub mod http;
pub mod policy;
mod route;
pub mod users;

#[cfg(test)]
mod test_utils;

pub use config::{BusinessConfig, RetryPolicy, load_from_env};
pub use env::Environment;
pub use policy::{AllowAll, DenyAll, PolicyEngine, PolicyState};
pub use route::NavigationRequest;

use roster_states::{StateCtx, Time};

/// Builds a context with the users view wired to `config`.
pub fn build_state_ctx(config: BusinessConfig, environment: Environment, policy: PolicyState) -> StateCtx {
    let mut ctx = StateCtx::new();
    ctx.add_state(config);
    ctx.add_state(environment);
    ctx.add_state(policy);
    ctx.add_state(Time::default());
    users::register(&mut ctx);
    ctx
}
