use std::time::Duration;

use roster_business::{
    BusinessConfig, Environment, PolicyState, RetryPolicy, build_state_ctx,
};
use roster_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
}

impl State {
    pub fn new(config: BusinessConfig, environment: Environment, policy: PolicyState) -> Self {
        Self {
            ctx: build_state_ctx(config, environment, policy),
        }
    }

    /// State pointed at a mock server, with near-instant retries.
    pub fn test(base_url: String) -> Self {
        Self::test_with_environment(base_url, Environment::default())
    }

    pub fn test_with_environment(base_url: String, environment: Environment) -> Self {
        Self::test_with(base_url, environment, PolicyState::default())
    }

    pub fn test_with(base_url: String, environment: Environment, policy: PolicyState) -> Self {
        let retry = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };
        let config = BusinessConfig::new(base_url).with_retry(retry);
        Self::new(config, environment, policy)
    }
}

impl Drop for State {
    fn drop(&mut self) {
        // The view is going away; in-flight requests must not outlive it.
        self.ctx.shutdown();
    }
}
