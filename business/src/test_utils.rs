//! Test utilities for driving the users view against a mock server.
//!
//! # Example
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_list(vec![sample_user("u1", "admin")]).await;
//!
//! test_ctx.settle().await;
//!
//! let query = test_ctx.ctx.compute::<UsersQueryCompute>();
//! assert_eq!(query.users().map(<[User]>::len), Some(1));
//! ```

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{BusinessConfig, Environment, PolicyState, RetryPolicy, build_state_ctx};
use roster_states::StateCtx;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Retries quickly so failing tests do not wait on real backoff.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

pub fn sample_user(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "role": role,
        "createdAt": "2024-01-15T09:30:00Z",
        "plan": null
    })
}

pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    pub async fn with_config(adjust: impl FnOnce(BusinessConfig) -> BusinessConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock_server = MockServer::start().await;

        let config = adjust(BusinessConfig::new(mock_server.uri()).with_retry(fast_retry()));
        let ctx = build_state_ctx(config, Environment::default(), PolicyState::default());

        Self { mock_server, ctx }
    }

    /// Runs frames until no command is queued or in flight.
    pub async fn settle(&mut self) {
        let started = Instant::now();
        loop {
            self.ctx.run_computed();
            if self.ctx.task_count() == 0 && self.ctx.queued_commands() == 0 {
                self.ctx.run_all_dirty();
                self.ctx.sync_computes();
                if self.ctx.queued_commands() == 0 {
                    break;
                }
                continue;
            }

            let remaining = SETTLE_TIMEOUT
                .checked_sub(started.elapsed())
                .unwrap_or_default();
            tokio::time::timeout(remaining, self.ctx.join_next())
                .await
                .unwrap_or_else(|_| {
                    panic!(
                        "Timed out waiting for pending tasks ({} still running)",
                        self.ctx.task_count()
                    )
                });
        }
    }

    pub async fn mock_list(&self, rows: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": rows })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_list_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    /// Number of received requests with `method` on `path`.
    pub async fn count(&self, http_method: &str, request_path: &str) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.method.as_str() == http_method && req.url.path() == request_path)
            .count()
    }

    /// Raw path (plus query, if any) of every request with `http_method`, in arrival order.
    pub async fn received_targets(&self, http_method: &str) -> Vec<String> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.method.as_str() == http_method)
            .map(|req| match req.url.query() {
                Some(query) => format!("{}?{query}", req.url.path()),
                None => req.url.path().to_owned(),
            })
            .collect()
    }

    /// Query strings of every list request, in arrival order.
    pub async fn list_queries(&self) -> Vec<String> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.method.as_str() == "GET" && req.url.path() == "/api/users")
            .map(|req| req.url.query().unwrap_or_default().to_owned())
            .collect()
    }
}
