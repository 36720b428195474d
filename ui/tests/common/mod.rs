use std::time::Duration;

use egui_kittest::Harness;
use kittest::Queryable;
use roster_business::{Environment, PolicyState};
use roster_ui::RosterApp;
use roster_ui::state::State;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, RosterApp>,
}

impl<'a> TestCtx<'a> {
    /// App backed by a mock server answering the list endpoint with `rows`.
    pub async fn with_users(rows: Vec<Value>) -> Self {
        Self::with_response(ResponseTemplate::new(200).set_body_json(list_body(rows))).await
    }

    pub async fn with_response(response: ResponseTemplate) -> Self {
        Self::with_response_and_environment(response, Environment::default()).await
    }

    pub async fn with_response_and_environment(
        response: ResponseTemplate,
        environment: Environment,
    ) -> Self {
        Self::with_setup(response, environment, PolicyState::default()).await
    }

    /// App answering the list endpoint with `rows`, gated by `policy`.
    #[allow(unused)]
    pub async fn with_users_and_policy(rows: Vec<Value>, policy: PolicyState) -> Self {
        let response = ResponseTemplate::new(200).set_body_json(list_body(rows));
        Self::with_setup(response, Environment::default(), policy).await
    }

    async fn with_setup(
        response: ResponseTemplate,
        environment: Environment,
        policy: PolicyState,
    ) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        let state = State::test_with(mock_server.uri(), environment, policy);
        let app = RosterApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, RosterApp> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, RosterApp> {
        &self.harness
    }

    /// Steps frames until `label` appears or the attempts run out.
    pub async fn wait_for_label(&mut self, label: &str) -> bool {
        for _ in 0..50 {
            self.harness.step();
            if self.harness.query_by_label_contains(label).is_some() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    /// Steps frames until no command is running.
    #[allow(unused)]
    pub async fn settle(&mut self) {
        for _ in 0..50 {
            self.harness.step();
            if self.harness.state().state().ctx.task_count() == 0 {
                self.harness.step();
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Query strings of every list request the mock server received, in order.
    pub async fn list_queries(&self) -> Vec<String> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|req| req.method.as_str() == "GET" && req.url.path() == "/api/users")
            .map(|req| req.url.query().unwrap_or_default().to_owned())
            .collect()
    }
}

pub fn list_body(rows: Vec<Value>) -> Value {
    let total = rows.len();
    json!({ "data": rows, "total": total })
}

pub fn user(id: &str, role: &str, plan: Option<&str>) -> Value {
    json!({
        "id": id,
        "email": format!("{id}@example.com"),
        "role": role,
        "createdAt": "2024-01-15T09:30:00Z",
        "plan": plan
    })
}
