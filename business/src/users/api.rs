//! Calls against the users REST endpoints.

use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::http::{Client, HttpError};

use super::model::UsersPayload;
use super::view_state::UsersQueryParams;

/// Why the users list could not be loaded. Every variant shows the same text to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to load: server answered {0}")]
    Status(u16),
    #[error("Failed to load: {0}")]
    Network(String),
    #[error("Failed to load: invalid JSON body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        "Failed to load"
    }
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        Self::Network(err.to_string())
    }
}

/// `GET {api}/users` with the list parameters.
pub async fn list_users(
    api_url: &str,
    params: &UsersQueryParams,
    timeout: Duration,
) -> Result<UsersPayload, FetchError> {
    let response = Client::get(format!("{api_url}/users"))
        .query(params.to_query())
        .timeout(timeout)
        .send()
        .await?;

    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }

    let body: serde_json::Value = response
        .json()
        .map_err(|err| FetchError::Decode(err.to_string()))?;
    Ok(UsersPayload::from_value(body))
}

/// `{api}/users/{id}` with the id encoded as one path segment.
fn user_url(api_url: &str, user_id: &str) -> String {
    format!("{api_url}/users/{}", urlencoding::encode(user_id))
}

/// `POST {api}/users/{id}/refresh`. Only a 2xx answer counts as done.
pub async fn refresh_user(api_url: &str, user_id: &str, timeout: Duration) -> Result<(), FetchError> {
    let response = Client::post(format!("{}/refresh", user_url(api_url, user_id)))
        .timeout(timeout)
        .send()
        .await?;

    if response.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(response.status))
    }
}

/// `DELETE {api}/users/{id}`. The answer is not inspected beyond logging it.
pub async fn delete_user(api_url: &str, user_id: &str, timeout: Duration) -> Result<(), FetchError> {
    let response = Client::delete(user_url(api_url, user_id))
        .timeout(timeout)
        .send()
        .await?;
    debug!("DELETE user {user_id} answered {}", response.status);
    Ok(())
}
