use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown in place of a missing plan.
pub const PLACEHOLDER: &str = "—";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
    /// Any role the panel does not know about, kept verbatim.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "admin" => Self::Admin,
            "editor" => Self::Editor,
            "viewer" => Self::Viewer,
            _ => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
    Other(String),
}

impl Plan {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Plan {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "free" => Self::Free,
            "pro" => Self::Pro,
            "enterprise" => Self::Enterprise,
            _ => Self::Other(raw),
        }
    }
}

impl From<Plan> for String {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    #[serde(default)]
    pub plan: Option<Plan>,
}

impl User {
    /// `created_at` as `YYYY-MM-DD HH:MM` in UTC, or the raw string when it does not parse.
    pub fn created_display(&self) -> String {
        format_timestamp(&self.created_at)
    }

    pub fn plan_display(&self) -> &str {
        self.plan.as_ref().map_or(PLACEHOLDER, Plan::as_str)
    }
}

pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d 00:00").to_string();
    }
    raw.to_owned()
}

/// Body of a successful list response.
///
/// `raw` is the body exactly as received. `data` holds the rows that decoded as [`User`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsersPayload {
    pub data: Vec<User>,
    pub raw: Value,
}

impl UsersPayload {
    pub fn from_value(raw: Value) -> Self {
        let data = match raw.get("data").and_then(Value::as_array) {
            Some(rows) => rows
                .iter()
                .enumerate()
                .filter_map(|(index, row)| match User::deserialize(row) {
                    Ok(user) => Some(user),
                    Err(err) => {
                        warn!("Skipping users row {index}: {err}");
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
        };
        Self { data, raw }
    }

    /// Id of the only row, if there is exactly one.
    pub fn single_row_id(&self) -> Option<&str> {
        match self.data.as_slice() {
            [only] => Some(&only.id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_role_and_plan_are_kept() {
        let user: User = serde_json::from_value(json!({
            "id": "u9",
            "email": "x@example.com",
            "role": "auditor",
            "createdAt": "2024-03-01T10:20:30Z",
            "plan": "trial"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Other("auditor".to_owned()));
        assert_eq!(user.role.to_string(), "auditor");
        assert_eq!(user.plan_display(), "trial");
    }

    #[test]
    fn null_and_missing_plan_show_placeholder() {
        let with_null: User = serde_json::from_value(json!({
            "id": "u1", "email": "a@example.com", "role": "admin",
            "createdAt": "2024-01-01T00:00:00Z", "plan": null
        }))
        .unwrap();
        let missing: User = serde_json::from_value(json!({
            "id": "u2", "email": "b@example.com", "role": "viewer",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(with_null.plan_display(), PLACEHOLDER);
        assert_eq!(missing.plan_display(), PLACEHOLDER);
        assert_eq!(with_null.role, Role::Admin);
    }

    #[test]
    fn role_serializes_back_to_its_string() {
        let value = serde_json::to_value(Role::Editor).unwrap();
        assert_eq!(value, json!("editor"));
    }

    #[test]
    fn timestamps_format_or_fall_back() {
        assert_eq!(format_timestamp("2024-03-01T10:20:30Z"), "2024-03-01 10:20");
        assert_eq!(
            format_timestamp("2024-03-01T10:20:30+02:00"),
            "2024-03-01 08:20"
        );
        assert_eq!(format_timestamp("2024-03-01T10:20:30.123"), "2024-03-01 10:20");
        assert_eq!(format_timestamp("2024-03-01"), "2024-03-01 00:00");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn payload_skips_bad_rows_and_keeps_raw() {
        let raw = json!({
            "data": [
                {"id": "u1", "email": "a@example.com", "role": "admin", "createdAt": "2024-01-01T00:00:00Z"},
                {"id": 42},
                {"id": "u2", "email": "b@example.com", "role": "viewer", "createdAt": "2024-01-02T00:00:00Z"}
            ],
            "total": 3
        });
        let payload = UsersPayload::from_value(raw.clone());

        let ids: Vec<&str> = payload.data.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["u1", "u2"]);
        assert_eq!(payload.raw, raw);
        assert_eq!(payload.single_row_id(), None);
    }

    #[test]
    fn payload_without_data_is_empty() {
        assert!(UsersPayload::from_value(json!({})).data.is_empty());
        assert!(UsersPayload::from_value(json!({"data": "nope"})).data.is_empty());
        assert!(UsersPayload::from_value(json!([1, 2])).data.is_empty());
    }

    #[test]
    fn single_row_id_only_for_exactly_one_row() {
        let one = UsersPayload::from_value(json!({"data": [
            {"id": "u1", "email": "a@example.com", "role": "admin", "createdAt": "2024-01-01"}
        ]}));
        assert_eq!(one.single_row_id(), Some("u1"));
        assert_eq!(UsersPayload::default().single_row_id(), None);
    }
}
