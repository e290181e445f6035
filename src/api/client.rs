//! HTTP client for the scheduling service.
//!
//! Wraps the five remote operations (register, login, user info, schedule
//! generation, task-action logging) and normalizes failures into an error
//! taxonomy the screens can present: explicit rejections keep the
//! server-supplied detail, everything transport-shaped becomes `Network`.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::Task;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error types for API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Credentials or token rejected (401-class), or a registration
    /// rejection such as a taken username.
    #[error("{0}")]
    Auth(String),

    /// Schedule generation rejected by the service.
    #[error("{0}")]
    Schedule(String),

    /// Unreachable host, timeout, or a malformed response body.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A status the operation has no specific meaning for.
    #[error("unexpected response ({status}): {detail}")]
    Unexpected { status: StatusCode, detail: String },
}

/// Identity record returned by the user-info endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
}

/// Scheduling service client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into(), client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Create an account. Success has no body worth keeping.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(&Credentials { username, password })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = read_detail(response, "Username already registered").await;
        if status.is_client_error() {
            Err(ApiError::Auth(detail))
        } else {
            Err(ApiError::Unexpected { status, detail })
        }
    }

    /// Exchange credentials for an access token. The endpoint takes a
    /// form-encoded body, unlike the rest of the API.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .form(&Credentials { username, password })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response.json().await?;
            return Ok(token.access_token);
        }
        let detail = read_detail(response, "Incorrect username or password").await;
        if status.is_client_error() {
            Err(ApiError::Auth(detail))
        } else {
            Err(ApiError::Unexpected { status, detail })
        }
    }

    /// Fetch the identity record for a token.
    pub async fn user_info(&self, token: &str) -> ApiResult<UserInfo> {
        let response =
            self.client.get(self.url("/auth/userinfo")).bearer_auth(token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let detail = read_detail(response, "Could not validate credentials").await;
        if status.is_client_error() {
            Err(ApiError::Auth(detail))
        } else {
            Err(ApiError::Unexpected { status, detail })
        }
    }

    /// Generate an ordered schedule from free-text tasks and a time budget.
    ///
    /// Any rejection becomes `Schedule` with the server-supplied detail so
    /// the screen can show it next to a retry affordance.
    pub async fn generate_schedule(
        &self,
        token: &str,
        raw_tasks_text: &str,
        available_time_minutes: u32,
    ) -> ApiResult<Vec<Task>> {
        let request = ScheduleRequest {
            raw_tasks_text,
            available_time_minutes,
            must_do_tasks: &[],
        };

        let response = self
            .client
            .post(self.url("/personalized-schedule"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let body: ScheduleResponse = response.json().await?;
            return Ok(body.schedule);
        }
        let detail = read_detail(response, "Failed to generate schedule").await;
        Err(ApiError::Schedule(detail))
    }

    /// Record a traversal action against a task.
    ///
    /// Best-effort telemetry: call sites log failures and move on, they
    /// never block traversal on this.
    pub async fn log_task(
        &self,
        token: &str,
        user_id: i64,
        task: &Task,
        action: &str,
        extended_by: Option<u32>,
    ) -> ApiResult<()> {
        let request = LogTaskRequest { user_id, task, action, extended_by };

        let response = self
            .client
            .post(self.url("/log-task"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = read_detail(response, "Failed to log task action").await;
        Err(ApiError::Unexpected { status, detail })
    }
}

/// Pull the `detail` field out of an error body, if the server sent one.
async fn read_detail(response: reqwest::Response, fallback: &str) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody { detail: Some(detail) }) if !detail.is_empty() => detail,
        _ => fallback.to_string(),
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScheduleRequest<'a> {
    raw_tasks_text: &'a str,
    available_time_minutes: u32,
    // The service expects the field even though the client never fills it.
    must_do_tasks: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    schedule: Vec<Task>,
}

#[derive(Debug, Serialize)]
struct LogTaskRequest<'a> {
    user_id: i64,
    task: &'a Task,
    action: &'a str,
    extended_by: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_strips_trailing_slash() {
        let client =
            ApiClient::new("http://localhost:8000/", Duration::from_secs(10)).unwrap();
        assert_eq!(client.url("/auth/login"), "http://localhost:8000/auth/login");
    }

    #[test]
    fn test_schedule_request_always_sends_must_do_tasks() {
        let request = ScheduleRequest {
            raw_tasks_text: "Watch 3 videos, do 2 homework",
            available_time_minutes: 120,
            must_do_tasks: &[],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["raw_tasks_text"], "Watch 3 videos, do 2 homework");
        assert_eq!(json["available_time_minutes"], 120);
        assert_eq!(json["must_do_tasks"], serde_json::json!([]));
    }

    #[test]
    fn test_log_task_request_wire_shape() {
        let task = Task::new("t-1", "Read chapter 4", 25.0);
        let request = LogTaskRequest {
            user_id: 42,
            task: &task,
            action: "e",
            extended_by: Some(10),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["task"]["task_id"], "t-1");
        assert_eq!(json["action"], "e");
        assert_eq!(json["extended_by"], 10);
    }

    #[test]
    fn test_schedule_response_ignores_extra_fields() {
        let body = r#"{
            "available_time_minutes": 120,
            "parsed_tasks": [],
            "schedule": [
                {"task_id": "t-1", "description": "A", "duration": 30.0, "task_type": "reading"},
                {"task_id": "t-2", "description": "B", "duration": 20.5}
            ]
        }"#;
        let parsed: ScheduleResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.schedule.len(), 2);
        assert_eq!(parsed.schedule[0].id, "t-1");
        assert!((parsed.schedule[1].duration - 20.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_auth_error_displays_detail_verbatim() {
        let err = ApiError::Auth("Incorrect username or password".to_string());
        assert_eq!(err.to_string(), "Incorrect username or password");
    }

    #[test]
    fn test_unexpected_error_includes_status() {
        let err = ApiError::Unexpected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: "boom".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }
}
