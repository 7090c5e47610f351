//! Gateway client for the university management REST API.
//!
//! Every console screen goes through [`ApiClient`]: a thin wrapper around
//! `reqwest` that attaches the session's bearer token, prefixes the base URL,
//! and maps backend rejections into a typed [`ApiError`].

pub mod types;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use types::{
    BatchOption, DashboardStats, DepartmentOption, DetailBody, LoginRequest, LoginResponse,
    NewStudent, NewTeacher, Student, StudentPatch, Teacher, TeacherPatch,
};

/// Failure modes of a gateway call, mapped from HTTP status and transport
/// errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required or token rejected")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server rejected the request ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to decode server response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid bearer token format")]
    InvalidToken,
}

impl ApiError {
    /// Message suitable for showing to the user after a rejected mutation:
    /// the server's own detail when it sent one, a generic line otherwise.
    pub fn surface_message(&self) -> String {
        match self {
            ApiError::Server { detail, .. } if !detail.trim().is_empty() => detail.clone(),
            ApiError::Unauthorized => "Authentication required. Run `uniadmin login`.".to_string(),
            ApiError::NotFound(what) => format!("Not found: {what}"),
            _ => "Operation failed. Please try again.".to_string(),
        }
    }
}

pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Build a client for the given base URL. When a token is present it is
    /// sent as a `Bearer` credential on every request.
    pub fn new(base_url: &str, timeout: Duration, token: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token)
                    .parse()
                    .map_err(|_| ApiError::InvalidToken)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<DetailBody>(&body)
                .map(|d| d.detail)
                .unwrap_or(body);
            if status == StatusCode::NOT_FOUND {
                return Err(ApiError::NotFound(detail));
            }
            return Err(ApiError::Server {
                status: status.as_u16(),
                detail,
            });
        }
        response.json().await.map_err(ApiError::Decode)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await?;
        Self::handle(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle(response).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::handle(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.client.delete(self.url(path)).send().await?;
        // Delete endpoints answer with a {"detail": ...} body we don't need.
        let _: serde_json::Value = Self::handle(response).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.post(
            "/users/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/users/dashboard_stats", &[]).await
    }

    // ------------------------------------------------------------------
    // Reference data
    // ------------------------------------------------------------------

    pub async fn departments_dropdown(&self) -> Result<Vec<DepartmentOption>, ApiError> {
        self.get("/departments/dropdown", &[]).await
    }

    pub async fn batches_dropdown(&self, department_id: i64) -> Result<Vec<BatchOption>, ApiError> {
        self.get(
            "/batches/dropdown",
            &[("department_id", department_id.to_string())],
        )
        .await
    }

    pub async fn class_roll_numbers(
        &self,
        department_id: i64,
        batch_id: i64,
    ) -> Result<Vec<String>, ApiError> {
        self.get(
            "/students/class_roll_numbers",
            &[
                ("department_id", department_id.to_string()),
                ("batch_id", batch_id.to_string()),
            ],
        )
        .await
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    pub async fn search_students(
        &self,
        department_id: i64,
        batch_id: i64,
        roll_number: Option<&str>,
    ) -> Result<Vec<Student>, ApiError> {
        let mut query = vec![
            ("department_id", department_id.to_string()),
            ("batch_id", batch_id.to_string()),
        ];
        if let Some(roll) = roll_number {
            query.push(("roll_number", roll.to_string()));
        }
        self.get("/students/", &query).await
    }

    pub async fn get_student(&self, roll_number: &str) -> Result<Student, ApiError> {
        self.get(&format!("/students/get/{roll_number}"), &[]).await
    }

    pub async fn create_student(&self, student: &NewStudent) -> Result<Student, ApiError> {
        self.post("/students/create", student).await
    }

    pub async fn update_student(
        &self,
        roll_number: &str,
        patch: &StudentPatch,
    ) -> Result<Student, ApiError> {
        self.put(&format!("/students/update/{roll_number}"), patch)
            .await
    }

    pub async fn delete_student(&self, roll_number: &str) -> Result<(), ApiError> {
        self.delete(&format!("/students/delete/{roll_number}"))
            .await
    }

    // ------------------------------------------------------------------
    // Teachers
    // ------------------------------------------------------------------

    pub async fn get_all_teachers(&self) -> Result<Vec<Teacher>, ApiError> {
        self.get("/teachers/get_all", &[]).await
    }

    pub async fn get_teacher(&self, email: &str) -> Result<Teacher, ApiError> {
        self.get(&format!("/teachers/get/{email}"), &[]).await
    }

    pub async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher, ApiError> {
        self.post("/teachers/create", teacher).await
    }

    pub async fn update_teacher(
        &self,
        email: &str,
        patch: &TeacherPatch,
    ) -> Result<Teacher, ApiError> {
        self.put(&format!("/teachers/update/{email}"), patch).await
    }

    pub async fn delete_teacher(&self, email: &str) -> Result<(), ApiError> {
        self.delete(&format!("/teachers/delete/{email}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            ApiClient::new("http://localhost:8000/", Duration::from_secs(5), None).unwrap();
        assert_eq!(client.url("/users/login"), "http://localhost:8000/users/login");
    }

    #[test]
    fn token_with_control_characters_is_rejected() {
        let result = ApiClient::new(
            "http://localhost:8000",
            Duration::from_secs(5),
            Some("bad\ntoken"),
        );
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn surface_message_prefers_server_detail() {
        let err = ApiError::Server {
            status: 409,
            detail: "Roll number already exists".to_string(),
        };
        assert_eq!(err.surface_message(), "Roll number already exists");

        let err = ApiError::Server {
            status: 500,
            detail: "  ".to_string(),
        };
        assert_eq!(err.surface_message(), "Operation failed. Please try again.");
    }
}
