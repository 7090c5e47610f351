//! Wire types for the university management API.
//!
//! Field names mirror the backend's JSON exactly (snake_case throughout).
//! Response types tolerate absent fields where the backend marks them
//! optional; request payloads carry exactly the fields the corresponding
//! endpoint accepts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account role carried in the login response and the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
    Teacher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for `POST /users/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user_token: String,
    pub user_role: UserRole,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `GET /users/dashboard_stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub total_students: u64,
    pub total_teachers: u64,
    pub total_users: u64,
}

/// One entry of `GET /departments/dropdown`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentOption {
    pub department_id: i64,
    pub department_name: String,
}

/// One entry of `GET /batches/dropdown`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOption {
    pub batch_id: i64,
    pub batch_name: String,
    pub department_id: i64,
}

/// Department sub-record embedded in a student response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentRef {
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub department_name: Option<String>,
    #[serde(default)]
    pub department_code: Option<String>,
}

/// A student record as returned by the students endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Student {
    pub student_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub roll_number: String,
    pub batch_id: i64,
    pub department_id: i64,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub phone_number: String,
    // Not part of the declared response model on every backend version.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_ref()
            .and_then(|d| d.department_name.as_deref())
    }
}

/// Body for `POST /students/create`. Password is write-only and never echoed
/// back by the server.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub roll_number: String,
    pub batch_id: i64,
    pub department_id: i64,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
}

/// Body for `PUT /students/update/{roll_number}`. Email and password are
/// immutable/write-only respectively and are not part of the update contract.
#[derive(Debug, Clone, Serialize)]
pub struct StudentPatch {
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub roll_number: String,
    pub batch_id: i64,
    pub department_id: i64,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub phone_number: String,
}

/// A teacher record as returned by the teachers endpoints. The backend marks
/// every field optional; the console falls back to placeholders when
/// rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct Teacher {
    #[serde(default)]
    pub teacher_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hire_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or("-"),
            self.last_name.as_deref().unwrap_or("-")
        )
    }
}

/// Body for `POST /teachers/create`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTeacher {
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone_number: String,
}

/// Body for `PUT /teachers/update/{email}`.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherPatch {
    pub first_name: String,
    pub last_name: String,
    pub hire_date: NaiveDate,
    pub address: String,
    pub phone_number: String,
}

/// Error envelope used by the backend for rejections: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub struct DetailBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_decodes() {
        let body = r#"{
            "message": "Login successful",
            "user_name": "Site Admin",
            "email": "admin@uni.edu",
            "user_role": "admin",
            "user_token": "abc123"
        }"#;
        let resp: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.user_token, "abc123");
        assert_eq!(resp.user_role, UserRole::Admin);
        assert_eq!(resp.user_name.as_deref(), Some("Site Admin"));
    }

    #[test]
    fn student_decodes_without_optional_fields() {
        let body = r#"{
            "student_id": 7,
            "user_id": 12,
            "first_name": "Ana",
            "last_name": "Khan",
            "father_name": "Omar",
            "mother_name": "Sara",
            "roll_number": "CS-2024-001",
            "batch_id": 3,
            "department_id": 1,
            "date_of_birth": "2002-05-17",
            "address": "12 College Road",
            "phone_number": "0300-1234567"
        }"#;
        let student: Student = serde_json::from_str(body).unwrap();
        assert_eq!(student.roll_number, "CS-2024-001");
        assert_eq!(student.full_name(), "Ana Khan");
        assert!(student.email.is_none());
        assert!(student.department_name().is_none());
    }

    #[test]
    fn student_decodes_with_embedded_department() {
        let body = r#"{
            "student_id": 7,
            "first_name": "Ana",
            "last_name": "Khan",
            "father_name": "Omar",
            "mother_name": "Sara",
            "roll_number": "CS-2024-001",
            "batch_id": 3,
            "department_id": 1,
            "date_of_birth": "2002-05-17",
            "address": "12 College Road",
            "phone_number": "0300-1234567",
            "department": {"department_id": 1, "department_name": "Computer Science"}
        }"#;
        let student: Student = serde_json::from_str(body).unwrap();
        assert_eq!(student.department_name(), Some("Computer Science"));
    }

    #[test]
    fn teacher_tolerates_sparse_records() {
        let teacher: Teacher = serde_json::from_str(r#"{"teacher_id": 4}"#).unwrap();
        assert_eq!(teacher.full_name(), "- -");
        assert!(teacher.email.is_none());
    }

    #[test]
    fn new_teacher_serializes_date_as_iso() {
        let payload = NewTeacher {
            first_name: "Lena".into(),
            last_name: "Ortiz".into(),
            hire_date: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
            email: "lena@uni.edu".into(),
            password: "secret".into(),
            address: "Faculty Block B".into(),
            phone_number: "0301-7654321".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["hire_date"], "2021-09-01");
    }
}
