//! Create/edit drafts for students and teachers.
//!
//! A form is a bag of string fields the console fills in interactively. It
//! owns the draft until the screen either submits it successfully or the user
//! abandons it; a rejected submission leaves the draft untouched so nothing
//! has to be re-entered. Validation is required-field presence plus the
//! parsing needed to build the typed payload - nothing more.

use chrono::NaiveDate;
use thiserror::Error;

use crate::api::types::{
    NewStudent, NewTeacher, Student, StudentPatch, Teacher, TeacherPatch,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} is not valid: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

fn require(field: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FormError> {
    let raw = require(field, value)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| FormError::Invalid {
        field,
        reason: format!("expected YYYY-MM-DD, got \"{raw}\""),
    })
}

fn parse_id(field: &'static str, value: &str) -> Result<i64, FormError> {
    let raw = require(field, value)?;
    raw.parse().map_err(|_| FormError::Invalid {
        field,
        reason: format!("expected a numeric id, got \"{raw}\""),
    })
}

// ----------------------------------------------------------------------
// Student form
// ----------------------------------------------------------------------

/// Normalized outcome of a validated student draft.
#[derive(Debug, Clone)]
pub enum StudentPayload {
    Create(NewStudent),
    Update {
        roll_number: String,
        patch: StudentPatch,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    mode: Option<String>, // Some(roll_number) in edit mode
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub roll_number: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub date_of_birth: String,
    pub address: String,
    pub department_id: String,
    pub batch_id: String,
}

impl StudentForm {
    /// Blank draft for a new student.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing record. The password is write-only
    /// and always starts blank; roll number and email are locked.
    pub fn from_record(student: &Student) -> Self {
        Self {
            mode: Some(student.roll_number.clone()),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            father_name: student.father_name.clone(),
            mother_name: student.mother_name.clone(),
            roll_number: student.roll_number.clone(),
            email: student.email.clone().unwrap_or_default(),
            password: String::new(),
            phone_number: student.phone_number.clone(),
            date_of_birth: student.date_of_birth.format(DATE_FORMAT).to_string(),
            address: student.address.clone(),
            department_id: student.department_id.to_string(),
            batch_id: student.batch_id.to_string(),
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.mode.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    /// Natural-key fields are frozen once the record exists.
    pub fn key_locked(&self) -> bool {
        self.mode.is_some()
    }

    /// Check required fields and produce the typed payload. No network
    /// activity happens here; a violation never leaves the client.
    pub fn validate(&self) -> Result<StudentPayload, FormError> {
        let first_name = require("first name", &self.first_name)?;
        let last_name = require("last name", &self.last_name)?;
        let father_name = require("father's name", &self.father_name)?;
        let mother_name = require("mother's name", &self.mother_name)?;
        let date_of_birth = parse_date("date of birth", &self.date_of_birth)?;
        let phone_number = require("phone number", &self.phone_number)?;
        let address = require("address", &self.address)?;
        let department_id = parse_id("department", &self.department_id)?;
        let batch_id = parse_id("batch", &self.batch_id)?;

        match &self.mode {
            None => {
                let roll_number = require("roll number", &self.roll_number)?;
                let email = require("email", &self.email)?;
                // Only a brand-new account needs a password.
                let password = require("password", &self.password)?;
                Ok(StudentPayload::Create(NewStudent {
                    first_name,
                    last_name,
                    father_name,
                    mother_name,
                    roll_number,
                    batch_id,
                    department_id,
                    date_of_birth,
                    address,
                    phone_number,
                    email,
                    password,
                }))
            }
            Some(original_roll) => Ok(StudentPayload::Update {
                roll_number: original_roll.clone(),
                patch: StudentPatch {
                    first_name,
                    last_name,
                    father_name,
                    mother_name,
                    // The locked field travels through unchanged.
                    roll_number: original_roll.clone(),
                    batch_id,
                    department_id,
                    date_of_birth,
                    address,
                    phone_number,
                },
            }),
        }
    }
}

// ----------------------------------------------------------------------
// Teacher form
// ----------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TeacherPayload {
    Create(NewTeacher),
    Update { email: String, patch: TeacherPatch },
}

#[derive(Debug, Clone, Default)]
pub struct TeacherForm {
    mode: Option<String>, // Some(email) in edit mode
    pub first_name: String,
    pub last_name: String,
    pub hire_date: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub address: String,
}

impl TeacherForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(teacher: &Teacher, email: &str) -> Self {
        Self {
            mode: Some(email.to_string()),
            first_name: teacher.first_name.clone().unwrap_or_default(),
            last_name: teacher.last_name.clone().unwrap_or_default(),
            hire_date: teacher
                .hire_date
                .map(|d| d.date().format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            email: email.to_string(),
            password: String::new(),
            phone_number: teacher.phone_number.clone().unwrap_or_default(),
            address: teacher.address.clone().unwrap_or_default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.mode.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn key_locked(&self) -> bool {
        self.mode.is_some()
    }

    pub fn validate(&self) -> Result<TeacherPayload, FormError> {
        let first_name = require("first name", &self.first_name)?;
        let last_name = require("last name", &self.last_name)?;
        let hire_date = parse_date("hire date", &self.hire_date)?;
        let phone_number = require("phone number", &self.phone_number)?;
        let address = require("address", &self.address)?;

        match &self.mode {
            None => {
                let email = require("email", &self.email)?;
                let password = require("password", &self.password)?;
                Ok(TeacherPayload::Create(NewTeacher {
                    first_name,
                    last_name,
                    hire_date,
                    email,
                    password,
                    address,
                    phone_number,
                }))
            }
            Some(original_email) => Ok(TeacherPayload::Update {
                email: original_email.clone(),
                patch: TeacherPatch {
                    first_name,
                    last_name,
                    hire_date,
                    address,
                    phone_number,
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_student() -> Student {
        serde_json::from_str(
            r#"{
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
                "email": "ana@uni.edu"
            }"#,
        )
        .unwrap()
    }

    fn filled_create_form() -> StudentForm {
        StudentForm {
            first_name: "Ana".into(),
            last_name: "Khan".into(),
            father_name: "Omar".into(),
            mother_name: "Sara".into(),
            roll_number: "CS-2024-001".into(),
            email: "ana@uni.edu".into(),
            password: "secret".into(),
            phone_number: "0300-1234567".into(),
            date_of_birth: "2002-05-17".into(),
            address: "12 College Road".into(),
            department_id: "1".into(),
            batch_id: "3".into(),
            ..StudentForm::new()
        }
    }

    #[test]
    fn edit_prepopulates_everything_except_password() {
        let form = StudentForm::from_record(&sample_student());
        assert_eq!(form.mode(), FormMode::Edit);
        assert!(form.key_locked());
        assert_eq!(form.first_name, "Ana");
        assert_eq!(form.roll_number, "CS-2024-001");
        assert_eq!(form.email, "ana@uni.edu");
        assert_eq!(form.date_of_birth, "2002-05-17");
        assert_eq!(form.password, "");
    }

    #[test]
    fn create_without_password_fails_locally() {
        let mut form = filled_create_form();
        form.password.clear();
        assert!(matches!(form.validate(), Err(FormError::Missing("password"))));
    }

    #[test]
    fn edit_without_password_is_fine() {
        let form = StudentForm::from_record(&sample_student());
        match form.validate().unwrap() {
            StudentPayload::Update { roll_number, patch } => {
                assert_eq!(roll_number, "CS-2024-001");
                assert_eq!(patch.phone_number, "0300-1234567");
            }
            StudentPayload::Create(_) => panic!("expected an update payload"),
        }
    }

    #[test]
    fn locked_roll_number_travels_through_unchanged() {
        let mut form = StudentForm::from_record(&sample_student());
        form.phone_number = "0399-0000000".into();
        match form.validate().unwrap() {
            StudentPayload::Update { roll_number, patch } => {
                assert_eq!(roll_number, "CS-2024-001");
                assert_eq!(patch.roll_number, "CS-2024-001");
                assert_eq!(patch.phone_number, "0399-0000000");
            }
            StudentPayload::Create(_) => panic!("expected an update payload"),
        }
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let mut form = filled_create_form();
        form.mother_name = "   ".into();
        match form.validate() {
            Err(FormError::Missing(field)) => assert_eq!(field, "mother's name"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_date_is_reported_with_the_value() {
        let mut form = filled_create_form();
        form.date_of_birth = "17/05/2002".into();
        match form.validate() {
            Err(FormError::Invalid { field, reason }) => {
                assert_eq!(field, "date of birth");
                assert!(reason.contains("17/05/2002"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn teacher_create_requires_password_and_email() {
        let mut form = TeacherForm {
            first_name: "Lena".into(),
            last_name: "Ortiz".into(),
            hire_date: "2021-09-01".into(),
            email: "lena@uni.edu".into(),
            password: "secret".into(),
            phone_number: "0301-7654321".into(),
            address: "Faculty Block B".into(),
            ..TeacherForm::new()
        };
        assert!(matches!(
            form.validate().unwrap(),
            TeacherPayload::Create(_)
        ));

        form.password.clear();
        assert!(matches!(form.validate(), Err(FormError::Missing("password"))));
    }

    #[test]
    fn teacher_edit_keeps_original_email() {
        let teacher: Teacher =
            serde_json::from_str(r#"{"first_name": "Lena", "last_name": "Ortiz"}"#).unwrap();
        let mut form = TeacherForm::from_record(&teacher, "lena@uni.edu");
        form.hire_date = "2021-09-01".into();
        form.phone_number = "0301-7654321".into();
        form.address = "Faculty Block B".into();

        match form.validate().unwrap() {
            TeacherPayload::Update { email, .. } => assert_eq!(email, "lena@uni.edu"),
            TeacherPayload::Create(_) => panic!("expected an update payload"),
        }
    }
}
