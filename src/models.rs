//! API-facing models for the template resource.
//!
//! Input models carry explicit `validate` functions that enumerate every
//! violated rule; the output model is re-checked when records come back from
//! the persistence layer, so a malformed row is caught at the boundary
//! instead of leaking to callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;
use crate::validation::{validators, Violation};

/// A stored template record as returned to API callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Check a record read back from persistence against the output schema.
    ///
    /// The field types are already enforced by the entity definition; the
    /// remaining runtime check is the email format.
    ///
    /// # Errors
    ///
    /// Returns a description of the schema violation. Callers treat this as
    /// an internal defect, not a caller error.
    pub fn parse(record: entity::Model) -> Result<Self, String> {
        if !validators::is_email(&record.email) {
            return Err(format!(
                "template {} failed output schema check: stored email is not a valid address",
                record.id
            ));
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            birth_date: record.birth_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Body of `POST /templates`. All fields mandatory.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateCreate {
    pub name: String,
    pub email: String,
    /// ISO calendar date, e.g. `1990-01-01`
    pub birth_date: String,
}

impl TemplateCreate {
    /// # Errors
    ///
    /// Returns every violated rule, one entry per violation.
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(Violation::new("Name is required", "NAME_REQUIRED"));
        } else if self.name.len() > 255 {
            violations.push(Violation::new(
                "Name cannot exceed 255 characters",
                "NAME_TOO_LONG",
            ));
        }

        if self.email.trim().is_empty() {
            violations.push(Violation::new("Email is required", "EMAIL_REQUIRED"));
        } else {
            if !validators::is_email(&self.email) {
                violations.push(Violation::new(
                    "Email must be a valid email address",
                    "EMAIL_INVALID",
                ));
            }
            if self.email.len() > 255 {
                violations.push(Violation::new(
                    "Email cannot exceed 255 characters",
                    "EMAIL_TOO_LONG",
                ));
            }
        }

        if self.birth_date.trim().is_empty() {
            violations.push(Violation::new(
                "Birth date is required",
                "BIRTH_DATE_REQUIRED",
            ));
        } else if !validators::is_date_string(&self.birth_date) {
            violations.push(Violation::new(
                "Birth date must be a valid date string",
                "BIRTH_DATE_INVALID",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Body of `PUT /templates/{id}`. Absent fields are left untouched; an
/// explicit `null` is rejected since every column is non-nullable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct TemplateUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub birth_date: Option<Option<String>>,
}

impl TemplateUpdate {
    /// # Errors
    ///
    /// Returns every violated rule. Supplied fields are held to the same
    /// format rules as on create, except that an empty `name` is permitted
    /// (only type and length are constrained there).
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        match &self.name {
            None => {}
            Some(None) => {
                violations.push(Violation::new("Name must not be null", "NAME_NULL"));
            }
            Some(Some(name)) => {
                if name.len() > 255 {
                    violations.push(Violation::new(
                        "Name cannot exceed 255 characters",
                        "NAME_TOO_LONG",
                    ));
                }
            }
        }

        match &self.email {
            None => {}
            Some(None) => {
                violations.push(Violation::new("Email must not be null", "EMAIL_NULL"));
            }
            Some(Some(email)) => {
                if !validators::is_email(email) {
                    violations.push(Violation::new(
                        "Email must be a valid email address",
                        "EMAIL_INVALID",
                    ));
                }
                if email.len() > 255 {
                    violations.push(Violation::new(
                        "Email cannot exceed 255 characters",
                        "EMAIL_TOO_LONG",
                    ));
                }
            }
        }

        match &self.birth_date {
            None => {}
            Some(None) => {
                violations.push(Violation::new(
                    "Birth date must not be null",
                    "BIRTH_DATE_NULL",
                ));
            }
            Some(Some(birth_date)) => {
                if !validators::is_date_string(birth_date) {
                    violations.push(Violation::new(
                        "Birth date must be a valid date string",
                        "BIRTH_DATE_INVALID",
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Body of `GET /templates/count`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}
