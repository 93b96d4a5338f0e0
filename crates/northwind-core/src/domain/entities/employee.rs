//! Employee transfer object.

use crate::EmployeeId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of `Employees`.
///
/// The employee's name, for by-name selects, is [`Employee::last_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Employee {
    /// Store-assigned identifier; ignored on insert.
    pub id: EmployeeId,

    #[validate(length(max = 20), custom(function = crate::validation::rules::not_blank))]
    pub last_name: String,

    #[validate(length(max = 10), custom(function = crate::validation::rules::not_blank))]
    pub first_name: String,

    #[validate(length(max = 30))]
    pub title: Option<String>,

    #[validate(length(max = 25))]
    pub title_of_courtesy: Option<String>,

    pub birth_date: Option<NaiveDateTime>,

    pub hire_date: Option<NaiveDateTime>,

    #[validate(length(max = 60))]
    pub address: Option<String>,

    #[validate(length(max = 15))]
    pub city: Option<String>,

    #[validate(length(max = 15))]
    pub region: Option<String>,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(max = 15))]
    pub country: Option<String>,

    #[validate(length(max = 24))]
    pub home_phone: Option<String>,

    #[validate(length(max = 4))]
    pub extension: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<u8>>,

    pub notes: Option<String>,

    /// Manager, if any.
    pub reports_to: Option<EmployeeId>,

    #[validate(length(max = 255))]
    pub photo_path: Option<String>,
}

impl Employee {
    /// Creates an employee that has not been stored yet.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: EmployeeId::default(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            title: None,
            title_of_courtesy: None,
            birth_date: None,
            hire_date: None,
            address: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
            home_phone: None,
            extension: None,
            photo: None,
            notes: None,
            reports_to: None,
            photo_path: None,
        }
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
