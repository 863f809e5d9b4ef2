//! Shared types for the reminder service and its HTTP clients.

use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// A single reminder as persisted in the data file.
///
/// Fields missing from the stored JSON fall back to their zero value, so a
/// hand-edited data file with partial records still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub subject_title: String,
    pub content: String,
    pub image: String,
    pub is_active: bool,
    pub is_checked: bool,
    pub is_remove: bool,
    /// RFC3339 timestamp. Not validated on load.
    pub due_date: String,
    pub created_by: String,
    pub updated_by: String,
    pub created_date: String,
    pub updated_date: String,
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /reminder/searchByDate`.
///
/// Capitalised keys are accepted as well as the snake_case ones.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchByDateRequest {
    /// Month in `YYYY-MM` form.
    #[serde(alias = "Date", alias = "DATE")]
    pub date: String,
}

/// Body of `POST /reminder/update`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCheckedRequest {
    #[serde(alias = "ID", alias = "Id")]
    pub id: i64,
    #[serde(alias = "Is_checked", alias = "Is_Checked", alias = "IS_CHECKED")]
    pub is_checked: bool,
}

// =====================================================
// Response Envelope
// =====================================================

pub const CODE_OK: i32 = 0;
pub const CODE_ERR: i32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// An empty `Vec` result serializes as `[]`, never `null`.
    pub fn ok(result: T) -> Self {
        Self {
            code: CODE_OK,
            message: "success".to_string(),
            result: Some(result),
        }
    }

    /// Success envelope with no `result` field.
    pub fn done() -> Self {
        Self {
            code: CODE_OK,
            message: "success".to_string(),
            result: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_ERR,
            message: msg.into(),
            result: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}
