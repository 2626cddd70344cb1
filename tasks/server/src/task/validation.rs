use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::task::TaskChanges;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Field level validation failures, keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the message recorded for `field`, if it failed validation.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Request body for POST /tasks.
///
/// Fields are kept as raw JSON so a value of the wrong type is reported against its field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Task title, 1-200 characters after trimming
    #[schema(value_type = Option<String>, example = "Buy milk")]
    pub title: Option<Value>,
    /// Optional description, up to 1000 characters
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    /// Initial status, `pending` when omitted
    #[schema(value_type = Option<TaskStatus>)]
    pub status: Option<Value>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = match string_field("title", self.title, &mut errors) {
            Field::Present(title) => check_title(&title, &mut errors),
            Field::Missing => {
                errors.add("title", "Title is required");
                None
            }
            Field::Invalid => None,
        };
        let description = match string_field("description", self.description, &mut errors) {
            Field::Present(description) => check_description(description, &mut errors),
            Field::Missing | Field::Invalid => None,
        };
        let status = match string_field("status", self.status, &mut errors) {
            Field::Present(status) => check_status(&status, &mut errors),
            Field::Missing => Some(TaskStatus::default()),
            Field::Invalid => None,
        };

        match (title, status) {
            (Some(title), Some(status)) => errors.into_result(NewTask {
                title,
                description,
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// Request body for PUT /tasks/{id}. Omitted fields are left unchanged.
///
/// An explicit `null` description clears it; `null` for `title` or `status` is the same as
/// omitting them.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    /// New title, 1-200 characters after trimming
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    /// New description; `null` removes the current one
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<Value>>,
    /// New status
    #[schema(value_type = Option<TaskStatus>)]
    pub status: Option<Value>,
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = match string_field("title", self.title, &mut errors) {
            Field::Present(title) => check_title(&title, &mut errors),
            Field::Missing | Field::Invalid => None,
        };
        let description = match self.description {
            None => None,
            Some(value) => match string_field("description", value, &mut errors) {
                Field::Present(description) => {
                    check_description(description, &mut errors).map(Some)
                }
                Field::Missing => Some(None),
                Field::Invalid => None,
            },
        };
        let status = match string_field("status", self.status, &mut errors) {
            Field::Present(status) => check_status(&status, &mut errors),
            Field::Missing | Field::Invalid => None,
        };

        errors.into_result(TaskChanges {
            title,
            description,
            status,
        })
    }
}

/// Maps a present field to `Some(value)`, so `null` becomes `Some(None)` while a missing
/// field falls back to `#[serde(default)]`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A string field as found in a request body.
enum Field {
    /// Omitted or `null`.
    Missing,
    /// Present with a non-string value; the error is already recorded.
    Invalid,
    Present(String),
}

fn string_field(name: &str, value: Option<Value>, errors: &mut ValidationErrors) -> Field {
    match value {
        None | Some(Value::Null) => Field::Missing,
        Some(Value::String(value)) => Field::Present(value),
        Some(_) => {
            errors.add(name, "Must be a string");
            Field::Invalid
        }
    }
}

fn check_title(title: &str, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = title.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        errors.add("title", "Title must not be empty");
        None
    } else if length > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("Title must be at most {TITLE_MAX_CHARS} characters"),
        );
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_description(description: String, errors: &mut ValidationErrors) -> Option<String> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.add(
            "description",
            format!("Description must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
        return None;
    }
    Some(description)
}

fn check_status(status: &str, errors: &mut ValidationErrors) -> Option<TaskStatus> {
    let parsed = TaskStatus::parse(status);
    if parsed.is_none() {
        errors.add(
            "status",
            format!("Must be one of: {}", TaskStatus::allowed_values()),
        );
    }
    parsed
}
