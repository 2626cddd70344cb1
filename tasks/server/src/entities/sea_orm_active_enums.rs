use sea_orm::entity::prelude::*;
use sea_orm::{ActiveEnum, Iterable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a task.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl TaskStatus {
    /// Parses the wire/database spelling of a status.
    pub fn parse(value: &str) -> Option<Self> {
        Self::iter().find(|status| status.to_value() == value)
    }

    /// Comma separated list of every accepted status value.
    pub fn allowed_values() -> String {
        Self::iter()
            .map(|status| status.to_value())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
