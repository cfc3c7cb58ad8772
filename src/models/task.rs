use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (database-assigned UUID).
    pub id: Uuid,
    /// What needs doing. Trimmed, never empty.
    pub description: String,
    /// Whether the task is done. Defaults to false.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    pub owner: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /tasks`.
///
/// A missing description, a non-boolean `completed`, or any unrecognized
/// field fails deserialization and the request is rejected with a 400.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub completed: Option<bool>,
}

/// Payload for `PATCH /tasks/{id}`. Only description and completed are
/// updatable; anything else is an invalid update.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Query parameters for `GET /tasks`.
///
/// `sortBy` takes the form `field:asc` or `field:desc`; the field is matched
/// against a whitelist of sortable columns in the repository layer.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by completion state.
    pub completed: Option<bool>,
    /// Maximum number of tasks to return.
    pub limit: Option<i64>,
    /// Number of tasks to skip (pagination offset).
    pub skip: Option<i64>,
    /// Sort specification, e.g. `createdAt:desc`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}
