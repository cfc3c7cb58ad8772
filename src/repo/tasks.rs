//! Task repository.
//!
//! Every query here is scoped to the owning user: lookups filter on both the
//! task id and the owner, so a task belonging to someone else is
//! indistinguishable from one that does not exist. That masking is a
//! deliberate contract of the API, not an optimization.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskQuery, TaskUpdate};

const TASK_COLUMNS: &str = "id, description, completed, owner, created_at, updated_at";

/// Creates a task owned by the given user. `completed` defaults to false.
pub async fn create(pool: &PgPool, owner: Uuid, mut input: TaskInput) -> Result<Task, AppError> {
    input.description = input.description.trim().to_string();
    input.validate()?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (description, completed, owner) VALUES ($1, $2, $3) RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&input.description)
    .bind(input.completed.unwrap_or(false))
    .bind(owner)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists the user's tasks with optional completion filter, pagination, and
/// sort order.
///
/// The filter and pagination conditions are appended dynamically with
/// positional parameters; the sort column comes from a whitelist, never from
/// raw query input.
pub async fn list(pool: &PgPool, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
    let mut sql = format!("SELECT {} FROM tasks WHERE owner = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if query.completed.is_some() {
        sql.push_str(&format!(" AND completed = ${}", param_count));
        param_count += 1;
    }

    let (column, direction) = sort_order(query.sort_by.as_deref());
    sql.push_str(&format!(" ORDER BY {} {}", column, direction));

    if query.limit.is_some() {
        sql.push_str(&format!(" LIMIT ${}", param_count));
        param_count += 1;
    }
    if query.skip.is_some() {
        sql.push_str(&format!(" OFFSET ${}", param_count));
    }

    let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(owner);

    if let Some(completed) = query.completed {
        query_builder = query_builder.bind(completed);
    }
    if let Some(limit) = query.limit {
        query_builder = query_builder.bind(limit);
    }
    if let Some(skip) = query.skip {
        query_builder = query_builder.bind(skip);
    }

    let tasks = query_builder.fetch_all(pool).await?;
    Ok(tasks)
}

/// Fetches one of the user's tasks by id.
pub async fn find(pool: &PgPool, owner: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND owner = $2",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Applies a partial update to one of the user's tasks. Validation happens
/// before the update statement, so a rejected payload leaves the row
/// untouched.
pub async fn update(
    pool: &PgPool,
    owner: Uuid,
    task_id: Uuid,
    mut input: TaskUpdate,
) -> Result<Task, AppError> {
    input.description = input.description.map(|d| d.trim().to_string());
    input.validate()?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET description = COALESCE($1, description), \
             completed = COALESCE($2, completed), \
             updated_at = NOW() \
         WHERE id = $3 AND owner = $4 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&input.description)
    .bind(input.completed)
    .bind(task_id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Deletes one of the user's tasks, returning the deleted record.
pub async fn delete(pool: &PgPool, owner: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "DELETE FROM tasks WHERE id = $1 AND owner = $2 RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Resolves a `sortBy` query value (`field:asc|desc`) against the whitelist
/// of sortable columns. Anything unrecognized falls back to the default
/// order, creation time ascending.
fn sort_order(sort_by: Option<&str>) -> (&'static str, &'static str) {
    const DEFAULT: (&str, &str) = ("created_at", "ASC");

    let Some(raw) = sort_by else { return DEFAULT };
    let (field, dir) = raw.split_once(':').unwrap_or((raw, "asc"));

    let column = match field {
        "description" => "description",
        "completed" => "completed",
        "createdAt" | "created_at" => "created_at",
        "updatedAt" | "updated_at" => "updated_at",
        _ => return DEFAULT,
    };
    let direction = if dir.eq_ignore_ascii_case("desc") {
        "DESC"
    } else {
        "ASC"
    };

    (column, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_order_defaults() {
        assert_eq!(sort_order(None), ("created_at", "ASC"));
        assert_eq!(sort_order(Some("")), ("created_at", "ASC"));
    }

    #[test]
    fn test_sort_order_whitelist() {
        assert_eq!(sort_order(Some("createdAt:desc")), ("created_at", "DESC"));
        assert_eq!(sort_order(Some("created_at:desc")), ("created_at", "DESC"));
        assert_eq!(sort_order(Some("completed:asc")), ("completed", "ASC"));
        assert_eq!(sort_order(Some("description")), ("description", "ASC"));
        assert_eq!(sort_order(Some("updatedAt:DESC")), ("updated_at", "DESC"));
    }

    #[test]
    fn test_sort_order_rejects_unknown_fields() {
        // Anything not on the whitelist must never reach the SQL string.
        assert_eq!(sort_order(Some("owner:desc")), ("created_at", "ASC"));
        assert_eq!(
            sort_order(Some("evil; DROP TABLE tasks:asc")),
            ("created_at", "ASC")
        );
    }
}
