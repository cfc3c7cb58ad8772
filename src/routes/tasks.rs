use crate::{
    auth::AuthSession,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    repo,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `description`: what needs doing (required, non-empty).
/// - `completed` (optional): defaults to false.
///
/// ## Responses:
/// - `201 Created`: the new task as JSON.
/// - `400 Bad Request`: empty/missing description, non-boolean `completed`,
///   or an unrecognized field.
/// - `404 Not Found`: missing or invalid authentication.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    input: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = repo::tasks::create(&pool, session.user.id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `completed` (optional): `true` returns only finished tasks, `false`
///   only unfinished ones.
/// - `limit` / `skip` (optional): pagination.
/// - `sortBy` (optional): `field:asc|desc`, e.g. `createdAt:desc`.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks, only ever the caller's own.
/// - `404 Not Found`: missing or invalid authentication.
/// - `500 Internal Server Error`: database failure.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    session: AuthSession,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = repo::tasks::list(&pool, session.user.id, &query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a specific task by its ID.
///
/// A task owned by a different user responds 404, exactly as if it did not
/// exist.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = repo::tasks::find(&pool, session.user.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates one of the authenticated user's tasks.
///
/// Only `description` and `completed` are updatable; any other key fails with
/// 400 and the stored task is left unchanged. Absence and foreign ownership
/// both respond 404.
#[patch("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
    input: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task =
        repo::tasks::update(&pool, session.user.id, task_id.into_inner(), input.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the authenticated user's tasks, responding with the
/// deleted record. Same ownership/absence policy as get and update.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    session: AuthSession,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = repo::tasks::delete(&pool, session.user.id, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}
