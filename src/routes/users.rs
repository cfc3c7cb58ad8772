use std::io::Cursor;

use actix_multipart::Multipart;
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use image::{imageops::FilterType, ImageOutputFormat};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::{issue_token, revoke_all_tokens, revoke_token, AuthSession},
    email::Notifier,
    error::AppError,
    models::{LoginInput, SignupInput, UpdateUserInput},
    repo,
    routes::upload::read_upload,
};

/// Avatars are normalized to this square size before storage.
const AVATAR_DIMENSION: u32 = 250;

/// Creates a new user account.
///
/// ## Request Body:
/// `name`, `email`, `password`, and optionally `age`.
///
/// ## Responses:
/// - `201 Created`: `{"user": ..., "token": ...}`; the welcome email is
///   dispatched as a non-blocking side effect.
/// - `400 Bad Request`: validation failure or email already registered.
#[post("")]
pub async fn signup(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    input: web::Json<SignupInput>,
) -> Result<impl Responder, AppError> {
    let user = repo::users::create(&pool, input.into_inner()).await?;
    let token = issue_token(&pool, user.id).await?;

    notifier.send_welcome(&user.email, &user.name);

    Ok(HttpResponse::Created().json(json!({ "user": user, "token": token })))
}

/// Authenticates a user and opens a new session.
///
/// Each successful login appends a fresh token to the user's session list,
/// so concurrent sessions on multiple devices stay valid independently.
///
/// ## Responses:
/// - `200 OK`: `{"user": ..., "token": ...}`.
/// - `400 Bad Request`: unknown email or wrong password (indistinguishable).
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    input: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    let user = repo::users::find_by_credentials(&pool, &input.email, &input.password).await?;
    let token = issue_token(&pool, user.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "user": user, "token": token })))
}

/// Ends the current session: revokes exactly the token this request carried,
/// leaving other sessions untouched.
#[post("/logout")]
pub async fn logout(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    revoke_token(&pool, session.user.id, &session.token).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Ends every session of the authenticated user.
#[post("/logoutAll")]
pub async fn logout_all(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    revoke_all_tokens(&pool, session.user.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Returns the authenticated user's own profile.
#[get("/me")]
pub async fn me(session: AuthSession) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(session.user))
}

/// Applies a partial update to the authenticated user's profile.
///
/// Only `name`, `email`, `password`, and `age` are recognized; any other key
/// fails with 400. A supplied password is re-hashed before storage.
#[patch("/me")]
pub async fn update_me(
    pool: web::Data<PgPool>,
    session: AuthSession,
    input: web::Json<UpdateUserInput>,
) -> Result<impl Responder, AppError> {
    let user = repo::users::update(&pool, session.user.id, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Deletes the authenticated user's account.
///
/// All owned tasks and all session tokens are removed in the same
/// transaction; the cancellation email is dispatched as a non-blocking side
/// effect. Responds with the deleted user record.
#[delete("/me")]
pub async fn delete_me(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    repo::users::delete(&pool, session.user.id).await?;

    notifier.send_cancellation(&session.user.email, &session.user.name);

    Ok(HttpResponse::Ok().json(session.user))
}

/// Stores the authenticated user's avatar.
///
/// Accepts a multipart field named `avatar` with a `.jpg`/`.jpeg`/`.png`
/// filename, at most 1,000,000 bytes. The image is decoded and normalized to
/// a 250x250 PNG before storage, so whatever comes in, one canonical format
/// goes out.
#[post("/me/avatar")]
pub async fn upload_avatar(
    pool: web::Data<PgPool>,
    session: AuthSession,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let data = read_upload(
        payload,
        "avatar",
        &["jpg", "jpeg", "png"],
        "Please upload an image",
    )
    .await?;

    let normalized = image::load_from_memory(&data)?.resize_to_fill(
        AVATAR_DIMENSION,
        AVATAR_DIMENSION,
        FilterType::Lanczos3,
    );
    let mut buffer = Cursor::new(Vec::new());
    normalized.write_to(&mut buffer, ImageOutputFormat::Png)?;

    repo::users::set_avatar(&pool, session.user.id, buffer.into_inner()).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Removes the authenticated user's avatar.
#[delete("/me/avatar")]
pub async fn delete_avatar(
    pool: web::Data<PgPool>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    repo::users::clear_avatar(&pool, session.user.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Serves a user's avatar publicly.
///
/// ## Responses:
/// - `200 OK`: PNG bytes.
/// - `404 Not Found`: unknown user, or no avatar set.
#[get("/{id}/avatar")]
pub async fn get_avatar(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let avatar = repo::users::get_avatar(&pool, user_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Avatar not found".into()))?;

    Ok(HttpResponse::Ok().content_type("image/png").body(avatar))
}
