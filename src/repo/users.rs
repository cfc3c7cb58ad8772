//! User repository.
//!
//! Every write runs the same explicit pipeline: validate the input, apply the
//! canonical transforms (trim name, trim + lowercase email, hash password),
//! persist, and cascade where the operation requires it. Nothing here happens
//! through hidden hooks; handlers call these functions and get the whole
//! pipeline.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{SignupInput, UpdateUserInput, User};

const USER_COLUMNS: &str = "id, name, email, password, age, created_at, updated_at";

/// Creates a new user account. Validation happens before any database work;
/// a duplicate email is reported as a 400.
pub async fn create(pool: &PgPool, mut input: SignupInput) -> Result<User, AppError> {
    input.name = input.name.trim().to_string();
    input.email = input.email.trim().to_lowercase();
    input.validate()?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password, age) VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&input.name)
    .bind(&input.email)
    .bind(&password_hash)
    .bind(input.age.unwrap_or(0))
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Looks up a user by email and checks the password against the stored hash.
///
/// Unknown email and wrong password produce the same error, so a caller
/// cannot probe which addresses have accounts.
pub async fn find_by_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(&email)
    .fetch_optional(pool)
    .await?;

    match user {
        Some(user) if verify_password(password, &user.password)? => Ok(user),
        _ => Err(AppError::BadRequest("Unable to login".into())),
    }
}

/// Resolves the user for a live session: the user must exist and the exact
/// token must still be in their session list.
pub async fn find_by_session(
    pool: &PgPool,
    user_id: Uuid,
    token: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT u.id, u.name, u.email, u.password, u.age, u.created_at, u.updated_at \
         FROM users u \
         JOIN tokens t ON t.user_id = u.id \
         WHERE u.id = $1 AND t.token = $2",
    )
    .bind(user_id)
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Applies a partial profile update. Absent fields keep their stored values;
/// a present password is re-hashed before persisting.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    mut input: UpdateUserInput,
) -> Result<User, AppError> {
    input.name = input.name.map(|name| name.trim().to_string());
    input.email = input.email.map(|email| email.trim().to_lowercase());
    input.validate()?;

    let password_hash = match &input.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users \
         SET name = COALESCE($1, name), \
             email = COALESCE($2, email), \
             password = COALESCE($3, password), \
             age = COALESCE($4, age), \
             updated_at = NOW() \
         WHERE id = $5 \
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&input.name)
    .bind(&input.email)
    .bind(&password_hash)
    .bind(input.age)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Deletes the account and cascades to everything it owns: all tasks and all
/// session tokens go in the same transaction.
pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM tasks WHERE owner = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Stores the (already normalized) avatar bytes on the user's record.
pub async fn set_avatar(pool: &PgPool, user_id: Uuid, avatar: Vec<u8>) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET avatar = $1, updated_at = NOW() WHERE id = $2")
        .bind(&avatar)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Removes the stored avatar, if any.
pub async fn clear_avatar(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET avatar = NULL, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Fetches the avatar bytes for a user. `None` when the user does not exist
/// or has no avatar set.
pub async fn get_avatar(pool: &PgPool, user_id: Uuid) -> Result<Option<Vec<u8>>, AppError> {
    let row: Option<(Option<Vec<u8>>,)> =
        sqlx::query_as("SELECT avatar FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.and_then(|(avatar,)| avatar))
}
