use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents a user account as stored in the database.
///
/// The bcrypt `password` hash is never serialized, so handlers can return this
/// struct directly in API responses. The avatar blob is intentionally not part
/// of this struct; it is fetched separately by the avatar endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique identifier for the user (database-assigned UUID).
    pub id: Uuid,
    /// Display name, trimmed, never empty.
    pub name: String,
    /// Email address, trimmed and lowercased, unique across accounts.
    pub email: String,
    /// Bcrypt hash of the password. Hidden from all API responses.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Non-negative age, defaults to 0.
    pub age: i32,
    /// Timestamp of account creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last profile update.
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /users` (signup).
///
/// Unknown fields are rejected at deserialization, which surfaces as a 400.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SignupInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(
        length(min = 7, message = "Password must be at least 7 characters"),
        custom = "validate_password"
    )]
    pub password: String,
    /// Optional; persisted as 0 when absent.
    #[validate(range(min = 0, message = "Age must be a positive number"))]
    pub age: Option<i32>,
}

/// Payload for `PATCH /users/me`.
///
/// Only name, email, password and age may be updated; any other key fails
/// deserialization and the request is rejected with a 400 before any
/// database work happens.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(
        length(min = 7, message = "Password must be at least 7 characters"),
        custom = "validate_password"
    )]
    pub password: Option<String>,
    #[validate(range(min = 0, message = "Age must be a positive number"))]
    pub age: Option<i32>,
}

/// Payload for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Rejects the password "password" itself (case-insensitive, ignoring
/// surrounding whitespace). Values merely containing the word, like
/// "mypassword777$", are accepted.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().eq_ignore_ascii_case("password") {
        let mut error = ValidationError::new("password");
        error.message = Some("Password cannot be \"password\"".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupInput {
        SignupInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            age: None,
        }
    }

    #[test]
    fn test_signup_input_validation() {
        assert!(signup("Andrew", "andrew@example.com", "mypassword777$")
            .validate()
            .is_ok());

        // Empty name
        assert!(signup("", "andrew@example.com", "mypassword777$")
            .validate()
            .is_err());

        // Invalid email
        assert!(signup("Andrew", "notanemail.com", "mypassword777$")
            .validate()
            .is_err());

        // Too short
        assert!(signup("Andrew", "andrew@example.com", "abc123")
            .validate()
            .is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(signup("Andrew", "andrew@example.com", "password")
            .validate()
            .is_err());
        assert!(signup("Andrew", "andrew@example.com", "PASSWORD")
            .validate()
            .is_err());
        assert!(signup("Andrew", "andrew@example.com", "  password ")
            .validate()
            .is_err());
        // Containing the word is fine, being the word is not
        assert!(signup("Andrew", "andrew@example.com", "mypassword777$")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_update_input_validation() {
        let valid = UpdateUserInput {
            name: Some("John".to_string()),
            email: None,
            password: None,
            age: Some(27),
        };
        assert!(valid.validate().is_ok());

        let bad_email = UpdateUserInput {
            name: None,
            email: Some("notandemail.com".to_string()),
            password: None,
            age: None,
        };
        assert!(bad_email.validate().is_err());

        let bad_password = UpdateUserInput {
            name: None,
            email: None,
            password: Some("password".to_string()),
            age: None,
        };
        assert!(bad_password.validate().is_err());

        let negative_age = UpdateUserInput {
            name: None,
            email: None,
            password: None,
            age: Some(-3),
        };
        assert!(negative_age.validate().is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<UpdateUserInput, _> = serde_json::from_value(serde_json::json!({
            "location": "Edinburgh"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_password_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Andrew".to_string(),
            email: "andrew@example.com".to_string(),
            password: "$2b$12$secret-hash".to_string(),
            age: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["name"], "Andrew");
    }
}
