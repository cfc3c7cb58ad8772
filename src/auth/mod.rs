pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

// Re-export necessary items
pub use extractors::AuthSession;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, revoke_all_tokens, revoke_token, sign_token, verify_token, Claims};
