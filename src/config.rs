use std::env;

/// Process configuration, read once at startup.
///
/// `JWT_SECRET` is intentionally not stored here: the token service reads it
/// from the environment at point of use, and `main` checks its presence at
/// startup so a misconfigured deployment fails fast. SMTP settings are read
/// by the notifier, which treats them as optional.
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env_or("SERVER_HOST", "127.0.0.1"),
            server_port: env_or("SERVER_PORT", "8080")
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_overrides() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");

        let config = Config::from_env();
        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");

        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("SERVER_PORT", "3000");

        let config = Config::from_env();
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
    }
}
