//! Environment-driven configuration for the API binary.

use assetgate_auth::NewAccount;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the server binds, e.g. `0.0.0.0:8080`.
    pub bind_addr: String,
    /// Whether session cookies carry the `Secure` attribute. Off by
    /// default so local HTTP development works.
    pub cookie_secure: bool,
    /// Admin account ensured at startup, if configured.
    pub bootstrap_admin: Option<NewAccount>,
    /// Postgres connection string; in-memory stores when absent.
    #[cfg(feature = "postgres")]
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let bootstrap_admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
        {
            (Ok(email), Ok(password)) => Some(NewAccount {
                display_name: std::env::var("ADMIN_NAME")
                    .unwrap_or_else(|_| "Administrator".to_string()),
                email,
                password,
            }),
            _ => {
                tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set; no admin bootstrapped");
                None
            }
        };

        Self {
            bind_addr,
            cookie_secure,
            bootstrap_admin,
            #[cfg(feature = "postgres")]
            database_url: std::env::var("DATABASE_URL").ok(),
        }
    }

    /// Configuration for tests: in-memory stores, no admin, plain HTTP.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_secure: false,
            bootstrap_admin: None,
            #[cfg(feature = "postgres")]
            database_url: None,
        }
    }
}
