//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use blog_infra::JwtConfig;

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConfig;

#[cfg(feature = "smtp")]
use blog_infra::SmtpConfig;

/// Credentials of an account created at startup when it does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "smtp")]
    pub smtp: Option<SmtpConfig>,
    pub notify_from: String,
    pub notify_to: String,
    pub media_root: PathBuf,
    pub template_dir: String,
    pub jwt: JwtConfig,
    pub admin: Option<AdminSeed>,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let notify_from =
            env::var("NOTIFY_FROM").unwrap_or_else(|_| "from-email@example.com".to_string());
        let notify_to =
            env::var("NOTIFY_TO").unwrap_or_else(|_| "admin-email@example.com".to_string());

        #[cfg(feature = "postgres")]
        let database = non_empty("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 100),
            min_connections: parsed("DB_MIN_CONNECTIONS", 10),
        });

        #[cfg(feature = "smtp")]
        let smtp = non_empty("SMTP_HOST").map(|host| SmtpConfig {
            host,
            port: parsed("SMTP_PORT", 587),
            username: non_empty("SMTP_USERNAME"),
            password: non_empty("SMTP_PASSWORD"),
            use_starttls: env::var("SMTP_STARTTLS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            from: notify_from.clone(),
            to: notify_to.clone(),
        });

        let admin = match (non_empty("ADMIN_USERNAME"), non_empty("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminSeed { username, password }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            #[cfg(feature = "smtp")]
            smtp,
            notify_from,
            notify_to,
            media_root: PathBuf::from(
                env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()),
            ),
            template_dir: env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string()),
            jwt: JwtConfig::from_env(),
            admin,
        }
    }
}
