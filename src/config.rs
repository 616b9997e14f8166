use anyhow::{bail, Context};
use chrono::Duration;
use std::{env, path::PathBuf};

const DEVELOPMENT_SECRET_KEY: &str = "mathhint-development-secret-key-do-not-use-in-production";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("unknown APP_ENV `{other}`, expected `development` or `production`"),
        }
    }

    #[inline]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Password rules, lockout limits and session lifetimes consumed by the auth
/// handlers.
#[derive(Clone, Debug)]
pub struct SecurityPolicy {
    pub password_min_length: usize,
    pub login_failure_limit: i32,
    pub login_cooldown: Duration,
    /// Sliding lifetime of a session row, bumped on every authenticated request.
    pub session_ttl: Duration,
    /// Absolute lifetime of a token regardless of activity.
    pub session_max_age: Duration,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            login_failure_limit: 5,
            login_cooldown: Duration::minutes(30),
            session_ttl: Duration::seconds(3600),
            session_max_age: Duration::hours(24),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub secret_key: String,
    pub media_root: PathBuf,
    pub base_dir: PathBuf,
    pub mail_api_url: Option<String>,
    pub mail_from: String,
    pub maintainer_email: String,
    pub cors_allowed_origins: Vec<String>,
    pub security: SecurityPolicy,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let port = match optional("PORT") {
            Some(port) => port.parse().context("PORT is not a valid port number")?,
            None => 3002,
        };

        let environment = match optional("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        let secret_key = match (optional("SECRET_KEY"), environment) {
            (Some(key), _) => key,
            (None, Environment::Development) => DEVELOPMENT_SECRET_KEY.to_owned(),
            (None, Environment::Production) => bail!("SECRET_KEY must be set in production"),
        };

        let base_dir = match optional("BASE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir().context("failed to read the current directory")?,
        };

        let media_root = optional("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("media"));

        let cors_allowed_origins = optional("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            port,
            environment,
            secret_key,
            media_root,
            base_dir,
            mail_api_url: optional("MAIL_API_URL"),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| "noreply@mathhint.local".to_owned()),
            maintainer_email: optional("MAINTAINER_EMAIL")
                .unwrap_or_else(|| "admin@mathhint.local".to_owned()),
            cors_allowed_origins,
            security: SecurityPolicy::default(),
        })
    }

    /// Resolves a path given on the command line against `base_dir`.
    pub fn resolve_path(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();

        if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_owned(),
            port: 3002,
            environment: Environment::Development,
            secret_key: DEVELOPMENT_SECRET_KEY.to_owned(),
            media_root: PathBuf::from("media"),
            base_dir: PathBuf::from("."),
            mail_api_url: None,
            mail_from: "noreply@mathhint.local".to_owned(),
            maintainer_email: "admin@mathhint.local".to_owned(),
            cors_allowed_origins: Vec::new(),
            security: SecurityPolicy::default(),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
