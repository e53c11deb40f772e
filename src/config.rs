use std::str::FromStr;

use serde::Deserialize;

/// Deployment environment; drives cookie security attributes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => anyhow::bail!("unknown environment: {other}"),
        }
    }
}

pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;
pub const MAX_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 365;

/// Session lifetime in seconds; unset means one week.
fn session_ttl(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_SECS);
    };
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("JWT_EXPIRES_IN is not an integer: {e}"))?;
    if !(1..=MAX_SESSION_TTL_SECS).contains(&secs) {
        anyhow::bail!(
            "JWT_EXPIRES_IN must be between 1 and {MAX_SESSION_TTL_SECS} seconds, got {secs}"
        );
    }
    Ok(secs)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_in_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")?;
        let environment = match std::env::var("APP_ENV") {
            Ok(v) => v.parse()?,
            Err(_) => Environment::default(),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "authenticate-me".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticate-me-users".into()),
            expires_in_secs: session_ttl(std::env::var("JWT_EXPIRES_IN").ok().as_deref())?,
        };
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url,
            environment,
            jwt,
            bcrypt_cost,
        })
    }
}
