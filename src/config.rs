use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub from_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitplanner".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitplanner-users".into()),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60),
        };
        let mail = MailConfig {
            from_address: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@fitplanner.local".into()),
        };
        Ok(Self {
            database_url,
            db_max_connections,
            jwt,
            mail,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        std::env::set_var("FITPLANNER_TEST_PARSE_OR", "not-a-number");
        assert_eq!(parse_or("FITPLANNER_TEST_PARSE_OR", 7_i64), 7);
        std::env::set_var("FITPLANNER_TEST_PARSE_OR", "42");
        assert_eq!(parse_or("FITPLANNER_TEST_PARSE_OR", 7_i64), 42);
        std::env::remove_var("FITPLANNER_TEST_PARSE_OR");
    }

    #[test]
    fn parse_or_uses_default_when_missing() {
        assert_eq!(parse_or("FITPLANNER_TEST_SURELY_UNSET", 10_u32), 10);
    }
}
