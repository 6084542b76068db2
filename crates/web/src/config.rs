use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Upper bound on varietals per wine and per guess
    pub max_varietals: usize,
    /// Buffered events per tasting before slow sockets start lagging
    pub event_channel_capacity: usize,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            max_varietals: at_least_one("MAX_VARIETALS", parse_or("MAX_VARIETALS", 3)?)?,
            event_channel_capacity: at_least_one(
                "EVENT_CHANNEL_CAPACITY",
                parse_or("EVENT_CHANNEL_CAPACITY", 64)?,
            )?,
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        })
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}

fn at_least_one(name: &str, value: usize) -> Result<usize> {
    if value < 1 {
        bail!("{} must be at least 1", name);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back_when_unset() {
        let value: usize = parse_or("BLINDSIP_TEST_SURELY_UNSET", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let err = at_least_one("MAX_VARIETALS", 0).unwrap_err();
        assert!(err.to_string().contains("MAX_VARIETALS"));
        assert_eq!(at_least_one("MAX_VARIETALS", 1).unwrap(), 1);
        assert_eq!(at_least_one("MAX_VARIETALS", 3).unwrap(), 3);
    }
}
