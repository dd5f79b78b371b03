use crate::{
    auth::AuthConfig,
    cachet::{self, ServerConfig},
    cli::telemetry,
};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub redis_url: String,
    pub jwt_secret: SecretString,
    pub session_ttl_seconds: u64,
}

/// Check the backend URLs before anything tries to connect with them.
fn validate(args: &Args) -> Result<()> {
    let dsn = Url::parse(&args.dsn).context("Invalid database DSN")?;
    if !matches!(dsn.scheme(), "postgres" | "postgresql") {
        return Err(anyhow!(
            "Database DSN must use the postgres scheme, got: {}",
            dsn.scheme()
        ));
    }

    let redis = Url::parse(&args.redis_url).context("Invalid session cache URL")?;
    if !matches!(redis.scheme(), "redis" | "rediss") {
        return Err(anyhow!(
            "Session cache URL must use the redis scheme, got: {}",
            redis.scheme()
        ));
    }

    if args.jwt_secret.expose_secret().is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    Ok(())
}

/// Execute the server action.
/// # Errors
/// Returns an error if arguments are invalid, a backend is unreachable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    validate(&args)?;

    debug!(
        "port: {}, session cache: {}, session TTL: {}s",
        args.port, args.redis_url, args.session_ttl_seconds
    );

    let config = ServerConfig {
        port: args.port,
        dsn: args.dsn,
        redis_url: args.redis_url,
        jwt_secret: args.jwt_secret,
        auth: AuthConfig::default().with_session_ttl_seconds(args.session_ttl_seconds),
    };

    let result = cachet::new(config).await;

    telemetry::shutdown_tracer();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dsn: &str, redis_url: &str, secret: &str) -> Args {
        Args {
            port: 3000,
            dsn: dsn.to_string(),
            redis_url: redis_url.to_string(),
            jwt_secret: SecretString::from(secret.to_string()),
            session_ttl_seconds: 3600,
        }
    }

    #[test]
    fn validate_accepts_backend_urls() {
        assert!(validate(&args(
            "postgres://user:pw@localhost:5432/cachet",
            "redis://127.0.0.1:6379",
            "s3cret"
        ))
        .is_ok());
        assert!(validate(&args(
            "postgresql://localhost/cachet",
            "rediss://cache.tld:6380/1",
            "s3cret"
        ))
        .is_ok());
    }

    #[test]
    fn validate_rejects_bad_input() {
        for (dsn, redis, secret) in [
            ("not a url", "redis://127.0.0.1:6379", "s3cret"),
            ("mysql://localhost/cachet", "redis://127.0.0.1:6379", "s3cret"),
            ("postgres://localhost/cachet", "http://127.0.0.1:6379", "s3cret"),
            ("postgres://localhost/cachet", "redis://127.0.0.1:6379", ""),
        ] {
            assert!(validate(&args(dsn, redis, secret)).is_err(), "{dsn} {redis}");
        }
    }

    #[test]
    fn debug_hides_jwt_secret() {
        let rendered = format!(
            "{:?}",
            args("postgres://localhost/cachet", "redis://127.0.0.1:6379", "s3cret")
        );
        assert!(!rendered.contains("s3cret"));
    }
}
