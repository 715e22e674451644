use std::env;

use auth::HashScheme;
use auth::SigningKey;
use auth::TokenPolicy;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

type Builder = config::builder::ConfigBuilder<DefaultState>;

// Upper bounds for the jwt section. Lifetimes are minutes, not hours.
const MAX_EXPIRATION_MINUTES: i64 = 60;
const MAX_CLOCK_SKEW_SECONDS: i64 = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Required. There is no fallback secret.
    pub secret: SigningKey,
    pub issuer: String,
    pub audience: String,
    pub expiration_minutes: i64,
    pub max_clock_skew_seconds: i64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    Bcrypt,
    Argon2id,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub scheme: PasswordScheme,
    pub bcrypt_cost: u32,
}

impl JwtConfig {
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy::new(self.issuer.clone(), self.audience.clone())
            .with_lifetime(chrono::Duration::minutes(self.expiration_minutes))
            .with_max_clock_skew(chrono::Duration::seconds(self.max_clock_skew_seconds))
    }
}

impl PasswordConfig {
    pub fn hash_scheme(&self) -> HashScheme {
        match self.scheme {
            PasswordScheme::Bcrypt => HashScheme::Bcrypt {
                cost: self.bcrypt_cost,
            },
            PasswordScheme::Argon2id => HashScheme::Argon2id,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy deployment variables (PORT, DATABASE_URL, JWT_SECRET)
    /// 2. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .set_override_option("server.http_port", env::var("PORT").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?;

        Self::from_builder(builder)
    }

    fn defaults() -> Result<Builder, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.issuer", TokenPolicy::DEFAULT_ISSUER)?
            .set_default("jwt.audience", TokenPolicy::DEFAULT_AUDIENCE)?
            .set_default("jwt.expiration_minutes", TokenPolicy::DEFAULT_LIFETIME_MINUTES)?
            .set_default(
                "jwt.max_clock_skew_seconds",
                TokenPolicy::DEFAULT_MAX_CLOCK_SKEW_SECONDS,
            )?
            .set_default("password.scheme", "bcrypt")?
            .set_default(
                "password.bcrypt_cost",
                i64::from(auth::password::hasher::DEFAULT_BCRYPT_COST),
            )
    }

    fn from_builder(builder: Builder) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message("database.url must not be empty".into()));
        }

        if !(1..=MAX_EXPIRATION_MINUTES).contains(&self.jwt.expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_minutes must be within 1..={}, got {}",
                MAX_EXPIRATION_MINUTES, self.jwt.expiration_minutes
            )));
        }

        if !(0..=MAX_CLOCK_SKEW_SECONDS).contains(&self.jwt.max_clock_skew_seconds) {
            return Err(ConfigError::Message(format!(
                "jwt.max_clock_skew_seconds must be within 0..={}, got {}",
                MAX_CLOCK_SKEW_SECONDS, self.jwt.max_clock_skew_seconds
            )));
        }

        if !(4..=31).contains(&self.password.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "password.bcrypt_cost must be within 4..=31, got {}",
                self.password.bcrypt_cost
            )));
        }

        Ok(())
    }
}
