use std::str::FromStr;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;
const DEFAULT_MAX_BODY_SIZE_BYTES: usize = 1_048_576;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AZURE_API_VERSION: &str = "2024-08-01-preview";

/// Raised when the environment cannot produce a valid `Config`.
/// Carries one line per offending variable so operators can fix them all at once.
#[derive(Debug, Error)]
#[error("Invalid environment configuration:\n{}", .0.join("\n"))]
pub struct ConfigError(pub Vec<String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    /// tracing has no level above `error`, so `fatal` collapses onto it.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Fatal | LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

/// Which AI backend serves the `/v1` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Mock,
    OpenAi,
    Azure,
}

impl FromStr for ProviderKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(ProviderKind::Mock),
            "openai" => Ok(ProviderKind::OpenAi),
            "azure" => Ok(ProviderKind::Azure),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        if raw.trim() == "*" {
            return CorsOrigins::Any;
        }
        CorsOrigins::List(
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub endpoint: String,
    pub key: String,
    pub deployment: String,
    pub api_version: String,
}

/// Application configuration loaded from environment variables.
/// Startup aborts if `API_KEY` is missing or any variable fails its constraint.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub log_level: LogLevel,
    pub build_version: String,
    pub api_key: String,
    pub cors_origins: CorsOrigins,
    pub rate_limit_per_minute: u32,
    pub max_body_size_bytes: usize,
    pub ai_provider: ProviderKind,
    pub openai: OpenAiSettings,
    pub azure: AzureSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` is a thin
    /// wrapper over this; tests feed it a map instead of mutating the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader {
            lookup,
            errors: Vec::new(),
        };

        let environment_key = if env.get("APP_ENV").is_some() {
            "APP_ENV"
        } else {
            "NODE_ENV"
        };

        let config = Config {
            port: env.parsed("PORT", DEFAULT_PORT, "a port number (0-65535)"),
            environment: env.choice(
                environment_key,
                Environment::default(),
                "development, production, test",
            ),
            log_level: env.choice(
                "LOG_LEVEL",
                LogLevel::default(),
                "fatal, error, warn, info, debug, trace",
            ),
            build_version: env.string("BUILD_VERSION", "0.0.0"),
            api_key: env.required("API_KEY"),
            cors_origins: CorsOrigins::parse(&env.string("CORS_ORIGINS", "*")),
            rate_limit_per_minute: env.positive(
                "RATE_LIMIT_PER_MINUTE",
                DEFAULT_RATE_LIMIT_PER_MINUTE,
            ),
            max_body_size_bytes: env.positive("MAX_BODY_SIZE_BYTES", DEFAULT_MAX_BODY_SIZE_BYTES),
            ai_provider: env.choice("AI_PROVIDER", ProviderKind::default(), "mock, openai, azure"),
            openai: OpenAiSettings {
                api_key: env.string("OPENAI_API_KEY", ""),
                model: env.string("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                base_url: env.string("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            },
            azure: AzureSettings {
                endpoint: env.string("AZURE_OPENAI_ENDPOINT", ""),
                key: env.string("AZURE_OPENAI_KEY", ""),
                deployment: env.string("AZURE_OPENAI_DEPLOYMENT", ""),
                api_version: env.string("AZURE_OPENAI_API_VERSION", DEFAULT_AZURE_API_VERSION),
            },
        };

        if env.errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError(env.errors))
        }
    }
}

/// Collects every field error instead of stopping at the first one.
struct EnvReader<F> {
    lookup: F,
    errors: Vec<String>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty and whitespace-only values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&mut self, key: &str) -> String {
        match self.get(key) {
            Some(value) => value,
            None => {
                self.errors.push(format!("  {key}: {key} is required"));
                String::new()
            }
        }
    }

    fn parsed<T: FromStr>(&mut self, key: &str, default: T, expected: &str) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                self.errors
                    .push(format!("  {key}: expected {expected}, got '{raw}'"));
                default
            }
        }
    }

    fn positive<T>(&mut self, key: &str, default: T) -> T
    where
        T: FromStr + PartialOrd + Default + Copy,
    {
        let value = self.parsed(key, default, "a positive integer");
        if value <= T::default() {
            self.errors
                .push(format!("  {key}: must be greater than zero"));
            return default;
        }
        value
    }

    fn choice<T: FromStr>(&mut self, key: &str, default: T, allowed: &str) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                self.errors
                    .push(format!("  {key}: must be one of {allowed}, got '{raw}'"));
                default
            }
        }
    }
}

/// Renders a secret for logs: the first four characters followed by `****`.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 4 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}****")
}
