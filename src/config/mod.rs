use once_cell::sync::Lazy;
use std::env;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Verifier key for incoming bearer tokens. A PEM block selects RSA
    /// (RS256); any other value is used as an HS256 shared secret.
    pub jwt_public_key: String,
    /// Expected `aud` claim; tokens minted for another resource are rejected.
    pub audience: String,
    /// When set, authenticated requests must also carry this scope.
    pub required_scope: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Opt-in for the destructive demo fixture load at startup.
    pub demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("MOVIES_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            server: ServerConfig { port },
            security: SecurityConfig {
                jwt_public_key: env::var("LAB_JWT_PUBLIC_KEY").unwrap_or_default(),
                audience: env::var("LAB_AUDIENCE")
                    .unwrap_or_else(|_| "movies-service".to_string()),
                required_scope: env::var("LAB_REQUIRED_SCOPE")
                    .ok()
                    .filter(|scope| !scope.trim().is_empty()),
            },
            seed: SeedConfig {
                demo_data: env::var("LAB_DEMO_DATA")
                    .map(|raw| parse_bool(&raw))
                    .unwrap_or(false),
            },
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
