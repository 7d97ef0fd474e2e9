/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | WHATSAPP_GATEWAY_URL | (unset) | WhatsApp gateway base URL; notifications disabled when unset |
/// | ADMIN_USERNAME | admin | Seeded admin account |
/// | ADMIN_PASSWORD | admin123 | Seeded admin password (hashed at startup) |
/// | LOG_DIR | (unset) | Optional directory for daily-rolling log files |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 WHATSAPP_GATEWAY_URL=http://localhost:4001 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// WhatsApp gateway base URL; `None` disables outbound notifications
    pub whatsapp_gateway_url: Option<String>,
    /// Username for the seeded admin account
    pub admin_username: String,
    /// Password for the seeded admin account (never stored, only hashed)
    pub admin_password: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            whatsapp_gateway_url: std::env::var("WHATSAPP_GATEWAY_URL").ok(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override selected values. Mostly used by tests.
    pub fn with_overrides(http_port: u16, whatsapp_gateway_url: Option<String>) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.whatsapp_gateway_url = whatsapp_gateway_url;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
