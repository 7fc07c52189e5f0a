use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Client configuration: server location plus the current session token
#[derive(Debug, Clone)]
pub struct ClientConfig {
    app: AppConfig,
    token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app: AppConfig {
                server_url: Some(DEFAULT_SERVER_URL.to_string()),
            },
            token: None,
        }
    }
}

impl ClientConfig {
    /// Configuration from `CLIENT_API_URL`, falling back to the default
    /// server when the variable is unset or invalid
    pub fn from_env() -> Self {
        match std::env::var("CLIENT_API_URL") {
            Ok(url) => Self::with_builder(AppConfig::builder().server_url(url)).unwrap_or_else(|e| {
                tracing::warn!("[Config] Ignoring CLIENT_API_URL: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app, token: None })
    }

    pub fn with_server_url(url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::with_builder(AppConfig::builder().server_url(url))
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    /// WebSocket URL for the current token, `None` when logged out
    pub fn socket_url(&self) -> Option<String> {
        let token = self.token.as_deref()?;
        Some(socket_url_for(self.server_url(), token))
    }
}

/// Map an `http(s)://` server URL to the `ws(s)://` socket endpoint
pub fn socket_url_for(server_url: &str, token: &str) -> String {
    let base = if let Some(rest) = server_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        server_url.to_string()
    };
    format!("{}/api/socket?token={}", base, token)
}
