use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for RabbitMQ connection and messaging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RabbitMqConfig {
    /// RabbitMQ host address
    pub host: String,
    /// RabbitMQ username for authentication
    pub username: String,
    /// RabbitMQ password for authentication
    pub password: String,
    /// Virtual host to use (default: "/")
    pub vhost: String,
    /// Port number (default: 5672)
    pub port: u16,
    /// Exchange name for contest rating events
    pub exchange: String,
    /// Routing key for contest rated messages
    pub routing_key: String,
    /// Publishing is skipped entirely when false
    pub enabled: bool
}

impl RabbitMqConfig {
    /// Creates a new RabbitMQ configuration from environment variables.
    /// Fails when credentials are missing.
    pub fn from_env() -> Result<Self, env::VarError> {
        let routing_key = env::var("RABBITMQ_ROUTING_KEY").unwrap_or_else(|_| "ratings.contests".to_string());

        Ok(Self {
            host: env::var("RABBITMQ_HOST").unwrap_or_else(|_| "localhost".to_string()),
            username: env::var("RABBITMQ_USERNAME")?,
            password: env::var("RABBITMQ_PASSWORD")?,
            vhost: env::var("RABBITMQ_VHOST").unwrap_or_else(|_| "/".to_string()),
            port: env::var("RABBITMQ_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5672),
            exchange: routing_key.clone(),
            routing_key,
            enabled: env::var("RABBITMQ_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true)
        })
    }

    /// Builds the AMQP connection URL from the configuration
    pub fn connection_url(&self) -> String {
        format!(
            "amqp://{}:{}@{}:{}/{}",
            self.username,
            self.password,
            self.host,
            self.port,
            self.vhost.replace('/', "%2F")
        )
    }
}

impl Default for RabbitMqConfig {
    fn default() -> Self {
        let routing_key = "ratings.contests".to_string();
        Self {
            host: "localhost".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            vhost: "/".to_string(),
            port: 5672,
            exchange: routing_key.clone(),
            routing_key,
            enabled: true
        }
    }
}
