use crate::config::Config;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Server health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerHealth {
    /// Health endpoint answered HTTP 200
    Healthy,
    /// Health endpoint answered another status, or did not answer at all
    Unhealthy {
        /// Status code, `None` when the request itself failed
        status: Option<u16>,
    },
    /// Health could not be probed
    Unknown,
}

impl fmt::Display for ServerHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerHealth::Healthy => write!(f, "healthy"),
            ServerHealth::Unhealthy { status: Some(code) } => {
                write!(f, "unhealthy (HTTP {})", code)
            }
            ServerHealth::Unhealthy { status: None } => write!(f, "failed (no response)"),
            ServerHealth::Unknown => write!(f, "unknown"),
        }
    }
}

/// Probes the health of the running application.
///
/// Implementations never fail: an unreachable endpoint is a health result,
/// not an error.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> ServerHealth;
}

/// [`HealthProbe`] issuing a single GET against the health endpoint.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    url: String,
    /// `None` when the HTTP client could not be constructed
    client: Option<reqwest::Client>,
}

impl HttpHealthProbe {
    /// Create a probe for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "HTTP client unavailable, health checks disabled");
                None
            }
        };

        Self {
            url: url.into(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.health_url(), config.timing.health_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn check(&self) -> ServerHealth {
        let Some(client) = &self.client else {
            return ServerHealth::Unknown;
        };

        match client.get(&self.url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                tracing::debug!(status = code, "Health endpoint responded");
                if code == 200 {
                    ServerHealth::Healthy
                } else {
                    ServerHealth::Unhealthy { status: Some(code) }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Health request failed");
                ServerHealth::Unhealthy { status: None }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_display() {
        assert_eq!(ServerHealth::Healthy.to_string(), "healthy");
        assert_eq!(
            ServerHealth::Unhealthy { status: Some(503) }.to_string(),
            "unhealthy (HTTP 503)"
        );
        assert_eq!(
            ServerHealth::Unhealthy { status: None }.to_string(),
            "failed (no response)"
        );
        assert_eq!(ServerHealth::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_probe_url_from_config() {
        let probe = HttpHealthProbe::from_config(&Config::default());
        assert_eq!(probe.url(), "http://localhost:8080/actuator/health");
    }
}
