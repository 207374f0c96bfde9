//! Quote service configuration.

use std::time::Duration;

use cambio_common::budget::constants;

/// Per-stage deadline budgets.
///
/// The persist budget is a fixed slice rooted at the inbound request,
/// independent of how much of the request budget the fetch consumed. A
/// store that needs more than the slice fails the request; the slice is
/// never widened to compensate.
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    /// Budget for handling one inbound request; the upstream fetch shares it.
    pub request_budget: Duration,
    /// Budget for one persistence write, derived fresh at persist time.
    pub persist_budget: Duration,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            request_budget: constants::inbound_request_budget(),
            persist_budget: constants::persist_budget(),
        }
    }
}

/// Main quote service configuration.
#[derive(Debug, Clone)]
pub struct QuoteServiceConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Database URL.
    pub database_url: String,
    /// Upstream provider endpoint.
    pub upstream_url: String,
    /// Deadline budgets.
    pub budgets: BudgetConfig,
}

impl Default for QuoteServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            database_url: "sqlite:cotacoes.db?mode=rwc".to_string(),
            upstream_url: "https://economia.awesomeapi.com.br/json/last/USD-BRL".to_string(),
            budgets: BudgetConfig::default(),
        }
    }
}

impl QuoteServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("CAMBIO_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("CAMBIO_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        if let Ok(url) = std::env::var("UPSTREAM_URL") {
            config.upstream_url = url;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.database_url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if self.upstream_url.is_empty() {
            return Err("Upstream URL cannot be empty".to_string());
        }

        if self.budgets.request_budget.is_zero() || self.budgets.persist_budget.is_zero() {
            return Err("Budgets must be non-zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuoteServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.budgets.request_budget, Duration::from_millis(200));
        assert_eq!(config.budgets.persist_budget, Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = QuoteServiceConfig::default();
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let mut config = QuoteServiceConfig::default();
        config.budgets.persist_budget = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
