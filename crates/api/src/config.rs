//! Process configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use domain::{RandomCarrier, RandomPaymentGateway};
use saga::SagaConfig;
use thiserror::Error;

pub const ORCHESTRATOR_PORT: u16 = 50050;
pub const ORDER_SERVICE_PORT: u16 = 50051;
pub const PAYMENT_SERVICE_PORT: u16 = 50052;
pub const SHIPPING_SERVICE_PORT: u16 = 50053;

/// An environment variable that is set but cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Reads `key` through `lookup`, falling back to `default` when unset.
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError { key, value }),
    }
}

fn secs_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    parse_or(lookup, key, default.as_secs()).map(Duration::from_secs)
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Server configuration shared by every process.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: per process)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Self::from_lookup(default_port, env_lookup)
    }

    pub fn from_lookup(
        default_port: u16,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", default_port)?,
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outcome rates of the simulated payment gateway and carrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatewayConfig {
    /// `PAYMENT_APPROVAL_RATE` (default 0.7)
    pub payment_approval_rate: f64,
    /// `CARRIER_SUCCESS_RATE` (default 0.8)
    pub carrier_success_rate: f64,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            payment_approval_rate: parse_or(
                &lookup,
                "PAYMENT_APPROVAL_RATE",
                RandomPaymentGateway::DEFAULT_APPROVAL_RATE,
            )?,
            carrier_success_rate: parse_or(
                &lookup,
                "CARRIER_SUCCESS_RATE",
                RandomCarrier::DEFAULT_SUCCESS_RATE,
            )?,
        })
    }

    pub fn payment_gateway(&self) -> RandomPaymentGateway {
        RandomPaymentGateway::new(self.payment_approval_rate)
    }

    pub fn carrier(&self) -> RandomCarrier {
        RandomCarrier::new(self.carrier_success_rate)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            payment_approval_rate: RandomPaymentGateway::DEFAULT_APPROVAL_RATE,
            carrier_success_rate: RandomCarrier::DEFAULT_SUCCESS_RATE,
        }
    }
}

/// Where the orchestrator finds the domain services, and its deadlines.
///
/// Reads `ORDER_SERVICE_URL`, `PAYMENT_SERVICE_URL`, `SHIPPING_SERVICE_URL`,
/// `SAGA_TIMEOUT_SECS`, `COMPENSATION_TIMEOUT_SECS` and
/// `FINALIZE_TIMEOUT_SECS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub order_service_url: String,
    pub payment_service_url: String,
    pub shipping_service_url: String,
    pub saga: SagaConfig,
}

impl OrchestratorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            order_service_url: lookup("ORDER_SERVICE_URL").unwrap_or(defaults.order_service_url),
            payment_service_url: lookup("PAYMENT_SERVICE_URL")
                .unwrap_or(defaults.payment_service_url),
            shipping_service_url: lookup("SHIPPING_SERVICE_URL")
                .unwrap_or(defaults.shipping_service_url),
            saga: SagaConfig {
                saga_timeout: secs_or(&lookup, "SAGA_TIMEOUT_SECS", defaults.saga.saga_timeout)?,
                compensation_timeout: secs_or(
                    &lookup,
                    "COMPENSATION_TIMEOUT_SECS",
                    defaults.saga.compensation_timeout,
                )?,
                finalize_timeout: secs_or(
                    &lookup,
                    "FINALIZE_TIMEOUT_SECS",
                    defaults.saga.finalize_timeout,
                )?,
            },
        })
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            order_service_url: format!("http://localhost:{ORDER_SERVICE_PORT}"),
            payment_service_url: format!("http://localhost:{PAYMENT_SERVICE_PORT}"),
            shipping_service_url: format!("http://localhost:{SHIPPING_SERVICE_PORT}"),
            saga: SagaConfig::default(),
        }
    }
}
