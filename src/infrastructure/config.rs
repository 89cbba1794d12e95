//! # Service Configuration
//!
//! Credentials, endpoint selection and client tuning, loaded with the
//! `config` crate.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`carrier-rate.toml` unless another path is given)
//! 3. environment variables prefixed `CARRIER_RATE__`, after `.env` is loaded
//!
//! # Examples
//!
//! ```
//! use carrier_rate::infrastructure::config::ServiceConfig;
//!
//! let config = ServiceConfig::default()
//!     .with_credentials("key", "password")
//!     .with_account("510087020", "118785166");
//!
//! assert!(config.has_credentials());
//! assert!(config.endpoint().starts_with("https://wsbeta."));
//! ```

use crate::domain::envelope::{AuthenticationBlock, ClientDetail, Credentials};
use crate::domain::errors::ContractResult;
use crate::domain::value_objects::{ParseSeverityError, Severity};
use crate::infrastructure::contract::ContractLocation;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CARRIER_RATE";

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "carrier-rate.toml";

/// Production web service base URL.
pub const PRODUCTION_ENDPOINT: &str = "https://ws.fedex.com:443/web-services";

/// Test web service base URL.
pub const TEST_ENDPOINT: &str = "https://wsbeta.fedex.com:443/web-services";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_true() -> bool {
    true
}

fn default_contract() -> String {
    ContractLocation::BundledRate.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_failure_threshold() -> String {
    Severity::Error.to_string()
}

/// Client configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Developer key.
    #[serde(default)]
    pub key: String,
    /// Developer password.
    #[serde(default)]
    pub password: String,
    /// Shipper account number.
    #[serde(default)]
    pub account_number: String,
    /// Meter number.
    #[serde(default)]
    pub meter_number: String,
    /// Integrator id.
    #[serde(default)]
    pub integrator_id: Option<String>,
    /// Express region code.
    #[serde(default)]
    pub express_region_code: Option<String>,
    /// Send to the test server instead of production.
    #[serde(default = "default_true")]
    pub use_test_server: bool,
    /// Explicit base URL, overriding the server toggle.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Contract location (`bundled:rate`, a path or a URL).
    #[serde(default = "default_contract")]
    pub contract: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Lowest severity treated as a rejection.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            password: String::new(),
            account_number: String::new(),
            meter_number: String::new(),
            integrator_id: None,
            express_region_code: None,
            use_test_server: true,
            endpoint: None,
            contract: default_contract(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            failure_threshold: default_failure_threshold(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from `carrier-rate.toml` (if present) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source cannot be read or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads configuration from `path` (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `.env` is malformed, a source cannot be
    /// read or a value has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        check_dotenv(dotenvy::dotenv())?;
        Self::load_with(path, environment())
    }

    fn load_with(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Parses configuration from a TOML string, without consulting the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the text is not valid TOML or a value has
    /// the wrong type.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Sets the developer credentials.
    #[must_use]
    pub fn with_credentials(mut self, key: impl Into<String>, password: impl Into<String>) -> Self {
        self.key = key.into();
        self.password = password.into();
        self
    }

    /// Sets the account and meter numbers.
    #[must_use]
    pub fn with_account(
        mut self,
        account_number: impl Into<String>,
        meter_number: impl Into<String>,
    ) -> Self {
        self.account_number = account_number.into();
        self.meter_number = meter_number.into();
        self
    }

    /// Sets an explicit endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Selects the test or production server.
    #[must_use]
    pub fn with_test_server(mut self, use_test_server: bool) -> Self {
        self.use_test_server = use_test_server;
        self
    }

    /// Returns the base URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match &self.endpoint {
            Some(endpoint) => endpoint,
            None if self.use_test_server => TEST_ENDPOINT,
            None => PRODUCTION_ENDPOINT,
        }
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the authentication block sent with every request.
    #[must_use]
    pub fn authentication(&self) -> AuthenticationBlock {
        AuthenticationBlock {
            credentials: Credentials::new(&self.key, &self.password),
            client: ClientDetail {
                account_number: self.account_number.clone(),
                meter_number: self.meter_number.clone(),
                integrator_id: self.integrator_id.clone(),
                region: self.express_region_code.clone(),
            },
        }
    }

    /// Returns the failure threshold.
    ///
    /// # Errors
    ///
    /// Returns `ParseSeverityError` if the configured value is not a severity.
    pub fn failure_threshold(&self) -> Result<Severity, ParseSeverityError> {
        self.failure_threshold.parse()
    }

    /// Returns the contract location.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ContractLoad` if the location is empty or
    /// names an unknown bundled contract.
    pub fn contract_location(&self) -> ContractResult<ContractLocation> {
        self.contract.parse()
    }

    /// Returns true if key, password, account and meter are all set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.key.is_empty()
            && !self.password.is_empty()
            && !self.account_number.is_empty()
            && !self.meter_number.is_empty()
    }
}

/// Environment source for `CARRIER_RATE__*` variables.
///
/// Values stay strings so credentials such as `0118500000` keep their exact
/// text. Numeric and boolean fields are converted during deserialization.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Accepts a loaded or missing `.env` and reports anything else.
fn check_dotenv<T>(result: dotenvy::Result<T>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Foreign(Box::new(e))),
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("key", &self.key)
            .field("password", &"***")
            .field("account_number", &self.account_number)
            .field("meter_number", &self.meter_number)
            .field("integrator_id", &self.integrator_id)
            .field("express_region_code", &self.express_region_code)
            .field("endpoint", &self.endpoint())
            .field("contract", &self.contract)
            .field("timeout_ms", &self.timeout_ms)
            .field("failure_threshold", &self.failure_threshold)
            .finish()
    }
}
