//! # Contract Loading
//!
//! Where contracts come from and the port that fetches them.

use super::RATE_SERVICE_CONTRACT;
use crate::domain::contract::ContractCatalog;
use crate::domain::errors::{ContractError, ContractResult};
use crate::infrastructure::transport::HttpClient;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Source of a contract description.
///
/// Parsed from `bundled:rate`, an `http(s)://` URL, or a filesystem path.
///
/// # Examples
///
/// ```
/// use carrier_rate::infrastructure::contract::ContractLocation;
///
/// let location: ContractLocation = "bundled:rate".parse().unwrap();
/// assert_eq!(location, ContractLocation::BundledRate);
///
/// let location: ContractLocation = "contracts/rate_service.json".parse().unwrap();
/// assert!(matches!(location, ContractLocation::File(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ContractLocation {
    /// The rate service contract compiled into the crate.
    #[default]
    BundledRate,
    /// A local file.
    File(PathBuf),
    /// A remote document.
    Url(String),
}

impl ContractLocation {
    /// Returns the registry key for this location.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContractLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BundledRate => write!(f, "bundled:rate"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

impl FromStr for ContractLocation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContractError::contract_load(s, "empty contract location"));
        }
        if let Some(name) = s.strip_prefix("bundled:") {
            return match name {
                "rate" => Ok(Self::BundledRate),
                other => Err(ContractError::contract_load(
                    s,
                    format!("no bundled contract named {}", other),
                )),
            };
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Self::Url(s.to_string()));
        }
        Ok(Self::File(PathBuf::from(s)))
    }
}

/// Fetches and parses contract descriptions.
#[async_trait]
pub trait ContractLoader: Send + Sync + fmt::Debug {
    /// Loads the contract at `location`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ContractLoad` if the document cannot be read
    /// and `ContractError::InvalidContract` if it does not describe a valid
    /// contract.
    async fn load(&self, location: &ContractLocation) -> ContractResult<ContractCatalog>;
}

/// Loader reading files with `tokio::fs` and URLs over HTTP.
#[derive(Debug, Clone)]
pub struct DefaultContractLoader {
    http: HttpClient,
}

impl DefaultContractLoader {
    /// Creates a loader whose HTTP fetches time out after `timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ContractLoad` if the HTTP client cannot be created.
    pub fn new(timeout_ms: u64) -> ContractResult<Self> {
        let http = HttpClient::new(timeout_ms)
            .map_err(|e| ContractError::contract_load("http", e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ContractLoader for DefaultContractLoader {
    async fn load(&self, location: &ContractLocation) -> ContractResult<ContractCatalog> {
        debug!(location = %location, "loading contract");
        let document = match location {
            ContractLocation::BundledRate => RATE_SERVICE_CONTRACT.to_string(),
            ContractLocation::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ContractError::contract_load(location.to_string(), e.to_string()))?,
            ContractLocation::Url(url) => self
                .http
                .get_text(url)
                .await
                .map_err(|e| ContractError::contract_load(url.as_str(), e.to_string()))?,
        };
        ContractCatalog::from_json(&document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    mod location {
        use super::*;

        #[test]
        fn parses_each_form() {
            assert_eq!(
                "https://example.com/rate.json".parse::<ContractLocation>().unwrap(),
                ContractLocation::Url("https://example.com/rate.json".into())
            );
            assert_eq!(
                " /etc/rate.json ".parse::<ContractLocation>().unwrap(),
                ContractLocation::File(PathBuf::from("/etc/rate.json"))
            );
        }

        #[test]
        fn rejects_unknown_bundle_and_empty() {
            assert!("bundled:ship".parse::<ContractLocation>().is_err());
            assert!("".parse::<ContractLocation>().is_err());
        }

        #[test]
        fn display_round_trips_bundled() {
            assert_eq!(ContractLocation::BundledRate.to_string(), "bundled:rate");
            assert_eq!(ContractLocation::default(), ContractLocation::BundledRate);
        }
    }

    #[tokio::test]
    async fn loads_bundled_contract() {
        let loader = DefaultContractLoader::new(1000).unwrap();
        let catalog = loader.load(&ContractLocation::BundledRate).await.unwrap();
        assert_eq!(catalog.service_name(), "RateService");
    }

    #[tokio::test]
    async fn loads_file_contract() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "service": "Tiny", "types": [ {{ "kind": "complex", "name": "A" }} ] }}"#
        )
        .unwrap();
        let loader = DefaultContractLoader::new(1000).unwrap();
        let catalog = loader
            .load(&ContractLocation::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert!(catalog.contains("A"));
    }

    #[tokio::test]
    async fn missing_file_is_load_error() {
        let loader = DefaultContractLoader::new(1000).unwrap();
        let err = loader
            .load(&ContractLocation::File(PathBuf::from("/nonexistent/contract.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::ContractLoad { .. }));
    }
}
