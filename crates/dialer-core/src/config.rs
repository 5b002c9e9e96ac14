//! # Process Configuration
//!
//! Loaded once at startup from a JSON file and shared read-only for the
//! lifetime of the process.
//!
//! ```json
//! {
//!   "Name": "kyiv",
//!   "SignedInput": false,
//!   "PortalTimeoutSecs": 10,
//!   "Agencies": {
//!     "ua": { "CompanyId": "7", "Secret": "s3cret", "ApiBaseUrl": "https://portal.example/api/" }
//!   },
//!   "Ami": {
//!     "Host": "127.0.0.1", "Port": 5038, "Username": "dialer", "Secret": "amipass",
//!     "ChannelTech": "SIP", "OutboundContext": "outgoing", "QueueContext": "queues",
//!     "TimeoutSecs": 10
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Shared secret (tenant signing key, AMI password).
///
/// Zeroized on drop. `Debug` never prints the value.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret. Callers must not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Per-tenant settings ("agency"), keyed by country code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgencySettings {
    /// Company identifier sent to the partner portal.
    pub company_id: String,
    /// Key used to verify inbound signed requests and sign outbound ones.
    pub secret: SecretKey,
    /// Base URL the portal API paths are joined onto.
    pub api_base_url: Url,
}

/// Connection settings for the AMI gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AmiSettings {
    /// Gateway host.
    pub host: String,
    /// Gateway port.
    #[serde(default = "default_ami_port")]
    pub port: u16,
    /// Manager user.
    pub username: String,
    /// Manager password.
    pub secret: SecretKey,
    /// Channel technology prefix for agent interfaces (`SIP`, `PJSIP`).
    #[serde(default = "default_channel_tech")]
    pub channel_tech: String,
    /// Dialplan context for outbound legs.
    #[serde(default = "default_outbound_context")]
    pub outbound_context: String,
    /// Dialplan context whose extensions are queue names.
    #[serde(default = "default_queue_context")]
    pub queue_context: String,
    /// Upper bound for one action round trip, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ami_port() -> u16 {
    5038
}

fn default_channel_tech() -> String {
    "SIP".to_string()
}

fn default_outbound_context() -> String {
    "outgoing".to_string()
}

fn default_queue_context() -> String {
    "queues".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Whole-process configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DialerConfig {
    /// Installation name shown on the stats page.
    pub name: String,
    /// Whether AMI routes expect signed input.
    #[serde(default)]
    pub signed_input: bool,
    /// Timeout for partner portal calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub portal_timeout_secs: u64,
    /// Tenants keyed by country code.
    #[serde(default)]
    pub agencies: BTreeMap<String, AgencySettings>,
    /// AMI gateway, if this installation talks to one.
    #[serde(default)]
    pub ami: Option<AmiSettings>,
}

impl DialerConfig {
    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a tenant by country code.
    pub fn agency(&self, country: &str) -> Option<&AgencySettings> {
        self.agencies.get(country)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (country, agency) in &self.agencies {
            // Country codes become envelope keys in the portal health report.
            if country == crate::envelope::STATUS {
                return Err(ConfigError::Invalid(format!(
                    "agency key '{country}' is reserved"
                )));
            }
            if agency.secret.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "agency '{country}' has an empty Secret"
                )));
            }
            if agency.company_id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "agency '{country}' has an empty CompanyId"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file parsed but violates a constraint.
    #[error("invalid config: {0}")]
    Invalid(String),
}
