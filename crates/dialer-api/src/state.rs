//! # Application State
//!
//! Shared state handed to every route through axum's `State` extractor.
//!
//! The dispatch layer itself keeps no cross-request state. AppState only
//! carries handles to the collaborators, each of which synchronizes its own
//! resources:
//! - **AMI gateway**: one managed connection inside `AmiClient`
//! - **CDR store**: the sqlx pool
//! - **Partner portals**: the shared reqwest client
//!
//! Collaborators that are not configured are `None`; routes that need them
//! answer `<collaborator> not configured`.

use std::sync::Arc;

use dialer_ami::AmiGateway;
use dialer_core::DialerConfig;
use dialer_portal_client::{PortalClient, PortalError};

use crate::db::CdrStore;
use crate::error::DispatchError;
use crate::verifier::BindMode;

/// Process settings taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres URL for the CDR store.
    pub database_url: Option<String>,
    /// Whether AMI routes expect signed input.
    pub signed_input: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            signed_input: false,
        }
    }
}

impl AppConfig {
    /// Build from `PORT`, `DATABASE_URL` and `SIGNED_INPUT`, falling back
    /// to the file configuration's `SignedInput`.
    pub fn from_env(config: &DialerConfig) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    fn from_lookup(config: &DialerConfig, var: impl Fn(&str) -> Option<String>) -> Self {
        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(Self::default().port);
        let database_url = var("DATABASE_URL").filter(|u| !u.is_empty());
        let signed_input = var("SIGNED_INPUT")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(config.signed_input);
        Self {
            port,
            database_url,
            signed_input,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DialerConfig>,
    pub app_config: AppConfig,
    pub portals: PortalClient,
    ami: Option<Arc<dyn AmiGateway>>,
    cdr: Option<Arc<dyn CdrStore>>,
}

impl AppState {
    /// State with no AMI gateway and no CDR store.
    pub fn new(config: DialerConfig, app_config: AppConfig) -> Result<Self, PortalError> {
        let portals = PortalClient::new(config.agencies.clone(), config.portal_timeout_secs)?;
        Ok(Self {
            config: Arc::new(config),
            app_config,
            portals,
            ami: None,
            cdr: None,
        })
    }

    /// Attach an AMI gateway.
    pub fn with_ami(mut self, gateway: Arc<dyn AmiGateway>) -> Self {
        self.ami = Some(gateway);
        self
    }

    /// Attach a CDR store.
    pub fn with_cdr_store(mut self, store: Arc<dyn CdrStore>) -> Self {
        self.cdr = Some(store);
        self
    }

    /// The AMI gateway, or `NotConfigured`.
    pub fn ami(&self) -> Result<Arc<dyn AmiGateway>, DispatchError> {
        self.ami
            .clone()
            .ok_or(DispatchError::NotConfigured("AMI gateway"))
    }

    /// The CDR store, or `NotConfigured`.
    pub fn cdr_store(&self) -> Result<Arc<dyn CdrStore>, DispatchError> {
        self.cdr
            .clone()
            .ok_or(DispatchError::NotConfigured("CDR store"))
    }

    /// Binding mode for routes that accept signed input.
    pub fn bind_mode(&self) -> BindMode {
        BindMode::from_flag(self.app_config.signed_input)
    }
}
