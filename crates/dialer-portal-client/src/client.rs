//! HTTP client for partner portals.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use dialer_core::AgencySettings;
use dialer_crypto::SignedEnvelope;
use serde_json::json;

use crate::api::{PortalApi, PortalMethod};
use crate::error::PortalError;

/// Calling number used to probe a portal's `manager_phone` endpoint.
pub const PROBE_PHONE: &str = "6916";

/// Signed client for every configured tenant portal.
///
/// The underlying `reqwest::Client` is built once and shared by clones.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    agencies: Arc<BTreeMap<String, AgencySettings>>,
}

impl PortalClient {
    /// Build a client for the given tenant table.
    pub fn new(
        agencies: BTreeMap<String, AgencySettings>,
        timeout_secs: u64,
    ) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PortalError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            agencies: Arc::new(agencies),
        })
    }

    /// Configured tenant countries, in sorted order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.agencies.keys().map(String::as_str)
    }

    /// Notify the manager responsible for `calling_phone` of an after-hours call.
    pub async fn manager_call_after_hours(
        &self,
        country: &str,
        calling_phone: &str,
    ) -> Result<String, PortalError> {
        let agency = self.agency(country)?;
        let payload = json!({
            "calling_phone": calling_phone,
            "CompanyId": agency.company_id,
        });
        self.send(country, agency, PortalApi::ManagerCallAfterHours, &payload)
            .await
    }

    /// Agent extension responsible for `calling_phone`.
    pub async fn manager_phone(
        &self,
        country: &str,
        calling_phone: &str,
    ) -> Result<String, PortalError> {
        let agency = self.agency(country)?;
        let payload = json!({
            "calling_phone": calling_phone,
            "CompanyId": agency.company_id,
        });
        self.send(country, agency, PortalApi::ManagerPhone, &payload)
            .await
    }

    /// Agent extension responsible for the company with portal id `id`.
    pub async fn manager_phone_for_company(
        &self,
        country: &str,
        id: &str,
    ) -> Result<String, PortalError> {
        let agency = self.agency(country)?;
        let payload = json!({
            "id": id,
            "CompanyId": agency.company_id,
        });
        self.send(country, agency, PortalApi::ManagerPhoneForCompany, &payload)
            .await
    }

    /// Ask the portal to show a review popup to `inner_number`.
    pub async fn show_calling_review(
        &self,
        country: &str,
        review_href: &str,
        inner_number: &str,
    ) -> Result<String, PortalError> {
        let agency = self.agency(country)?;
        let payload = json!({
            "review_href": review_href,
            "inner_number": inner_number,
            "CompanyId": agency.company_id,
        });
        self.send(country, agency, PortalApi::ShowCallingReview, &payload)
            .await
    }

    /// Ask the portal to show an incoming-call popup to `inner_number`.
    pub async fn show_calling_popup(
        &self,
        country: &str,
        inner_number: &str,
        calling_phone: &str,
    ) -> Result<String, PortalError> {
        let agency = self.agency(country)?;
        let payload = json!({
            "inner_number": inner_number,
            "calling_phone": calling_phone,
            "CompanyId": agency.company_id,
        });
        self.send(country, agency, PortalApi::ShowCallingPopup, &payload)
            .await
    }

    /// Probe a tenant portal with a `manager_phone` lookup.
    pub async fn check(&self, country: &str) -> Result<(), PortalError> {
        self.manager_phone(country, PROBE_PHONE).await.map(|_| ())
    }

    fn agency(&self, country: &str) -> Result<&AgencySettings, PortalError> {
        self.agencies
            .get(country)
            .ok_or_else(|| PortalError::UnknownTenant(country.to_string()))
    }

    async fn send(
        &self,
        country: &str,
        agency: &AgencySettings,
        api: PortalApi,
        payload: &serde_json::Value,
    ) -> Result<String, PortalError> {
        let endpoint = api.to_string();
        let url = agency
            .api_base_url
            .join(api.path())
            .map_err(|e| PortalError::Url {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let envelope = SignedEnvelope::seal(payload, country, &agency.secret)?;
        let params = [
            ("data", envelope.data.as_str()),
            ("sign", envelope.sign.as_str()),
            ("company_id", agency.company_id.as_str()),
        ];

        tracing::debug!(%endpoint, country, "calling partner portal");
        let request = match api.method() {
            PortalMethod::Get => self.http.get(url).query(&params),
            PortalMethod::Post => self.http.post(url).form(&params),
        };
        let resp = request.send().await.map_err(|e| PortalError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| PortalError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        if !status.is_success() {
            return Err(PortalError::ApiError {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
