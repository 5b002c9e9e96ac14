//! # dialer-portal-client -- Signed client for tenant partner portals
//!
//! Each tenant ("agency", keyed by country code) runs its own portal. The
//! dialer calls it to notify managers and to look up which agent owns a
//! caller. Every request is signed with the tenant's secret using the same
//! envelope scheme as inbound signed requests:
//!
//! | Parameter    | Content                                     |
//! |--------------|---------------------------------------------|
//! | `data`       | URL-safe base64 of the JSON payload         |
//! | `sign`       | hex HMAC-SHA256 of the payload bytes        |
//! | `company_id` | tenant's `CompanyId`                        |
//!
//! `GET` endpoints carry the parameters in the query string, `POST`
//! endpoints as a form body. Portal responses are returned verbatim as text.
//!
//! ## URL convention
//!
//! Endpoint paths are joined onto the tenant's `ApiBaseUrl`, which should
//! end with `/` (e.g. `https://portal.example/api/dialer/`).

pub mod api;
pub mod client;
pub mod error;

pub use api::PortalApi;
pub use client::PortalClient;
pub use error::PortalError;
