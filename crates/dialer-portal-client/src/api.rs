//! Portal endpoints.

use std::fmt;

/// HTTP verb used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalMethod {
    /// Parameters in the query string.
    Get,
    /// Parameters in a form body.
    Post,
}

/// Endpoints the dialer calls on a partner portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortalApi {
    /// Notify the responsible manager of a call outside office hours.
    ManagerCallAfterHours,
    /// Agent extension responsible for a calling number.
    ManagerPhone,
    /// Agent extension responsible for a company.
    ManagerPhoneForCompany,
    /// Show a review popup on the agent's screen.
    ShowCallingReview,
    /// Show an incoming-call popup on the agent's screen.
    ShowCallingPopup,
}

impl PortalApi {
    /// Path relative to the tenant's base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::ManagerCallAfterHours => "manager_call_after_hours/",
            Self::ManagerPhone => "manager_phone/",
            Self::ManagerPhoneForCompany => "manager_phone_for_company/",
            Self::ShowCallingReview => "show_calling_review/",
            Self::ShowCallingPopup => "show_calling_popup/",
        }
    }

    /// HTTP verb.
    pub fn method(&self) -> PortalMethod {
        match self {
            Self::ManagerPhone | Self::ManagerPhoneForCompany => PortalMethod::Get,
            Self::ManagerCallAfterHours | Self::ShowCallingReview | Self::ShowCallingPopup => {
                PortalMethod::Post
            }
        }
    }
}

impl fmt::Display for PortalApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.method() {
            PortalMethod::Get => "GET",
            PortalMethod::Post => "POST",
        };
        write!(f, "{verb} /{}", self.path())
    }
}
