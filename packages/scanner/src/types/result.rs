//! Per-domain scan results.

use serde::{Deserialize, Serialize};

/// Liveness verdict for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteStatus::Active => f.write_str("Active"),
            SiteStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

/// Best-effort business details. Unresolved fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
}

/// Social and Google Business Profile links. Unresolved fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub facebook: String,
    pub instagram: String,
    pub linkedin: String,
    pub gmb: String,
}

/// Report for one input domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Canonical bare domain
    pub domain: String,
    pub status: SiteStatus,
    /// HTTP status, 0 when no response was received
    pub status_code: u16,
    /// Inactivity/anomaly reason, empty if none
    pub reason: String,
    /// URL the accepted response came from, empty when unreachable
    pub final_url: String,
    pub profile: BusinessProfile,
    pub social: SocialProfile,
}

impl ScanResult {
    /// An inactive result with no response and empty profile.
    pub fn unreachable(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            status: SiteStatus::Inactive,
            status_code: 0,
            reason: reason.into(),
            final_url: String::new(),
            profile: BusinessProfile::default(),
            social: SocialProfile::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SiteStatus::Active
    }
}
