//! Third-party drivers, restricted codecs and Ubuntu Pro.

use serde::{Deserialize, Serialize};

use crate::redact::Redact;

/// Response of `GET /drivers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriversResponse {
    pub install: bool,
    /// `None` while the backend is still searching.
    pub drivers: Option<Vec<String>>,
    pub local_only: bool,
    pub search_drivers: bool,
}

/// Body of `POST /drivers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriversPayload {
    pub install: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecsData {
    pub install: bool,
}

/// Body of `POST /ubuntu_pro`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct UbuntuProInfo {
    #[redact]
    pub token: String,
}

/// Response of `GET /ubuntu_pro`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct UbuntuProResponse {
    #[redact]
    pub token: String,
    pub has_network: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UbuntuProCheckTokenStatus {
    ValidToken,
    InvalidToken,
    ExpiredToken,
    UnknownError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UbuntuProService {
    pub name: String,
    pub description: String,
    pub auto_enabled: bool,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct UbuntuProSubscription {
    pub contract_name: String,
    pub account_name: String,
    #[redact]
    pub contract_token: String,
    #[serde(default)]
    pub services: Vec<UbuntuProService>,
}

/// Response of `GET /ubuntu_pro/check_token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct UbuntuProCheckTokenAnswer {
    pub status: UbuntuProCheckTokenStatus,
    #[redact(nested)]
    pub subscription: Option<UbuntuProSubscription>,
}
