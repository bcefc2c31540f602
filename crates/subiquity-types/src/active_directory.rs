//! Active Directory enrolment.

use serde::{Deserialize, Serialize};

use crate::redact::Redact;

/// Credentials used to join an Active Directory domain.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct AdConnectionInfo {
    pub admin_name: String,
    pub domain_name: String,
    #[redact]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdAdminNameValidation {
    Ok,
    Empty,
    InvalidChars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdDomainNameValidation {
    Ok,
    Empty,
    TooLong,
    InvalidChars,
    StartDot,
    EndDot,
    StartHyphen,
    EndHyphen,
    MultipleDots,
    RealmNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdPasswordValidation {
    Ok,
    Empty,
}

/// Outcome of the domain join performed at the end of the install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdJoinResult {
    Ok,
    JoinError,
    EmptyHostname,
    PamError,
    Unknown,
}
