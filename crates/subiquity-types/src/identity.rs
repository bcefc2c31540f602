//! User identity and SSH setup.

use serde::{Deserialize, Serialize};

use crate::redact::Redact;

/// The first user account and machine name.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct IdentityData {
    pub realname: String,
    pub username: String,
    /// Password hash in `crypt(3)` format.
    #[redact]
    pub crypted_password: String,
    pub hostname: String,
}

impl IdentityData {
    pub fn with_hostname(self, hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..self
        }
    }

    pub fn with_crypted_password(self, crypted_password: impl Into<String>) -> Self {
        Self {
            crypted_password: crypted_password.into(),
            ..self
        }
    }
}

/// Result of `GET /identity/validate_username`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsernameValidation {
    Ok,
    AlreadyInUse,
    SystemReserved,
    InvalidChars,
    TooLong,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshData {
    pub install_server: bool,
    pub allow_pw: bool,
    #[serde(default)]
    pub authorized_keys: Vec<String>,
}
