//! Network devices and archive mirror selection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpStatus {
    pub enabled: bool,
    pub state: Option<u32>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConfig {
    #[serde(default)]
    pub addresses: Vec<String>,
    pub gateway: Option<String>,
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub searchdomains: Vec<String>,
}

/// A network interface known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDevInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub dev_type: String,
    pub is_connected: bool,
    pub is_used: bool,
    #[serde(default)]
    pub is_virtual: bool,
    pub disabled_reason: Option<String>,
    pub hwaddr: Option<String>,
    pub dhcp4: DhcpStatus,
    pub dhcp6: DhcpStatus,
    pub static4: StaticConfig,
    pub static6: StaticConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WlanSupportInstallState {
    NotNeeded,
    NotAvailable,
    Installing,
    Failed,
    Done,
}

/// Response of `GET /network`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub devices: Vec<NetDevInfo>,
    pub wlan_support_install_state: WlanSupportInstallState,
}

impl NetworkStatus {
    pub fn is_connected(&self) -> bool {
        self.devices.iter().any(|d| d.is_connected)
    }
}

/// Response of `GET /mirror`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorGet {
    pub elected: Option<String>,
    #[serde(default)]
    pub candidates: Vec<String>,
    pub staged: Option<String>,
    pub relevant: bool,
    pub use_during_installation: bool,
}

/// Body of `POST /mirror`. Every field left `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorPost {
    pub elected: Option<String>,
    pub candidates: Option<Vec<String>>,
    pub staged: Option<String>,
    pub use_during_installation: Option<bool>,
}

impl MirrorPost {
    pub fn elect(mirror: impl Into<String>) -> Self {
        Self {
            elected: Some(mirror.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MirrorPostResponse {
    Ok,
    NoUsableMirror,
}
