//! Installer lifecycle state, client variant and error reports.

use serde::{Deserialize, Serialize};

/// Overall state of the installer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationState {
    StartingUp,
    CloudInitWait,
    EarlyCommands,
    Waiting,
    NeedsConfirmation,
    Running,
    LateCommands,
    UuRunning,
    UuCancelling,
    Done,
    Error,
}

impl ApplicationState {
    /// Whether the backend will not leave this state on its own.
    pub fn is_final(self) -> bool {
        matches!(self, ApplicationState::Done | ApplicationState::Error)
    }
}

/// Response of `GET /meta/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStatus {
    pub state: ApplicationState,
    pub confirming_tty: String,
    pub error: Option<ErrorReportRef>,
    pub cloud_init_ok: Option<bool>,
    pub interactive: Option<bool>,
    pub echo_syslog_id: String,
    pub log_syslog_id: String,
    pub event_syslog_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReportState {
    Incomplete,
    Loading,
    Done,
    ErrorGenerating,
    ErrorLoading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReportKind {
    BlockProbeFail,
    DiskProbeFail,
    InstallFail,
    ServerRequestFail,
    NetworkFail,
    NetworkClientFail,
    Ui,
    Unknown,
}

/// Reference to a crash report written by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReportRef {
    pub state: ErrorReportState,
    pub base: String,
    pub kind: ErrorReportKind,
    pub seen: bool,
    pub oops_id: Option<String>,
}

/// Which frontend is driving the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientVariant {
    Server,
    Desktop,
    Core,
    WslSetup,
    WslConfiguration,
}

/// What to do once the install has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShutdownMode {
    Reboot,
    Poweroff,
}
