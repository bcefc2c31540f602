//! Installer lifecycle: status, client variant, confirmation, shutdown.

use subiquity_types::{ApplicationState, ApplicationStatus, ClientVariant, ShutdownMode};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    /// Current backend status.
    ///
    /// With `current` set this is a long-poll: the backend answers once its
    /// state differs from `current`.
    pub async fn status(
        &self,
        current: Option<ApplicationState>,
    ) -> Result<ApplicationStatus, ClientError> {
        self.get("status", "/meta/status")
            .query_opt("cur", current.as_ref())
            .send()
            .await
    }

    pub async fn variant(&self) -> Result<ClientVariant, ClientError> {
        self.get("variant", "/meta/client_variant").send().await
    }

    pub async fn set_variant(&self, variant: ClientVariant) -> Result<(), ClientError> {
        self.post("set_variant", "/meta/client_variant")
            .json(&variant)
            .send_empty()
            .await
    }

    /// Tell the backend the named endpoints need no further input.
    pub async fn mark_configured(&self, endpoint_names: &[&str]) -> Result<(), ClientError> {
        self.post("mark_configured", "/meta/mark_configured")
            .query("endpoint_names", endpoint_names)
            .send_empty()
            .await
    }

    /// Confirm the destructive part of the install from terminal `tty`.
    pub async fn confirm(&self, tty: &str) -> Result<(), ClientError> {
        self.post("confirm", "/meta/confirm")
            .query("tty", tty)
            .send_empty()
            .await
    }

    pub async fn shutdown(&self, mode: ShutdownMode, immediate: bool) -> Result<(), ClientError> {
        self.post("shutdown", "/shutdown")
            .query("mode", &mode)
            .query("immediate", &immediate)
            .send_empty()
            .await
    }
}
