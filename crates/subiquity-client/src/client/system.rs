//! Time zone, install source and installer self-refresh.

use subiquity_types::{Change, RefreshStatus, SourceSelectionAndSetting, TimeZoneInfo};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    pub async fn timezone(&self) -> Result<TimeZoneInfo, ClientError> {
        self.get("timezone", "/timezone").send().await
    }

    /// Set the time zone, e.g. `"Europe/Paris"`, or `"geoip"` to let the
    /// backend guess.
    pub async fn set_timezone(&self, tz: &str) -> Result<(), ClientError> {
        self.post("set_timezone", "/timezone")
            .query("tz", tz)
            .send_empty()
            .await
    }

    pub async fn source(&self) -> Result<SourceSelectionAndSetting, ClientError> {
        self.get("source", "/source").send().await
    }

    pub async fn set_source(&self, source_id: &str, search_drivers: bool) -> Result<(), ClientError> {
        self.post("set_source", "/source")
            .query("source_id", source_id)
            .query("search_drivers", &search_drivers)
            .send_empty()
            .await
    }

    /// Whether a newer installer is available. With `wait` the backend
    /// holds the answer until its check has finished.
    pub async fn check_refresh(&self, wait: bool) -> Result<RefreshStatus, ClientError> {
        self.get("check_refresh", "/refresh")
            .query("wait", &wait)
            .send()
            .await
    }

    /// Start refreshing the installer; returns the snapd change id.
    pub async fn start_refresh(&self) -> Result<String, ClientError> {
        self.post("start_refresh", "/refresh").send().await
    }

    pub async fn refresh_progress(&self, change_id: &str) -> Result<Change, ClientError> {
        self.get("refresh_progress", "/refresh/progress")
            .query("change_id", change_id)
            .send()
            .await
    }
}
