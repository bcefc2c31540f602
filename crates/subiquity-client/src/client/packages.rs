//! Third-party drivers, restricted codecs and Ubuntu Pro.

use subiquity_types::{
    CodecsData, DriversPayload, DriversResponse, UbuntuProCheckTokenAnswer, UbuntuProInfo,
    UbuntuProResponse,
};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    /// Driver search state. With `wait` the backend holds the answer until
    /// the search has finished.
    pub async fn drivers(&self, wait: bool) -> Result<DriversResponse, ClientError> {
        self.get("drivers", "/drivers")
            .query("wait", &wait)
            .send()
            .await
    }

    pub async fn set_drivers(&self, install: bool) -> Result<(), ClientError> {
        self.post("set_drivers", "/drivers")
            .json(&DriversPayload { install })
            .send_empty()
            .await
    }

    pub async fn codecs(&self) -> Result<CodecsData, ClientError> {
        self.get("codecs", "/codecs").send().await
    }

    pub async fn set_codecs(&self, install: bool) -> Result<(), ClientError> {
        self.post("set_codecs", "/codecs")
            .json(&CodecsData { install })
            .send_empty()
            .await
    }

    pub async fn ubuntu_pro(&self) -> Result<UbuntuProResponse, ClientError> {
        self.get("ubuntu_pro", "/ubuntu_pro").send_redacted().await
    }

    pub async fn set_ubuntu_pro(&self, token: &str) -> Result<(), ClientError> {
        self.post("set_ubuntu_pro", "/ubuntu_pro")
            .json_redacted(&UbuntuProInfo {
                token: token.to_string(),
            })
            .send_empty()
            .await
    }

    /// Look up the subscription behind `token`.
    pub async fn check_ubuntu_pro_token(
        &self,
        token: &str,
    ) -> Result<UbuntuProCheckTokenAnswer, ClientError> {
        self.get("check_ubuntu_pro_token", "/ubuntu_pro/check_token")
            .secret_query("token", token)
            .send_redacted()
            .await
    }
}
