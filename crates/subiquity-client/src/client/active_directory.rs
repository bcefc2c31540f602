//! Active Directory enrolment.

use subiquity_types::redact::mask;
use subiquity_types::{
    AdAdminNameValidation, AdConnectionInfo, AdDomainNameValidation, AdJoinResult,
    AdPasswordValidation,
};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    pub async fn has_active_directory_support(&self) -> Result<bool, ClientError> {
        self.get("has_active_directory_support", "/active_directory/has_support")
            .send()
            .await
    }

    pub async fn active_directory(&self) -> Result<AdConnectionInfo, ClientError> {
        self.get("active_directory", "/active_directory")
            .send_redacted()
            .await
    }

    pub async fn set_active_directory(&self, info: &AdConnectionInfo) -> Result<(), ClientError> {
        self.post("set_active_directory", "/active_directory")
            .json_redacted(info)
            .send_empty()
            .await
    }

    /// Every problem found with `domain_name`; `[OK]` when there is none.
    pub async fn check_ad_domain_name(
        &self,
        domain_name: &str,
    ) -> Result<Vec<AdDomainNameValidation>, ClientError> {
        self.post("check_ad_domain_name", "/active_directory/check_domain_name")
            .json(domain_name)
            .send()
            .await
    }

    pub async fn check_ad_admin_name(
        &self,
        admin_name: &str,
    ) -> Result<AdAdminNameValidation, ClientError> {
        self.post("check_ad_admin_name", "/active_directory/check_admin_name")
            .json(admin_name)
            .send()
            .await
    }

    pub async fn check_ad_password(
        &self,
        password: &str,
    ) -> Result<AdPasswordValidation, ClientError> {
        self.post("check_ad_password", "/active_directory/check_password")
            .json_logged(password, &mask(password))
            .send()
            .await
    }

    /// Outcome of the domain join. With `wait` the backend holds the
    /// answer until the join has been attempted.
    pub async fn ad_join_result(&self, wait: bool) -> Result<AdJoinResult, ClientError> {
        self.get("ad_join_result", "/active_directory/join_result")
            .query("wait", &wait)
            .send()
            .await
    }
}
