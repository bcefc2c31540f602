//! First user, hostname and SSH server.

use subiquity_types::{IdentityData, SshData, UsernameValidation};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    pub async fn identity(&self) -> Result<IdentityData, ClientError> {
        self.get("identity", "/identity").send_redacted().await
    }

    pub async fn set_identity(&self, identity: &IdentityData) -> Result<(), ClientError> {
        self.post("set_identity", "/identity")
            .json_redacted(identity)
            .send_empty()
            .await
    }

    pub async fn validate_username(&self, username: &str) -> Result<UsernameValidation, ClientError> {
        self.get("validate_username", "/identity/validate_username")
            .query("username", username)
            .send()
            .await
    }

    pub async fn ssh(&self) -> Result<SshData, ClientError> {
        self.get("ssh", "/ssh").send().await
    }

    pub async fn set_ssh(&self, ssh: &SshData) -> Result<(), ClientError> {
        self.post("set_ssh", "/ssh").json(ssh).send_empty().await
    }
}
