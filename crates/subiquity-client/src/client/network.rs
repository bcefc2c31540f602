//! Network, proxy and archive mirror.

use serde_json::Value;
use subiquity_types::codec;
use subiquity_types::redact::mask_url_credentials;
use subiquity_types::{MirrorGet, MirrorPost, MirrorPostResponse, NetworkStatus};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    pub async fn network(&self) -> Result<NetworkStatus, ClientError> {
        self.get("network", "/network").send().await
    }

    pub async fn has_network(&self) -> Result<bool, ClientError> {
        self.get("has_network", "/network/has_network").send().await
    }

    /// Configured HTTP proxy URL; empty when none.
    pub async fn proxy(&self) -> Result<String, ClientError> {
        self.get("proxy", "/proxy")
            .send_with(codec::decode, |url: &String| {
                Some(Value::String(mask_url_credentials(url)).to_string())
            })
            .await
    }

    pub async fn set_proxy(&self, url: &str) -> Result<(), ClientError> {
        self.post("set_proxy", "/proxy")
            .json_logged(url, &mask_url_credentials(url))
            .send_empty()
            .await
    }

    pub async fn mirror(&self) -> Result<MirrorGet, ClientError> {
        self.get("mirror", "/mirror").send().await
    }

    pub async fn set_mirror(&self, mirror: &MirrorPost) -> Result<MirrorPostResponse, ClientError> {
        self.post("set_mirror", "/mirror").json(mirror).send().await
    }
}
