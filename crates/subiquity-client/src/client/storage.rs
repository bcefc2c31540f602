//! Storage v2: probing, manual partitioning and guided partitioning.
//!
//! Every mutating call returns the complete [`StorageResponseV2`] as the
//! backend now sees it; callers replace their previous snapshot with it.

use subiquity_types::{
    AddPartitionV2, Disk, Gap, GuidedChoiceV2, GuidedStorageResponseV2, ModifyPartitionV2,
    Partition, ReformatDisk, StorageResponseV2,
};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    /// Current storage configuration. With `wait` the backend holds the
    /// answer until probing has finished.
    pub async fn storage_v2(&self, wait: bool) -> Result<StorageResponseV2, ClientError> {
        self.get("storage_v2", "/storage/v2")
            .query("wait", &wait)
            .send()
            .await
    }

    /// The storage configuration as probed, before any edits.
    pub async fn original_storage_v2(&self) -> Result<StorageResponseV2, ClientError> {
        self.get("original_storage_v2", "/storage/v2/orig_config")
            .send()
            .await
    }

    /// Commit the current storage configuration.
    pub async fn set_storage_v2(&self) -> Result<StorageResponseV2, ClientError> {
        self.post("set_storage_v2", "/storage/v2").send().await
    }

    /// Drop all edits and return to the probed configuration.
    pub async fn reset_storage_v2(&self) -> Result<StorageResponseV2, ClientError> {
        self.post("reset_storage_v2", "/storage/v2/reset")
            .send()
            .await
    }

    pub async fn guided_storage_v2(&self) -> Result<GuidedStorageResponseV2, ClientError> {
        self.get("guided_storage_v2", "/storage/v2/guided")
            .send_redacted()
            .await
    }

    pub async fn set_guided_storage_v2(
        &self,
        choice: &GuidedChoiceV2,
    ) -> Result<GuidedStorageResponseV2, ClientError> {
        self.post("set_guided_storage_v2", "/storage/v2/guided")
            .json_redacted(choice)
            .send_redacted()
            .await
    }

    /// Create `partition` inside `gap` on disk `disk_id`.
    pub async fn add_partition_v2(
        &self,
        disk_id: &str,
        gap: Gap,
        partition: Partition,
    ) -> Result<StorageResponseV2, ClientError> {
        let request = AddPartitionV2 {
            disk_id: disk_id.to_string(),
            partition,
            gap,
        };
        self.post("add_partition_v2", "/storage/v2/add_partition")
            .json(&request)
            .send()
            .await
    }

    /// Change format, mount point, wipe or size of an existing partition.
    pub async fn edit_partition_v2(
        &self,
        disk_id: &str,
        partition: Partition,
    ) -> Result<StorageResponseV2, ClientError> {
        let request = ModifyPartitionV2 {
            disk_id: disk_id.to_string(),
            partition,
        };
        self.post("edit_partition_v2", "/storage/v2/edit_partition")
            .json(&request)
            .send()
            .await
    }

    pub async fn delete_partition_v2(
        &self,
        disk_id: &str,
        partition: Partition,
    ) -> Result<StorageResponseV2, ClientError> {
        let request = ModifyPartitionV2 {
            disk_id: disk_id.to_string(),
            partition,
        };
        self.post("delete_partition_v2", "/storage/v2/delete_partition")
            .json(&request)
            .send()
            .await
    }

    /// Replace the disk's partition table with an empty one.
    pub async fn reformat_disk_v2(
        &self,
        request: &ReformatDisk,
    ) -> Result<StorageResponseV2, ClientError> {
        self.post("reformat_disk_v2", "/storage/v2/reformat_disk")
            .json(request)
            .send()
            .await
    }

    pub async fn add_boot_partition_v2(
        &self,
        disk_id: &str,
    ) -> Result<StorageResponseV2, ClientError> {
        self.post("add_boot_partition_v2", "/storage/v2/add_boot_partition")
            .query("disk_id", disk_id)
            .send()
            .await
    }

    /// Whether Intel RST is enabled in firmware.
    pub async fn has_rst(&self) -> Result<bool, ClientError> {
        self.get("has_rst", "/storage/has_rst").send().await
    }

    /// Disks carrying BitLocker-encrypted partitions.
    pub async fn has_bitlocker(&self) -> Result<Vec<Disk>, ClientError> {
        self.get("has_bitlocker", "/storage/has_bitlocker")
            .send()
            .await
    }
}
