//! Storage model: disks, partitions, gaps and guided partitioning.
//!
//! A disk's layout is an ordered list of [`PartitionOrGap`]. The backend
//! returns the whole [`StorageResponseV2`] after every mutating call, so a
//! snapshot decoded here always supersedes the previous one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, DecodeError, Tagged, Union, union_serde};
use crate::meta::ErrorReportRef;
use crate::redact::Redact;

/// Storage probing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeStatus {
    Probing,
    Failed,
    Done,
}

/// Operating system detected on a partition by os-prober.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsProber {
    pub long: String,
    pub label: String,
    #[serde(rename = "type")]
    pub os_type: String,
    pub subpath: Option<String>,
    pub version: Option<String>,
}

/// A partition on a disk.
///
/// Every field except `annotations` and `is_in_use` is optional: requests
/// that create a partition send only what the caller decided (typically
/// `size`, `format` and `mount`), the backend fills in the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub size: Option<u64>,
    pub number: Option<u32>,
    pub preserve: Option<bool>,
    /// Wipe mode, e.g. `"superblock"`.
    pub wipe: Option<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    pub mount: Option<String>,
    pub format: Option<String>,
    pub grub_device: Option<bool>,
    pub boot: Option<bool>,
    pub os: Option<OsProber>,
    pub offset: Option<u64>,
    pub estimated_min_size: Option<u64>,
    pub resize: Option<bool>,
    pub path: Option<String>,
    #[serde(default)]
    pub is_in_use: bool,
}

impl Tagged for Partition {
    const TAG: &'static str = "Partition";
}

impl Partition {
    pub fn with_size(self, size: u64) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }

    pub fn with_format(self, format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..self
        }
    }

    pub fn with_mount(self, mount: impl Into<String>) -> Self {
        Self {
            mount: Some(mount.into()),
            ..self
        }
    }

    pub fn with_wipe(self, wipe: impl Into<String>) -> Self {
        Self {
            wipe: Some(wipe.into()),
            ..self
        }
    }

    pub fn with_preserve(self, preserve: bool) -> Self {
        Self {
            preserve: Some(preserve),
            ..self
        }
    }

    pub fn with_resize(self, resize: bool) -> Self {
        Self {
            resize: Some(resize),
            ..self
        }
    }
}

/// Whether a gap can hold a new partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapUsable {
    #[default]
    Yes,
    TooManyPrimaryParts,
}

/// Unpartitioned space on a disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub offset: u64,
    pub size: u64,
    #[serde(default)]
    pub usable: GapUsable,
}

impl Tagged for Gap {
    const TAG: &'static str = "Gap";
}

/// One entry of a disk's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionOrGap {
    Partition(Partition),
    Gap(Gap),
}

impl PartitionOrGap {
    /// Size in bytes. Always known for gaps.
    pub fn size(&self) -> Option<u64> {
        match self {
            PartitionOrGap::Partition(p) => p.size,
            PartitionOrGap::Gap(g) => Some(g.size),
        }
    }

    /// Offset from the start of the disk in bytes. Always known for gaps.
    pub fn offset(&self) -> Option<u64> {
        match self {
            PartitionOrGap::Partition(p) => p.offset,
            PartitionOrGap::Gap(g) => Some(g.offset),
        }
    }

    pub fn as_partition(&self) -> Option<&Partition> {
        match self {
            PartitionOrGap::Partition(p) => Some(p),
            PartitionOrGap::Gap(_) => None,
        }
    }

    pub fn as_gap(&self) -> Option<&Gap> {
        match self {
            PartitionOrGap::Gap(g) => Some(g),
            PartitionOrGap::Partition(_) => None,
        }
    }
}

impl Union for PartitionOrGap {
    const NAME: &'static str = "PartitionOrGap";

    fn tag(&self) -> &'static str {
        match self {
            PartitionOrGap::Partition(_) => Partition::TAG,
            PartitionOrGap::Gap(_) => Gap::TAG,
        }
    }

    fn decode_tagged(tag: &str, value: Value) -> Result<Self, DecodeError> {
        match tag {
            "Partition" => codec::decode_variant(value).map(PartitionOrGap::Partition),
            "Gap" => codec::decode_variant(value).map(PartitionOrGap::Gap),
            _ => Err(DecodeError::unknown_discriminator::<Self>(tag)),
        }
    }
}

union_serde!(PartitionOrGap { Partition, Gap });

impl From<Partition> for PartitionOrGap {
    fn from(p: Partition) -> Self {
        PartitionOrGap::Partition(p)
    }
}

impl From<Gap> for PartitionOrGap {
    fn from(g: Gap) -> Self {
        PartitionOrGap::Gap(g)
    }
}

/// A block device as seen by the installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub disk_type: String,
    pub size: u64,
    pub usage_labels: Vec<String>,
    pub partitions: Vec<PartitionOrGap>,
    pub ok_for_guided: bool,
    /// Partition table kind (`"gpt"`, `"msdos"`), absent when unformatted.
    pub ptable: Option<String>,
    pub preserve: bool,
    pub path: Option<String>,
    pub boot_device: bool,
    #[serde(default)]
    pub can_be_boot_device: bool,
    pub model: Option<String>,
    pub vendor: Option<String>,
    #[serde(default)]
    pub has_in_use_partition: bool,
}

impl Disk {
    /// Partitions only, in layout order.
    pub fn iter_partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter().filter_map(PartitionOrGap::as_partition)
    }

    /// Gaps only, in layout order.
    pub fn iter_gaps(&self) -> impl Iterator<Item = &Gap> {
        self.partitions.iter().filter_map(PartitionOrGap::as_gap)
    }

    /// Largest gap on the disk, if any.
    pub fn largest_gap(&self) -> Option<&Gap> {
        self.iter_gaps().max_by_key(|g| g.size)
    }
}

/// Full storage state returned by every `/storage/v2` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageResponseV2 {
    pub status: ProbeStatus,
    pub error_report: Option<ErrorReportRef>,
    #[serde(default)]
    pub disks: Vec<Disk>,
    #[serde(default)]
    pub need_root: bool,
    #[serde(default)]
    pub need_boot: bool,
    #[serde(default)]
    pub install_minimum_size: u64,
}

impl StorageResponseV2 {
    pub fn disk(&self, id: &str) -> Option<&Disk> {
        self.disks.iter().find(|d| d.id == id)
    }
}

/// A partitioning scheme offered by guided storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuidedCapability {
    Manual,
    Direct,
    Lvm,
    LvmLuks,
    Zfs,
    ZfsLuksKeystore,
    CoreBootEncrypted,
    CoreBootUnencrypted,
    CoreBootPreferEncrypted,
    CoreBootPreferUnencrypted,
    Dd,
}

/// Why a capability is not available for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuidedDisallowedCapabilityReason {
    TooSmall,
    CoreBootEncryptionUnavailable,
    NotUefi,
    ThirdPartyDrivers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedDisallowedCapability {
    pub capability: GuidedCapability,
    pub reason: GuidedDisallowedCapabilityReason,
    pub message: Option<String>,
}

/// Wipe a whole disk and install on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedStorageTargetReformat {
    pub disk_id: String,
    #[serde(default)]
    pub allowed: Vec<GuidedCapability>,
    #[serde(default)]
    pub disallowed: Vec<GuidedDisallowedCapability>,
}

impl Tagged for GuidedStorageTargetReformat {
    const TAG: &'static str = "GuidedStorageTargetReformat";
}

/// Shrink an existing partition and install in the freed space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedStorageTargetResize {
    pub disk_id: String,
    pub partition_number: u32,
    pub new_size: u64,
    pub minimum: Option<u64>,
    pub recommended: Option<u64>,
    pub maximum: Option<u64>,
    #[serde(default)]
    pub allowed: Vec<GuidedCapability>,
    #[serde(default)]
    pub disallowed: Vec<GuidedDisallowedCapability>,
}

impl Tagged for GuidedStorageTargetResize {
    const TAG: &'static str = "GuidedStorageTargetResize";
}

impl GuidedStorageTargetResize {
    /// Same target with a different requested partition size.
    pub fn with_new_size(self, new_size: u64) -> Self {
        Self { new_size, ..self }
    }
}

/// Install into an existing gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedStorageTargetUseGap {
    pub disk_id: String,
    #[serde(serialize_with = "codec::serialize_tagged")]
    pub gap: Gap,
    #[serde(default)]
    pub allowed: Vec<GuidedCapability>,
    #[serde(default)]
    pub disallowed: Vec<GuidedDisallowedCapability>,
}

impl Tagged for GuidedStorageTargetUseGap {
    const TAG: &'static str = "GuidedStorageTargetUseGap";
}

/// Leave partitioning to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedStorageTargetManual {
    #[serde(default)]
    pub allowed: Vec<GuidedCapability>,
    #[serde(default)]
    pub disallowed: Vec<GuidedDisallowedCapability>,
}

impl Tagged for GuidedStorageTargetManual {
    const TAG: &'static str = "GuidedStorageTargetManual";
}

/// Where guided partitioning should install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedStorageTarget {
    Reformat(GuidedStorageTargetReformat),
    Resize(GuidedStorageTargetResize),
    UseGap(GuidedStorageTargetUseGap),
    Manual(GuidedStorageTargetManual),
}

impl GuidedStorageTarget {
    pub fn allowed(&self) -> &[GuidedCapability] {
        match self {
            GuidedStorageTarget::Reformat(t) => &t.allowed,
            GuidedStorageTarget::Resize(t) => &t.allowed,
            GuidedStorageTarget::UseGap(t) => &t.allowed,
            GuidedStorageTarget::Manual(t) => &t.allowed,
        }
    }

    pub fn disallowed(&self) -> &[GuidedDisallowedCapability] {
        match self {
            GuidedStorageTarget::Reformat(t) => &t.disallowed,
            GuidedStorageTarget::Resize(t) => &t.disallowed,
            GuidedStorageTarget::UseGap(t) => &t.disallowed,
            GuidedStorageTarget::Manual(t) => &t.disallowed,
        }
    }

    /// The disk this target installs on; `None` for manual partitioning.
    pub fn disk_id(&self) -> Option<&str> {
        match self {
            GuidedStorageTarget::Reformat(t) => Some(&t.disk_id),
            GuidedStorageTarget::Resize(t) => Some(&t.disk_id),
            GuidedStorageTarget::UseGap(t) => Some(&t.disk_id),
            GuidedStorageTarget::Manual(_) => None,
        }
    }

    pub fn is_allowed(&self, capability: GuidedCapability) -> bool {
        self.allowed().contains(&capability)
    }
}

impl Union for GuidedStorageTarget {
    const NAME: &'static str = "GuidedStorageTarget";

    fn tag(&self) -> &'static str {
        match self {
            GuidedStorageTarget::Reformat(_) => GuidedStorageTargetReformat::TAG,
            GuidedStorageTarget::Resize(_) => GuidedStorageTargetResize::TAG,
            GuidedStorageTarget::UseGap(_) => GuidedStorageTargetUseGap::TAG,
            GuidedStorageTarget::Manual(_) => GuidedStorageTargetManual::TAG,
        }
    }

    fn decode_tagged(tag: &str, value: Value) -> Result<Self, DecodeError> {
        match tag {
            "GuidedStorageTargetReformat" => {
                codec::decode_variant(value).map(GuidedStorageTarget::Reformat)
            }
            "GuidedStorageTargetResize" => {
                codec::decode_variant(value).map(GuidedStorageTarget::Resize)
            }
            "GuidedStorageTargetUseGap" => {
                codec::decode_variant(value).map(GuidedStorageTarget::UseGap)
            }
            "GuidedStorageTargetManual" => {
                codec::decode_variant(value).map(GuidedStorageTarget::Manual)
            }
            _ => Err(DecodeError::unknown_discriminator::<Self>(tag)),
        }
    }
}

union_serde!(GuidedStorageTarget {
    Reformat,
    Resize,
    UseGap,
    Manual
});

/// How much of the target guided partitioning should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingPolicy {
    Scaled,
    All,
}

/// Where to store the recovery key of an encrypted install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryKey {
    pub live_location: Option<String>,
    pub backup_location: Option<String>,
}

/// The user's guided partitioning decision.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct GuidedChoiceV2 {
    pub target: GuidedStorageTarget,
    pub capability: GuidedCapability,
    /// Encryption passphrase for LUKS/ZFS/core-boot capabilities.
    #[redact]
    pub password: Option<String>,
    pub recovery_key: Option<RecoveryKey>,
    pub sizing_policy: Option<SizingPolicy>,
    #[serde(default)]
    pub reset_partition: bool,
    pub reset_partition_size: Option<u64>,
}

impl GuidedChoiceV2 {
    pub fn new(target: GuidedStorageTarget, capability: GuidedCapability) -> Self {
        Self {
            target,
            capability,
            password: None,
            recovery_key: None,
            sizing_policy: None,
            reset_partition: false,
            reset_partition_size: None,
        }
    }

    pub fn with_password(self, password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            ..self
        }
    }

    pub fn with_capability(self, capability: GuidedCapability) -> Self {
        Self { capability, ..self }
    }

    pub fn with_sizing_policy(self, sizing_policy: SizingPolicy) -> Self {
        Self {
            sizing_policy: Some(sizing_policy),
            ..self
        }
    }

    pub fn with_recovery_key(self, recovery_key: RecoveryKey) -> Self {
        Self {
            recovery_key: Some(recovery_key),
            ..self
        }
    }
}

/// Guided storage state: the offered targets and the configured choice.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Redact)]
pub struct GuidedStorageResponseV2 {
    pub status: ProbeStatus,
    pub error_report: Option<ErrorReportRef>,
    #[redact(nested)]
    pub configured: Option<GuidedChoiceV2>,
    #[serde(default)]
    pub targets: Vec<GuidedStorageTarget>,
}

/// Body of `POST /storage/v2/add_partition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddPartitionV2 {
    pub disk_id: String,
    #[serde(serialize_with = "codec::serialize_tagged")]
    pub partition: Partition,
    #[serde(serialize_with = "codec::serialize_tagged")]
    pub gap: Gap,
}

/// Body of `POST /storage/v2/edit_partition` and `/delete_partition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifyPartitionV2 {
    pub disk_id: String,
    #[serde(serialize_with = "codec::serialize_tagged")]
    pub partition: Partition,
}

/// Body of `POST /storage/v2/reformat_disk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReformatDisk {
    pub disk_id: String,
    pub ptable: Option<String>,
}
