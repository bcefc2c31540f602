#![deny(unsafe_code)]

//! Request/response model for the installer backend HTTP API.
//!
//! Every payload exchanged with the backend has a typed counterpart here.
//! Three families are polymorphic on the wire and are modelled as enums
//! dispatched on the `$type` discriminator (see [`codec`]):
//!
//! - [`PartitionOrGap`]: a disk region, either a partition or free space
//! - [`GuidedStorageTarget`]: where guided partitioning should install
//! - [`AnyStep`]: one step of the keyboard detection wizard
//!
//! All other types are flat records. Values are snapshots: nothing in this
//! crate mutates a decoded value in place. Records that hold secrets derive
//! [`Redact`](redact::Redact) so they can be logged safely.

// Lets `#[derive(Redact)]` expand to `::subiquity_types::...` inside this crate.
extern crate self as subiquity_types;

/// Active Directory enrolment payloads.
pub mod active_directory;
/// Discriminator dispatch, tagged encoding and decode errors.
pub mod codec;
/// Identity, username validation and SSH setup.
pub mod identity;
/// Keyboard setup and the keyboard detection wizard steps.
pub mod keyboard;
/// Installer lifecycle state and error reports.
pub mod meta;
/// Network devices and archive mirror selection.
pub mod network;
/// Drivers, codecs and Ubuntu Pro.
pub mod packages;
/// Log-safe projections of secret-bearing values.
pub mod redact;
/// Disks, partitions, gaps and guided storage.
pub mod storage;
/// Time zone, install source, snap refresh and task progress.
pub mod system;

pub use active_directory::*;
pub use codec::{DISCRIMINATOR, DecodeError, Tagged, Union};
pub use identity::*;
pub use keyboard::*;
pub use meta::*;
pub use network::*;
pub use packages::*;
pub use redact::{Mask, Redact};
pub use storage::*;
pub use system::*;
