#![deny(unsafe_code)]

//! Async client for the installer backend.
//!
//! The backend speaks HTTP/1.1 with JSON bodies, normally over a Unix
//! socket. [`Transport`] owns the connection factory and the wire
//! conventions (JSON-encoded query values, status classification, truncated
//! and redacted trace logging); [`SubiquityClient`] layers one typed method
//! per backend endpoint on top of it.
//!
//! ```ignore
//! let client = SubiquityClient::connect(Endpoint::unix("/run/subiquity/socket"));
//! let storage = client.storage_v2(true).await?;
//! for disk in &storage.disks {
//!     println!("{} {}", disk.id, disk.size);
//! }
//! ```

pub mod client;
pub mod endpoint;
pub mod error;
pub mod transport;

pub use client::SubiquityClient;
pub use client::keyboard::{KeyboardWizard, WizardAnswer, WizardError, WizardState};
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use hyper::Method;
pub use transport::{Call, LOG_TRUNCATE_CHARS, Transport, truncate_for_log};
