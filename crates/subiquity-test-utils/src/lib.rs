#![deny(unsafe_code)]

//! Shared test utilities for the subiquity client workspace.
//!
//! Provides a stub installer backend served over a Unix socket, a tracing
//! layer that captures log lines for assertions, and canned JSON payloads,
//! so that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! subiquity-test-utils = { workspace = true }
//! ```

pub mod fixtures;
pub mod log_capture;
pub mod stub;
pub mod tracing_setup;

pub use log_capture::{LogReader, capture_logs};
pub use stub::{CannedResponse, RecordedRequest, StubBackend};
