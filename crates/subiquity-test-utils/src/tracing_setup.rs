//! Tracing initialisation helpers for tests.
//!
//! Call [`init_test_tracing`] at the top of any test that wants the client's
//! wire logging printed by the test harness (run with `RUST_LOG=trace`).
//! The subscriber is installed at most once per process.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber writing to the test-harness writer and
/// respecting `RUST_LOG` (default `warn`).
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     subiquity_test_utils::tracing_setup::init_test_tracing();
///     // client calls log their request and response lines here
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
