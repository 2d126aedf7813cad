//! Tracing initialisation helpers for tests.
//!
//! The subscriber is installed at most once per process, so calling
//! [`init_test_tracing`] from every test is fine.

use tracing_subscriber::EnvFilter;

/// Install a subscriber that writes through the test harness and honours
/// `RUST_LOG` (default: `quiver_core=debug`, everything else `info`).
///
/// ```ignore
/// #[tokio::test]
/// async fn selects_merge_sort() {
///     quiver_test_utils::tracing_setup::init_test_tracing();
///     // "Selected strategy" events now show up with --nocapture.
/// }
/// ```
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,quiver_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
