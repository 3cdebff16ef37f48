//! Shared setup for the integration tests.
//!
//! Run with `RUST_LOG=linked_bst=trace cargo test` to see every add and remove.

use tracing_subscriber::EnvFilter;

/// Installs a subscriber that writes through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
