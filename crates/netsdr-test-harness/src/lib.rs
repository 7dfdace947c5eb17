//! netsdr-test-harness: In-memory mock links for testing netsdr sessions.
//!
//! The mocks implement the `netsdr-core` channel traits without any real
//! network I/O, so session behavior (request correlation, timeouts,
//! unsolicited frames, sample flow) can be tested deterministically.
//! Each mock splits into a link half, which moves into the session under
//! test, and a handle half, which stays with the test for scripting and
//! assertions.
//!
//! - [`MockControlLink`] / [`MockControlHandle`]: scripted control channel
//! - [`MockDataLink`] / [`MockDataHandle`]: injectable datagram channel

pub mod mock_control;
pub mod mock_data;

pub use mock_control::{MockControlHandle, MockControlLink};
pub use mock_data::{MockDataHandle, MockDataLink};

/// Install a `tracing` subscriber that writes to the test capture.
///
/// Idempotent: only the first call in a process installs; later calls are
/// no-ops, so every test can call this unconditionally.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
