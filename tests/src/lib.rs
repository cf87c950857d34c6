//! # Overlay Discovery Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Admission and lookup throughput (criterion)
//! └── src/
//!     ├── fixtures.rs   # Signed announcements and raw transactions
//!     └── integration/  # Ledger → bus → lookup flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p od-tests
//!
//! # By category
//! cargo test -p od-tests integration::flows
//! cargo test -p od-tests integration::scenarios
//!
//! # Benchmarks
//! cargo bench -p od-tests
//! ```

pub mod fixtures;
pub mod integration;
