//! Integration test crate for the CVI oracle.
//!
//! This crate has no library code; it only contains integration tests that
//! drive the oracle end to end over in-memory feeds.
//!
//! ```sh
//! cargo test -p cvi-integration-tests
//! ```
