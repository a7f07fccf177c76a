//! Resolver E2E test suite.
//!
//! Drives the API against an in-process mock storage host.
//!
//! Run with: cargo test --test resolver_e2e

mod mock_storage;
mod test_helpers;

mod test_client;
