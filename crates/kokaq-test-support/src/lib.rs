#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::significant_drop_tightening)]

//! Shared test helpers used across the shell and client suites.
//! Layout: fixtures.rs (sample values), mocks.rs (in-memory queue service with a call log).

pub mod fixtures;
pub mod mocks;

pub use mocks::{Call, RecordingQueueService};
