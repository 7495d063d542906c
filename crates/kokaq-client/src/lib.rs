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
#![allow(clippy::redundant_pub_crate)]

//! HTTP implementation of the Kokaq queue-service facade.
//!
//! Layout:
//! - `http.rs`: `HttpQueueService` and request execution
//! - `wire.rs`: JSON request/response bodies
//! - `problem.rs`: status and problem-details classification into `RemoteError`

mod http;
mod problem;
mod wire;

pub use http::{HEADER_REQUEST_ID, HttpQueueService};
