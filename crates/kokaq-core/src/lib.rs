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

//! Transport-agnostic view of the Kokaq priority-queue service.
//!
//! Layout: `model.rs` (namespace/queue/message DTOs), `error.rs` (classified
//! remote failures), `service.rs` (the `QueueService` facade consumed by the shell).

pub mod error;
pub mod model;
pub mod service;

pub use error::{RemoteError, RemoteErrorKind, RemoteResult};
pub use model::{
    DeliveredMessage, FailureReason, MessageReceipt, NamespaceInfo, QueueInfo, QueueRef,
};
pub use service::QueueService;
