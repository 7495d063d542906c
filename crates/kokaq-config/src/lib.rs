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

//! Connection settings for the Kokaq shell.
//!
//! Layout: `model.rs` (raw and validated settings), `validate.rs` (address and
//! timeout normalisation), `defaults.rs` (fallback values), `error.rs`.

pub mod defaults;
pub mod error;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{RawShellConfig, ShellConfig};
