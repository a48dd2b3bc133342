//! Error types for the Callsheet breakdown pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Callsheet workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use callsheet_error::{CallsheetResult, HttpError};
//!
//! fn fetch_status() -> CallsheetResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_status() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod json;
mod pipeline;
mod supervisor;
mod taxonomy;

pub use config::ConfigError;
pub use error::{CallsheetError, CallsheetErrorKind, CallsheetResult};
pub use http::HttpError;
pub use json::JsonError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use supervisor::{SupervisorError, SupervisorErrorKind};
pub use taxonomy::{TaxonomyError, TaxonomyErrorKind};
