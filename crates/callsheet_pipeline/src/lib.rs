//! Pipeline orchestration for the Callsheet breakdown core.
//!
//! This crate sequences the three analysis reads and the supervision pass
//! over one script:
//!
//! - [`PipelineConfig`]: bundled TOML defaults with optional override file.
//! - [`HttpCollaborator`]: reqwest client for the external analysis
//!   service, with explicit timeouts and backoff polling.
//! - [`extract_json`] / [`parse_tolerant`]: tolerant extraction of JSON
//!   from collaborator responses that arrive wrapped in prose or markdown.
//! - Per-stage fallback heuristics ([`fallback_emotional`],
//!   [`fallback_technical`]) so the pipeline degrades instead of failing.
//! - [`PipelineOrchestrator`]: the state machine; always produces a
//!   [`callsheet_core::FinalReport`] unless a configuration error aborts
//!   the run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collaborator;
mod config;
mod extraction;
mod fallback;
mod orchestrator;

pub use collaborator::{await_result, HttpCollaborator};
pub use config::PipelineConfig;
pub use extraction::{extract_json, parse_tolerant};
pub use fallback::{fallback_emotional, fallback_technical};
pub use orchestrator::{PipelineOrchestrator, PipelineState};
