//! Bulk Job Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, payload encoding, and error handling for the bulk-upload
//! reprocessing workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Types**: Bulk upload jobs, their tasks, and the status state machine
//! - **Codec**: Stateless JSON encoding of per-row and per-job payloads
//! - **Logging**: Centralized tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use bulkjob_common::{codec, Result};
//! use bulkjob_common::types::{ProcessStatus, Task};
//!
//! fn inspect(task: &Task) -> Result<()> {
//!     if task.status == ProcessStatus::Failed {
//!         let row = codec::decode_row(task.failure_result.as_deref().unwrap_or_default())?;
//!         tracing::info!(sequence = task.sequence_id, ?row, "Failed row");
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{BulkJobError, Result};
pub use types::{Job, ProcessStatus, RowPayload, StorageDetails, Task};
