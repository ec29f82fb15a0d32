//! Bulk Job Runner Library
//!
//! Background reprocessing of previously submitted bulk upload jobs.
//!
//! A job's tasks are already persisted. The runner pages through them in
//! sequence windows, lets a per-domain [`handler::BulkJobHandler`] process
//! each window, aggregates per-row outcomes and exports a CSV result file.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bulkjob_runner::{
//!     BatchProcessor, CloudExport, CompletionHandler, JobRunner,
//!     handler::{GenericRowHandler, OutputColumns},
//!     storage::LocalStorage,
//!     store::{InMemoryJobStore, InMemoryTaskStore},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let jobs = Arc::new(InMemoryJobStore::new());
//!     let tasks = Arc::new(InMemoryTaskStore::new());
//!     let export = CloudExport::new(Arc::new(LocalStorage::new("./results")));
//!     let processor = BatchProcessor::new(tasks, CompletionHandler::new(jobs.clone(), export), 100);
//!
//!     let handler = GenericRowHandler::new(OutputColumns::new(["name", "email"]))
//!         .with_mandatory_fields(["name"]);
//!     JobRunner::new(jobs).run_with_handler("0127", &processor, &handler).await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod handler;
pub mod runner;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod validator;
pub mod writer;

pub use batch::{BatchProcessor, SequenceWindow, SequenceWindows};
pub use completion::{CompletionHandler, ExportOutcome, FinalizeOutcome};
pub use error::{RunnerError, RunnerResult};
pub use export::CloudExport;
pub use runner::{JobRunner, JobStrategy, RunOutcome};
