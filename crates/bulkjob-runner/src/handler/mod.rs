//! Per-domain extension points of a bulk upload job
//!
//! Every bulk upload domain ("create user", "reset password", ...)
//! implements [`BulkJobHandler`]. The runner drives pagination,
//! aggregation and export; the handler only decides what happens to
//! each row and how its result is presented.

use async_trait::async_trait;
use std::collections::HashMap;

use bulkjob_common::types::keys;
use bulkjob_common::{Job, RowPayload, Task};

pub mod generic;

pub use generic::GenericRowHandler;

/// Domain-specific behaviour plugged into the batch processor
#[async_trait]
pub trait BulkJobHandler: Send + Sync {
    /// Perform the domain operation on one batch of tasks
    ///
    /// Each task must be left COMPLETED with a success payload, FAILED with
    /// a failure payload, or untouched. Returning an error fails the whole
    /// job and stops processing of the remaining batches.
    async fn process_batch(&self, job: &Job, tasks: &mut [Task]) -> anyhow::Result<()>;

    /// Adjust an aggregated row right before it is written to the result file
    fn pre_process_result(&self, row: &mut RowPayload);

    /// Result file layout for this domain
    fn output_columns(&self) -> OutputColumns;
}

/// Column layout of the result file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputColumns {
    /// Internal field names in output order
    pub order: Vec<String>,
    /// Display names keyed by internal field name
    pub display_names: HashMap<String, String>,
}

impl OutputColumns {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
            display_names: HashMap::new(),
        }
    }

    pub fn with_display_name(mut self, field: impl Into<String>, display: impl Into<String>) -> Self {
        self.display_names.insert(field.into(), display.into());
        self
    }

    /// Field names of every output column, including status and error
    pub fn internal_header(&self) -> Vec<String> {
        let mut header = self.order.clone();
        header.push(keys::STATUS_COLUMN.to_string());
        header.push(keys::ERROR_COLUMN.to_string());
        header
    }

    /// Header row as written to the file
    pub fn display_header(&self) -> Vec<String> {
        self.internal_header()
            .into_iter()
            .map(|field| self.display_names.get(&field).cloned().unwrap_or(field))
            .collect()
    }
}
