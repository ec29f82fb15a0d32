use serde::{Deserialize, Serialize};

use super::{keys, ProcessStatus, RowPayload};
use crate::{codec, Result};

/// One uploaded row of a bulk upload job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub job_id: String,
    /// 1-based position of the row in the upload; used only for paging
    pub sequence_id: i64,
    pub status: ProcessStatus,
    /// Original input columns as submitted
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub success_result: Option<String>,
    #[serde(default)]
    pub failure_result: Option<String>,
}

impl Task {
    pub fn new(job_id: impl Into<String>, sequence_id: i64, data: Option<String>) -> Self {
        Self {
            job_id: job_id.into(),
            sequence_id,
            status: ProcessStatus::New,
            data,
            success_result: None,
            failure_result: None,
        }
    }

    /// Decode the submitted input columns; an absent payload is an empty row.
    pub fn row(&self) -> Result<RowPayload> {
        match self.data.as_deref() {
            Some(data) => codec::decode_row(data),
            None => Ok(RowPayload::new()),
        }
    }

    /// Tag `row` with `operation` and store it as this task's success payload.
    pub fn mark_succeeded(&mut self, mut row: RowPayload, operation: &str) -> Result<()> {
        row.insert(keys::OPERATION.to_string(), operation.into());
        self.success_result = Some(codec::encode_row(&row)?);
        self.status = ProcessStatus::Completed;
        Ok(())
    }

    /// Tag `row` with `operation` and `message` and store it as this task's
    /// failure payload.
    pub fn mark_failed(&mut self, mut row: RowPayload, operation: &str, message: &str) -> Result<()> {
        row.insert(keys::OPERATION.to_string(), operation.into());
        row.insert(keys::ERROR_MSG.to_string(), message.into());
        self.failure_result = Some(codec::encode_row(&row)?);
        self.status = ProcessStatus::Failed;
        Ok(())
    }

    /// Record a terminal outcome. Non-terminal statuses leave the task untouched.
    pub fn set_status(
        &mut self,
        status: ProcessStatus,
        failure_message: &str,
        row: RowPayload,
        operation: &str,
    ) -> Result<()> {
        match status {
            ProcessStatus::Completed => self.mark_succeeded(row, operation),
            ProcessStatus::Failed => self.mark_failed(row, operation, failure_message),
            _ => Ok(()),
        }
    }
}
