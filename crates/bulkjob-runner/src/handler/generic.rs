//! Configurable handler for uploads that only need required-column checks.

use async_trait::async_trait;
use bulkjob_common::types::keys;
use bulkjob_common::{Job, RowPayload, Task};
use serde_json::Value;
use tracing::debug;

use super::{BulkJobHandler, OutputColumns};
use crate::error::ValidationError;
use crate::validator::check_required;

/// Accepts every row whose required columns are filled in
///
/// Tasks already in a terminal state are left alone, so resuming a job
/// does not redo rows finished by an earlier run.
#[derive(Debug, Clone)]
pub struct GenericRowHandler {
    columns: OutputColumns,
    mandatory_fields: Vec<String>,
    operation: String,
}

impl GenericRowHandler {
    pub fn new(columns: OutputColumns) -> Self {
        Self {
            columns,
            mandatory_fields: Vec::new(),
            operation: keys::CREATE.to_string(),
        }
    }

    pub fn with_mandatory_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Operation tag stored on accepted rows; "create" by default
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }
}

#[async_trait]
impl BulkJobHandler for GenericRowHandler {
    async fn process_batch(&self, job: &Job, tasks: &mut [Task]) -> anyhow::Result<()> {
        for task in tasks.iter_mut() {
            if task.status.is_terminal() {
                continue;
            }

            let row = match task.row() {
                Ok(row) => row,
                Err(e) => {
                    task.mark_failed(
                        RowPayload::new(),
                        &self.operation,
                        &format!("Unreadable row data: {}", e),
                    )?;
                    continue;
                },
            };

            match check_required(&row, task, &self.mandatory_fields) {
                Ok(()) => task.mark_succeeded(row, &self.operation)?,
                Err(ValidationError::MandatoryParamsMissing { field, .. }) => {
                    debug!(job_id = %job.id, sequence = task.sequence_id, field = %field, "Rejected row");
                },
                Err(ValidationError::Payload(e)) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Blank out absent output columns so they render empty rather than "null"
    fn pre_process_result(&self, row: &mut RowPayload) {
        for field in &self.columns.order {
            row.entry(field.clone())
                .or_insert_with(|| Value::String(String::new()));
        }
    }

    fn output_columns(&self) -> OutputColumns {
        self.columns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkjob_common::{codec, ProcessStatus};
    use serde_json::json;

    fn task(seq: i64, data: serde_json::Value) -> Task {
        Task::new("p-1", seq, Some(data.to_string()))
    }

    #[tokio::test]
    async fn test_missing_field_fails_only_that_row() {
        let handler = GenericRowHandler::new(OutputColumns::new(["name", "email"]))
            .with_mandatory_fields(["name"]);
        let job = Job::new("p-1", "user", 3);
        let mut tasks = vec![
            task(1, json!({"name": "Ann", "email": "ann@example.com"})),
            task(2, json!({"email": "nobody@example.com"})),
            task(3, json!({"name": "Cid"})),
        ];

        handler.process_batch(&job, &mut tasks).await.unwrap();

        let statuses: Vec<ProcessStatus> = tasks.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![ProcessStatus::Completed, ProcessStatus::Failed, ProcessStatus::Completed]
        );
        let failed = codec::decode_row(tasks[1].failure_result.as_deref().unwrap()).unwrap();
        assert!(failed[keys::ERROR_MSG].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_terminal_tasks_are_left_alone() {
        let handler = GenericRowHandler::new(OutputColumns::new(["name"])).with_operation(keys::UPDATE);
        let job = Job::new("p-1", "user", 1);
        let mut done = task(1, json!({"name": "Ann"}));
        done.status = ProcessStatus::Failed;
        done.failure_result = Some(r#"{"name":"Ann","error_msg":"earlier"}"#.to_string());
        let mut tasks = vec![done.clone(), task(2, json!({"name": "Bea"}))];

        handler.process_batch(&job, &mut tasks).await.unwrap();

        assert_eq!(tasks[0], done);
        let stored = codec::decode_row(tasks[1].success_result.as_deref().unwrap()).unwrap();
        assert_eq!(stored[keys::OPERATION], keys::UPDATE);
    }

    #[tokio::test]
    async fn test_unreadable_row_data_fails_row() {
        let handler = GenericRowHandler::new(OutputColumns::new(["name"]));
        let job = Job::new("p-1", "user", 1);
        let mut tasks = vec![Task::new("p-1", 1, Some("not json".to_string()))];

        handler.process_batch(&job, &mut tasks).await.unwrap();
        assert_eq!(tasks[0].status, ProcessStatus::Failed);
    }

    #[test]
    fn test_pre_process_fills_absent_columns() {
        let handler = GenericRowHandler::new(OutputColumns::new(["name", "email"]));
        let mut row = json!({"name": "Ann"}).as_object().cloned().unwrap();

        handler.pre_process_result(&mut row);
        assert_eq!(row["email"], "");
        assert_eq!(row["name"], "Ann");
    }
}
