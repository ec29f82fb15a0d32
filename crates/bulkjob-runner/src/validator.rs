//! Required-column check for a single task.

use bulkjob_common::types::keys;
use bulkjob_common::{RowPayload, Task};
use serde_json::Value;

use crate::error::ValidationError;

/// Message recorded on a task whose required `field` is blank
pub fn missing_parameter_message(field: &str) -> String {
    format!("Mandatory parameter {} is missing.", field)
}

/// Fail `task` on the first of `mandatory_fields` that is blank in `row`
///
/// On failure the task is already marked FAILED with `row` as its payload,
/// and the caller must move on to the next task. Other tasks are never
/// touched.
pub fn check_required<S: AsRef<str>>(
    row: &RowPayload,
    task: &mut Task,
    mandatory_fields: &[S],
) -> Result<(), ValidationError> {
    for field in mandatory_fields {
        let field = field.as_ref();
        if is_blank(row.get(field)) {
            let message = missing_parameter_message(field);
            task.mark_failed(row.clone(), keys::CREATE, &message)?;

            return Err(ValidationError::MandatoryParamsMissing {
                field: field.to_string(),
                message,
            });
        }
    }

    Ok(())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
