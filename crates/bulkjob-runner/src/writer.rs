//! CSV rendering of aggregated job results
//!
//! One header row, then every successful row followed by every failed row,
//! each group in aggregation order. Columns are the domain's output order
//! plus the synthetic `status` and `error` columns.

use bulkjob_common::types::keys;
use bulkjob_common::RowPayload;
use serde_json::Value;

use crate::error::ExportError;
use crate::handler::OutputColumns;

/// Render success and failure rows as CSV bytes
///
/// `pre_process` runs on a copy of every row before its cells are read, so
/// it may rewrite values or even the stored error message.
pub fn render_results<F>(
    success: &[RowPayload],
    failure: &[RowPayload],
    columns: &OutputColumns,
    mut pre_process: F,
) -> Result<Vec<u8>, ExportError>
where
    F: FnMut(&mut RowPayload),
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    let fields = columns.internal_header();

    writer.write_record(columns.display_header())?;

    for row in success.iter().chain(failure) {
        let mut row = row.clone();
        pre_process(&mut row);
        writer.write_record(render_row(&row, &fields))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn render_row(row: &RowPayload, fields: &[String]) -> Vec<String> {
    let error_message = row.get(keys::ERROR_MSG).and_then(|value| match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    fields
        .iter()
        .map(|field| match field.as_str() {
            keys::STATUS_COLUMN => match error_message {
                None => keys::SUCCESS.to_string(),
                Some(_) => keys::FAILED.to_string(),
            },
            keys::ERROR_COLUMN => error_message.clone().unwrap_or_default(),
            _ => cell_text(row.get(field)),
        })
        .collect()
}

/// Text of one cell; absent values print as "null"
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
