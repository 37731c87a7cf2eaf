use tracing::debug;

use crate::contract::Record;
use crate::error::ApiError;
use crate::store::{ContinuationToken, ProductStore};

#[derive(Debug, Clone, PartialEq)]
pub struct ScanParams {
    pub table_name: String,
    /// Resume point for the first page; `None` starts at the beginning of the table.
    pub exclusive_start_key: Option<ContinuationToken>,
}

impl ScanParams {
    pub fn whole_table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            exclusive_start_key: None,
        }
    }
}

/// Drains the table one page at a time, appending every page to `accumulated`.
///
/// Only the absence of a continuation token ends the scan; empty pages that
/// carry a token are followed. A token equal to the one just sent is reported
/// as [`ApiError::ProtocolViolation`]. Any page failure aborts the whole scan
/// and the records gathered so far are dropped.
pub fn scan_all_records(
    store: &dyn ProductStore,
    params: ScanParams,
    mut accumulated: Vec<Record>,
) -> Result<Vec<Record>, ApiError> {
    let ScanParams {
        table_name,
        exclusive_start_key,
    } = params;
    let mut start_key = exclusive_start_key;
    let mut pages = 0usize;

    loop {
        let page = store.scan_page(&table_name, start_key.as_ref())?;
        pages += 1;
        accumulated.extend(page.records);

        let Some(next_token) = page.next_token else {
            debug!(
                table = %table_name,
                pages,
                records = accumulated.len(),
                "scan completed"
            );
            return Ok(accumulated);
        };

        if start_key.as_ref() == Some(&next_token) {
            return Err(ApiError::ProtocolViolation(format!(
                "Scan of '{table_name}' returned an unchanged continuation token after {pages} pages"
            )));
        }
        start_key = Some(next_token);
    }
}
