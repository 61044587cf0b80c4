//! Paged and historical reads
//!
//! Both operations are plain loops over sequential requests. Any failure
//! aborts the whole operation and drops what was collected so far.

use super::types::{HistoryCursor, HistoryLabel, PageCursor};
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::request::ReadParams;
use crate::types::{JsonObject, JsonValue};
use serde_json::json;
use tracing::debug;

/// Fetch every record matching `params`, one page of 500 at a time
pub async fn find_all<C>(client: &C, entity: &str, params: &JsonObject) -> Result<Vec<JsonValue>>
where
    C: ApiClient + ?Sized,
{
    if client
        .config()
        .find_all_denylist
        .iter()
        .any(|denied| denied == entity)
    {
        return Err(Error::entity_not_allowed(entity, "find_all"));
    }

    let mut cursor = PageCursor::new();
    let mut records = Vec::new();

    loop {
        let mut page_params = params.clone();
        cursor.apply(&mut page_params);

        let request = client
            .request_builder()
            .read(entity, &ReadParams::Query(page_params))?;
        let page = into_records(entity, client.execute_json(request).await?)?;

        debug!(
            "Fetched {} {} records at offset {}",
            page.len(),
            entity,
            cursor.offset
        );
        let count = page.len();
        records.extend(page);

        if cursor.process_page(count).is_done() {
            break;
        }
    }

    Ok(records)
}

/// Fetch records matching `params` and attach their state at each label
///
/// Labels are read in order, one request each, filtered to the ids of
/// the base records. Every returned record gets a `history` object keyed
/// by label.
pub async fn find_with_history<C>(
    client: &C,
    entity: &str,
    params: &JsonObject,
    labels: &[HistoryLabel],
) -> Result<Vec<JsonValue>>
where
    C: ApiClient + ?Sized,
{
    if entity != client.config().history_entity {
        return Err(Error::entity_not_allowed(entity, "find_with_history"));
    }
    if labels.is_empty() {
        return Err(Error::MissingHistory);
    }

    let request = client
        .request_builder()
        .read(entity, &ReadParams::Query(params.clone()))?;
    let base = into_records(entity, client.execute_json(request).await?)?;

    let mut cursor = HistoryCursor::new(&base);
    if cursor.is_empty() {
        return Ok(cursor.annotate(base));
    }

    for label in labels {
        let mut filter = JsonObject::new();
        filter.insert("id".to_string(), json!(cursor.ids()));
        if let Some(history) = label.history_param() {
            filter.insert("history".to_string(), json!(history));
        }

        let request = client
            .request_builder()
            .read(entity, &ReadParams::Query(filter))?;
        let snapshots = into_records(entity, client.execute_json(request).await?)?;

        debug!(
            "Fetched {} {} snapshots at {}",
            snapshots.len(),
            entity,
            label
        );
        cursor.attach(label, snapshots);
    }

    Ok(cursor.annotate(base))
}

/// A list response as records
fn into_records(entity: &str, value: JsonValue) -> Result<Vec<JsonValue>> {
    match value {
        JsonValue::Array(records) => Ok(records),
        other => Err(Error::unexpected(
            entity,
            format!("expected a list of records, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
