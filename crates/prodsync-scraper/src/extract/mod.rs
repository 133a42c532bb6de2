//! Raw item extraction from retailer search-results HTML.
//!
//! Tries extraction strategies in priority order (`__NEXT_DATA__` embedded
//! app state, alternate global state blobs, JSON-LD product metadata) and
//! returns the first non-empty result. Each strategy is independently
//! fallible; a malformed or missing JSON block abandons that strategy only
//! and never propagates.

mod jsonld;
mod next_data;
mod state_blob;

use serde_json::Value;

use jsonld::extract_jsonld_items;
use next_data::extract_next_data_items;
use state_blob::extract_state_blob_items;

/// Extracts raw item records from one search-results page.
///
/// Returns an empty vector when no known structural pattern matches — the
/// caller treats that as "no more results", not as an error.
#[must_use]
pub fn extract_items(html: &str) -> Vec<Value> {
    // Strategy 1: __NEXT_DATA__ server-rendered app state
    let items = extract_next_data_items(html);
    if !items.is_empty() {
        tracing::debug!(count = items.len(), "extracted items from __NEXT_DATA__");
        return items;
    }

    // Strategy 2: alternate global state blobs
    let items = extract_state_blob_items(html);
    if !items.is_empty() {
        tracing::debug!(count = items.len(), "extracted items from state blob");
        return items;
    }

    // Strategy 3: schema.org JSON-LD product metadata
    let items = extract_jsonld_items(html);
    if !items.is_empty() {
        tracing::debug!(count = items.len(), "extracted items from JSON-LD");
        return items;
    }

    tracing::debug!("no extraction strategy matched this page");
    vec![]
}

/// Flattens an `itemStacks` array (each stack carrying an `items` list) into
/// one item sequence, preserving stack order then within-stack order.
///
/// Shared by the embedded-state strategies; JSON-LD has no stack structure.
pub(crate) fn flatten_item_stacks(stacks: &Value) -> Vec<Value> {
    let Some(stacks) = stacks.as_array() else {
        return vec![];
    };

    let mut items = Vec::new();
    for stack in stacks {
        if let Some(stack_items) = stack.get("items").and_then(Value::as_array) {
            items.extend(stack_items.iter().cloned());
        }
    }
    items
}
