//! Strategy 1: `__NEXT_DATA__` embedded application-state JSON.

use serde_json::Value;

use super::flatten_item_stacks;

/// Literal script-tag delimiters for the server-rendered state blob. Located
/// by substring search, not HTML parsing — the payload is a multi-megabyte
/// JSON document that general HTML parsers choke on.
const OPEN_MARKER: &str = r#"<script id="__NEXT_DATA__" type="application/json">"#;
const CLOSE_MARKER: &str = "</script>";

/// Keys walked from the document root down to the item stacks.
const ITEM_STACKS_PATH: [&str; 5] = [
    "props",
    "pageProps",
    "initialData",
    "searchResult",
    "itemStacks",
];

pub(super) fn extract_next_data_items(html: &str) -> Vec<Value> {
    let Some(start) = html.find(OPEN_MARKER) else {
        return vec![];
    };
    let body_start = start + OPEN_MARKER.len();
    let Some(body_len) = html[body_start..].find(CLOSE_MARKER) else {
        return vec![];
    };

    let data: Value = match serde_json::from_str(&html[body_start..body_start + body_len]) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "__NEXT_DATA__ block is not valid JSON");
            return vec![];
        }
    };

    let mut node = &data;
    for key in ITEM_STACKS_PATH {
        match node.get(key) {
            Some(next) => node = next,
            // Absent key at any level means "no items" for this strategy,
            // never a propagated failure.
            None => return vec![],
        }
    }

    flatten_item_stacks(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_items_through_the_fixed_path() {
        let body = json!({
            "props": {"pageProps": {"initialData": {"searchResult": {"itemStacks": [
                {"items": [{"name": "A"}, {"name": "B"}]}
            ]}}}}
        });
        let html = format!("{OPEN_MARKER}{body}{CLOSE_MARKER}");
        let items = extract_next_data_items(&html);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn unterminated_script_tag_yields_empty() {
        let html = format!("{OPEN_MARKER}{{\"props\": {{}}}}");
        assert!(extract_next_data_items(&html).is_empty());
    }

    #[test]
    fn marker_absent_yields_empty() {
        assert!(extract_next_data_items("<html></html>").is_empty());
    }

    #[test]
    fn item_stacks_not_an_array_yields_empty() {
        let body = json!({
            "props": {"pageProps": {"initialData": {"searchResult": {"itemStacks": "oops"}}}}
        });
        let html = format!("{OPEN_MARKER}{body}{CLOSE_MARKER}");
        assert!(extract_next_data_items(&html).is_empty());
    }
}
