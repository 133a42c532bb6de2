//! Strategy 2: alternate embedded-state JSON blobs.
//!
//! Some page variants hydrate from a differently-named global instead of
//! `__NEXT_DATA__`. Each marker is tried in order; the JSON object following
//! the marker is extracted textually (balanced-brace scan) because the
//! assignment is inside a `<script>` body with arbitrary trailing code.

use regex::Regex;
use serde_json::Value;

use super::flatten_item_stacks;

/// Assignment markers tried in order. The pattern captures the position just
/// past `=`; the object itself is taken by the balanced scan.
const STATE_MARKERS: [&str; 3] = [
    r"window\.__WML_REDUX_STATE__\s*=\s*",
    r"window\.__PRELOADED_STATE__\s*=\s*",
    r#"__INITIAL_STATE__\s*=\s*"#,
];

/// Candidate key paths from the blob root down to the item stacks. Page
/// variants nest the search result at different depths.
const ITEM_STACKS_PATHS: [&[&str]; 3] = [
    &["searchResult", "itemStacks"],
    &["search", "searchResult", "itemStacks"],
    &["props", "pageProps", "initialData", "searchResult", "itemStacks"],
];

pub(super) fn extract_state_blob_items(html: &str) -> Vec<Value> {
    for marker in STATE_MARKERS {
        let re = Regex::new(marker).expect("valid regex");
        for m in re.find_iter(html) {
            let Some(object_str) = extract_balanced_object(&html[m.end()..]) else {
                continue;
            };
            let data: Value = match serde_json::from_str(object_str) {
                Ok(v) => v,
                Err(_) => continue,
            };
            let items = items_at_known_paths(&data);
            if !items.is_empty() {
                return items;
            }
        }
    }

    vec![]
}

fn items_at_known_paths(data: &Value) -> Vec<Value> {
    for path in ITEM_STACKS_PATHS {
        let mut node = data;
        let mut found = true;
        for key in path {
            match node.get(key) {
                Some(next) => node = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            let items = flatten_item_stacks(node);
            if !items.is_empty() {
                return items;
            }
        }
    }
    vec![]
}

/// Try to extract a balanced JSON object from the start of `s`.
///
/// Scans `s` character-by-character tracking brace depth, respecting string
/// literals and escape sequences. Returns the shortest prefix of `s` that
/// forms a complete `{…}` object, or `None` if the object is unterminated.
/// Only `}` (not `]`) at depth 0 triggers a return, so malformed input like
/// `{"a": [1}` never closes on the wrong bracket.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
