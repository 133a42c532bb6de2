//! Strategy 3: schema.org JSON-LD product metadata.
//!
//! Last-resort source: search pages carry per-product structured data for
//! search engines. It holds far fewer fields than the app state, so each
//! matching entry is mapped into the common raw-item shape with only the
//! fields JSON-LD provides; everything retailer-specific stays absent.

use regex::Regex;
use serde_json::{Map, Value};

pub(super) fn extract_jsonld_items(html: &str) -> Vec<Value> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    let mut results = Vec::new();

    for cap in script_re.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        let value: Value = match serde_json::from_str(json_text) {
            Ok(v) => v,
            Err(_) => continue,
        };

        // Accept top-level object, array, or @graph container.
        let mut candidates: Vec<Value> = if let Some(arr) = value.as_array() {
            arr.clone()
        } else {
            vec![value]
        };

        let mut expanded = Vec::new();
        for item in &candidates {
            if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
                expanded.extend(graph.iter().cloned());
            }
        }
        candidates.extend(expanded);

        for item in candidates {
            if let Some(raw) = jsonld_entry_to_item(&item) {
                results.push(raw);
            }
        }
    }

    results
}

/// Convert a single JSON-LD entry into the common raw-item shape, if its
/// `@type` marks it as a product.
fn jsonld_entry_to_item(entry: &Value) -> Option<Value> {
    let type_node = entry.get("@type")?;

    // `@type` may be a plain string OR an array of strings.
    let is_product = if let Some(s) = type_node.as_str() {
        s.eq_ignore_ascii_case("Product")
    } else if let Some(arr) = type_node.as_array() {
        arr.iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case("Product"))
    } else {
        false
    };
    if !is_product {
        return None;
    }

    let name = entry.get("name")?.as_str()?;

    let mut item = Map::new();
    item.insert("name".to_owned(), Value::String(name.to_owned()));

    // brand may be a string or a {"@type": "Brand", "name": …} object; the
    // normalizer resolves both shapes, so pass it through untouched.
    if let Some(brand) = entry.get("brand") {
        item.insert("brand".to_owned(), brand.clone());
    }

    if let Some(upc) = entry
        .get("gtin13")
        .or_else(|| entry.get("gtin12"))
        .or_else(|| entry.get("gtin"))
        .and_then(Value::as_str)
    {
        item.insert("upc".to_owned(), Value::String(upc.to_owned()));
    }

    if let Some(sku) = entry.get("sku").and_then(Value::as_str) {
        item.insert("usItemId".to_owned(), Value::String(sku.to_owned()));
    }

    // offers.price may be a number or numeric string; map it into the
    // embedded-state price path so normalization has a single shape.
    if let Some(price) = offer_price(entry) {
        item.insert(
            "priceInfo".to_owned(),
            serde_json::json!({"currentPrice": {"price": price}}),
        );
    }

    if let Some(url) = entry.get("url").and_then(Value::as_str) {
        item.insert("canonicalUrl".to_owned(), Value::String(url.to_owned()));
    }

    if let Some(image) = entry.get("image").and_then(Value::as_str) {
        item.insert("image".to_owned(), Value::String(image.to_owned()));
    }

    Some(Value::Object(item))
}

fn offer_price(entry: &Value) -> Option<f64> {
    let offers = entry.get("offers")?;
    // offers may itself be an array of offer objects.
    let offer = if let Some(arr) = offers.as_array() {
        arr.first()?
    } else {
        offers
    };
    let price = offer.get("price")?;
    price
        .as_f64()
        .or_else(|| price.as_str().and_then(|s| s.parse::<f64>().ok()))
}
