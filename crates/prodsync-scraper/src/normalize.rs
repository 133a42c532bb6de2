//! Normalization from raw extracted items to [`prodsync_core::ProductRecord`].
//!
//! The source payload is not a controlled contract — the retailer renames,
//! nests, or drops fields between releases — so every field is derived
//! defensively with an empty-string default. The only hard requirement is a
//! non-empty `name`; an item without one yields no record.

use prodsync_core::ProductRecord;
use serde_json::Value;

use crate::SOURCE_RETAILER;

/// Normalizes one raw item into a [`ProductRecord`].
///
/// Returns `None` when the item has no usable `name`. `origin` is the
/// retailer origin used to absolutize relative product URLs.
#[must_use]
pub fn normalize_item(item: &Value, search_brand: &str, origin: &str) -> Option<ProductRecord> {
    let name = coerce_string(item.get("name")).unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let brand = item
        .get("brand")
        .and_then(|v| flat_or_nested(v, "name"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| search_brand.to_owned());

    let sku = coerce_string(item.get("usItemId")).unwrap_or_default();
    let item_id = coerce_string(item.get("itemId")).unwrap_or_default();

    // The UPC travels under different names across payload versions; take
    // the first non-empty candidate.
    let upc = ["upc", "gtin13", "gtin", "wupc"]
        .iter()
        .find_map(|key| coerce_string(item.get(*key)).filter(|s| !s.is_empty()))
        .unwrap_or_default();

    let price = format_price(item);

    let category = item
        .get("category")
        .and_then(|v| flat_or_nested(v, "name"))
        .unwrap_or_default();

    let image = item
        .get("imageInfo")
        .and_then(|v| flat_or_nested(v, "thumbnailUrl"))
        .or_else(|| item.get("image").and_then(|v| flat_or_nested(v, "thumbnailUrl")))
        .unwrap_or_default();

    let url = match coerce_string(item.get("canonicalUrl")) {
        Some(path) if path.starts_with('/') => format!("{origin}{path}"),
        Some(absolute) => absolute,
        None => String::new(),
    };

    let rating = coerce_string(item.get("averageRating")).unwrap_or_default();

    Some(ProductRecord {
        name,
        brand,
        sku,
        item_id,
        upc,
        price,
        category,
        image,
        url,
        rating,
        source: SOURCE_RETAILER.to_owned(),
        asin: String::new(),
    })
}

/// Formats the nested current price as `"$" + two decimals`.
///
/// Any failure along the way (missing key, non-numeric value) yields an
/// empty string rather than an error.
fn format_price(item: &Value) -> String {
    let price = item
        .get("priceInfo")
        .and_then(|p| p.get("currentPrice"))
        .and_then(|c| c.get("price"));

    let Some(price) = price else {
        return String::new();
    };

    price
        .as_f64()
        .or_else(|| price.as_str().and_then(|s| s.parse::<f64>().ok()))
        .map(|amount| format!("${amount:.2}"))
        .unwrap_or_default()
}

/// Resolves a field that may be a flat scalar or a nested object carrying
/// the value under `subfield`.
///
/// Payload versions disagree on shape (`"category": "Tools"` vs
/// `"category": {"name": "Tools"}`); this is the single place that
/// distinction is handled.
fn flat_or_nested(value: &Value, subfield: &str) -> Option<String> {
    if value.is_object() {
        coerce_string(value.get(subfield))
    } else {
        coerce_string(Some(value))
    }
}

/// Coerces a scalar JSON value to its string form. Arrays, objects, and
/// nulls have no sensible flat form and yield `None`.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
