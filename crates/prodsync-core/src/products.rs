use serde::{Deserialize, Serialize};

/// Upper bound on `max_items` for a single search request.
pub const MAX_ITEMS_CEILING: usize = 200;

/// CSV column order for [`ProductRecord`] exports. Fixed by contract with
/// downstream spreadsheet consumers; do not reorder.
pub const CSV_COLUMNS: [&str; 12] = [
    "name", "brand", "sku", "item_id", "upc", "price", "category", "image", "url", "rating",
    "source", "asin",
];

/// Sort order accepted by a search request.
///
/// Serialized in snake_case so query strings and JSON bodies use the same
/// spelling (`best_match`, `price_low`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    BestMatch,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortOrder {
    /// Maps the sort order to the retailer's `sort` query parameter.
    ///
    /// The target site has no rating sort; `Rating` maps to its best-seller
    /// ranking, the closest available ordering.
    #[must_use]
    pub fn as_query_param(self) -> &'static str {
        match self {
            SortOrder::BestMatch => "best_match",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
            SortOrder::Rating => "best_seller",
        }
    }

    /// Parses a query-string value, falling back to best match for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "price_low" => SortOrder::PriceLow,
            "price_high" => SortOrder::PriceHigh,
            "rating" => SortOrder::Rating,
            _ => SortOrder::BestMatch,
        }
    }
}

/// One search-pipeline invocation: brand/query term, result cap, sort order.
///
/// Not persisted; lives for exactly one pipeline run.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub brand: String,
    pub max_items: usize,
    pub sort: SortOrder,
}

impl SearchRequest {
    /// Builds a request, clamping `max_items` into `1..=MAX_ITEMS_CEILING`.
    #[must_use]
    pub fn new(brand: impl Into<String>, max_items: usize, sort: SortOrder) -> Self {
        Self {
            brand: brand.into(),
            max_items: max_items.clamp(1, MAX_ITEMS_CEILING),
            sort,
        }
    }
}

/// The canonical, retailer-agnostic product row every extraction strategy is
/// normalized into.
///
/// All fields are always present; everything except `name` may be an empty
/// string when the source payload does not carry the value. A record with an
/// empty `name` is never emitted — normalization rejects it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Item brand when the payload carries one, otherwise the search term.
    pub brand: String,
    /// Store-internal id (`usItemId` on the target site).
    pub sku: String,
    pub item_id: String,
    /// First non-empty of the payload's alternately-named UPC fields.
    pub upc: String,
    /// `"$"`-prefixed two-decimal amount, or empty when unavailable.
    pub price: String,
    pub category: String,
    /// Thumbnail URL.
    pub image: String,
    /// Absolute product-page URL.
    pub url: String,
    pub rating: String,
    /// Origin retailer, constant per pipeline.
    pub source: String,
    /// Reserved cross-retailer identifier; always empty for this retailer.
    pub asin: String,
}

impl ProductRecord {
    /// Projects the record into CSV field order ([`CSV_COLUMNS`]).
    #[must_use]
    pub fn csv_record(&self) -> [&str; 12] {
        [
            &self.name,
            &self.brand,
            &self.sku,
            &self.item_id,
            &self.upc,
            &self.price,
            &self.category,
            &self.image,
            &self.url,
            &self.rating,
            &self.source,
            &self.asin,
        ]
    }
}
