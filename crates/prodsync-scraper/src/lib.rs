pub mod client;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod search;

pub use client::SearchClient;
pub use error::ScraperError;
pub use extract::extract_items;
pub use normalize::normalize_item;
pub use search::run_search;

/// Origin retailer stamped on every record this pipeline emits.
pub const SOURCE_RETAILER: &str = "Walmart";
