//! Paginated search orchestration: fetch, extract, normalize, accumulate.
//!
//! The loop is strictly sequential — one page in flight at a time — and
//! favors returning a possibly-partial result over raising an error. The
//! only signals that stop it are a fetch failure, a page with no
//! extractable items, or hitting the requested item count.

use std::time::Duration;

use prodsync_core::{ProductRecord, SearchRequest};

use crate::client::SearchClient;
use crate::extract::extract_items;
use crate::normalize::normalize_item;

/// Hard ceiling on pages fetched for one search, guarding against a site
/// that keeps returning items without ever satisfying `max_items`.
const MAX_PAGES: u32 = 50;

/// Runs the full search pipeline for one request.
///
/// Fetches successive result pages until `max_items` records have been
/// accumulated, a page yields no extractable items, or a fetch fails.
/// Always returns the records accumulated so far — a short or empty result
/// is a valid outcome, not an error. Records preserve page order and
/// within-page order; no cross-page dedup is performed.
///
/// `inter_page_delay_ms` is the politeness pause before each page after the
/// first.
pub async fn run_search(
    client: &SearchClient,
    request: &SearchRequest,
    inter_page_delay_ms: u64,
) -> Vec<ProductRecord> {
    let mut records: Vec<ProductRecord> = Vec::new();
    let mut page = 1u32;

    while records.len() < request.max_items && page <= MAX_PAGES {
        if page > 1 && inter_page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_page_delay_ms)).await;
        }

        let url = match client.search_url(&request.brand, request.sort, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(brand = %request.brand, error = %e, "could not build search URL");
                break;
            }
        };

        let html = match client.fetch_page(&url).await {
            Ok(body) => body,
            Err(e) => {
                // Transport failure ends this search only; whatever has been
                // accumulated is still returned to the caller.
                tracing::warn!(
                    brand = %request.brand,
                    page,
                    error = %e,
                    "page fetch failed, returning partial results"
                );
                break;
            }
        };

        let items = extract_items(&html);
        if items.is_empty() {
            // Either the site ran out of results or its markup changed; the
            // two are indistinguishable here and both end the search.
            tracing::debug!(brand = %request.brand, page, "no extractable items, stopping");
            break;
        }

        let mut accepted = 0usize;
        let mut skipped = 0usize;
        for item in &items {
            if records.len() >= request.max_items {
                break;
            }
            match normalize_item(item, &request.brand, client.origin()) {
                Some(record) => {
                    records.push(record);
                    accepted += 1;
                }
                None => skipped += 1,
            }
        }

        tracing::debug!(
            brand = %request.brand,
            page,
            extracted = items.len(),
            accepted,
            skipped,
            total = records.len(),
            "page processed"
        );

        page += 1;
    }

    records.truncate(request.max_items);
    records
}
