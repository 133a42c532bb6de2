use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use prodsync_core::ProductRecord;

use crate::middleware::RequestId;

use super::{parse_search_request, ApiError, ApiResponse, AppState, ResponseMeta, SearchParams};

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    brand: String,
    source: &'static str,
    count: usize,
    products: Vec<ProductRecord>,
}

pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let request = parse_search_request(&req_id.0, &params)?;

    tracing::info!(brand = %request.brand, max_items = request.max_items, "search requested");
    let products =
        prodsync_scraper::run_search(&state.client, &request, state.inter_page_delay_ms).await;

    Ok(Json(ApiResponse {
        data: SearchData {
            brand: request.brand,
            source: "walmart",
            count: products.len(),
            products,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
