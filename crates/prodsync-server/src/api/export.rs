use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    Extension,
};

use prodsync_core::{ProductRecord, CSV_COLUMNS};

use crate::middleware::RequestId;

use super::{parse_search_request, ApiError, AppState, SearchParams};

pub(super) async fn export_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<(HeaderMap, String), ApiError> {
    let request = parse_search_request(&req_id.0, &params)?;

    tracing::info!(brand = %request.brand, max_items = request.max_items, "CSV export requested");
    let products =
        prodsync_scraper::run_search(&state.client, &request, state.inter_page_delay_ms).await;

    let body = render_csv(&products).map_err(|e| {
        tracing::error!(error = %e, "CSV rendering failed");
        ApiError::new(req_id.0.clone(), "internal_error", "CSV rendering failed")
    })?;

    let filename = format!("{}_products.csv", request.brand.replace(' ', "_"));
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename={filename}"))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, body))
}

/// Serializes records into CSV with the fixed canonical column order.
fn render_csv(products: &[ProductRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;
    for product in products {
        writer.write_record(product.csv_record())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
