mod export;
mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use prodsync_core::{SearchRequest, SortOrder};
use prodsync_scraper::SearchClient;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<SearchClient>,
    pub inter_page_delay_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Query parameters shared by the search and CSV-export endpoints.
///
/// All fields are optional at the HTTP layer so a missing `brand` maps to a
/// 400 `validation_error` instead of axum's bare 422 rejection.
#[derive(Debug, Deserialize)]
pub(super) struct SearchParams {
    pub brand: Option<String>,
    pub max_items: Option<usize>,
    pub sort: Option<String>,
}

/// Default result cap when the caller does not pass `max_items`.
const DEFAULT_MAX_ITEMS: usize = 40;

pub(super) fn parse_search_request(
    request_id: &str,
    params: &SearchParams,
) -> Result<SearchRequest, ApiError> {
    let brand = params
        .brand
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "validation_error",
                "query parameter \"brand\" is required",
            )
        })?;

    let sort = params
        .sort
        .as_deref()
        .map_or(SortOrder::BestMatch, SortOrder::parse_lenient);

    Ok(SearchRequest::new(
        brand,
        params.max_items.unwrap_or(DEFAULT_MAX_ITEMS),
        sort,
    ))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/search", get(search::search_products))
        .route("/api/v1/export/csv", get(export::export_csv))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(brand: Option<&str>, max_items: Option<usize>, sort: Option<&str>) -> SearchParams {
        SearchParams {
            brand: brand.map(str::to_owned),
            max_items,
            sort: sort.map(str::to_owned),
        }
    }

    #[test]
    fn parse_search_request_applies_defaults() {
        let req = parse_search_request("req-1", &params(Some("acme"), None, None)).unwrap();
        assert_eq!(req.brand, "acme");
        assert_eq!(req.max_items, DEFAULT_MAX_ITEMS);
        assert_eq!(req.sort, SortOrder::BestMatch);
    }

    #[test]
    fn parse_search_request_rejects_missing_brand() {
        let err = parse_search_request("req-1", &params(None, None, None)).unwrap_err();
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn parse_search_request_rejects_blank_brand() {
        let err = parse_search_request("req-1", &params(Some("   "), None, None)).unwrap_err();
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn parse_search_request_clamps_max_items() {
        let req = parse_search_request("req-1", &params(Some("acme"), Some(9_999), None)).unwrap();
        assert_eq!(req.max_items, prodsync_core::MAX_ITEMS_CEILING);
    }

    #[test]
    fn parse_search_request_unknown_sort_falls_back() {
        let req =
            parse_search_request("req-1", &params(Some("acme"), None, Some("weird"))).unwrap();
        assert_eq!(req.sort, SortOrder::BestMatch);
        let req =
            parse_search_request("req-1", &params(Some("acme"), None, Some("price_high"))).unwrap();
        assert_eq!(req.sort, SortOrder::PriceHigh);
    }

    #[test]
    fn validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_error_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn test_state(base_url: &str) -> AppState {
        AppState {
            client: Arc::new(
                SearchClient::new(base_url, 5, "prodsync-test/0.1", None).expect("client"),
            ),
            inter_page_delay_ms: 0,
        }
    }

    /// A results page carrying one item stack with `count` items.
    fn next_data_page(count: usize) -> String {
        let items: Vec<serde_json::Value> = (0..count)
            .map(|i| json!({"name": format!("Widget {i}"), "usItemId": format!("{i}")}))
            .collect();
        let state = json!({
            "props": {"pageProps": {"initialData": {"searchResult": {"itemStacks": [
                {"items": items}
            ]}}}}
        });
        format!(
            r#"<script id="__NEXT_DATA__" type="application/json">{state}</script>"#
        )
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok_with_request_id() {
        let app = build_app(test_state("https://www.walmart.com"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers().contains_key("x-request-id"),
            "request id must be echoed on every response"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn search_without_brand_is_bad_request() {
        let app = build_app(test_state("https://www.walmart.com"));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/search")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn search_returns_products_from_mock_retailer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(next_data_page(3)))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/search?brand=acme&max_items=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["source"], "walmart");
        assert_eq!(body["data"]["count"], 3);
        assert_eq!(body["data"]["products"][0]["name"], "Widget 0");
        assert_eq!(body["data"]["products"][0]["brand"], "acme");
    }

    #[tokio::test]
    async fn export_csv_sets_attachment_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(next_data_page(2)))
            .mount(&server)
            .await;

        let app = build_app(test_state(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/export/csv?brand=acme%20tools&max_items=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/csv"));
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert_eq!(disposition, "attachment; filename=acme_tools_products.csv");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        let mut lines = body.lines();
        assert_eq!(
            lines.next(),
            Some("name,brand,sku,item_id,upc,price,category,image,url,rating,source,asin")
        );
        assert_eq!(lines.clone().count(), 2, "one row per product after the header");
    }
}
