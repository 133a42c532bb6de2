use super::*;
use prodsync_core::ProxySettings;

fn test_client(base_url: &str) -> SearchClient {
    SearchClient::new(base_url, 5, "prodsync-test/0.1", None)
        .expect("failed to build test SearchClient")
}

#[test]
fn search_url_first_page_best_match() {
    let client = test_client("https://www.walmart.com");
    let url = client.search_url("acme", SortOrder::BestMatch, 1).unwrap();
    assert_eq!(
        url,
        "https://www.walmart.com/search?q=acme&sort=best_match&page=1&affinityOverride=default"
    );
}

#[test]
fn search_url_encodes_spaces_in_brand() {
    let client = test_client("https://www.walmart.com");
    let url = client
        .search_url("acme tools", SortOrder::PriceLow, 3)
        .unwrap();
    assert!(
        url.contains("q=acme+tools") || url.contains("q=acme%20tools"),
        "brand term must be query-encoded: {url}"
    );
    assert!(url.contains("sort=price_low"));
    assert!(url.contains("page=3"));
}

#[test]
fn search_url_rating_maps_to_best_seller() {
    let client = test_client("https://www.walmart.com");
    let url = client.search_url("acme", SortOrder::Rating, 1).unwrap();
    assert!(url.contains("sort=best_seller"));
}

#[test]
fn origin_strips_trailing_slash() {
    let client = test_client("https://www.walmart.com/");
    assert_eq!(client.origin(), "https://www.walmart.com");
}

#[test]
fn search_url_rejects_invalid_origin() {
    let client = test_client("not-a-url");
    let result = client.search_url("acme", SortOrder::BestMatch, 1);
    assert!(
        matches!(result, Err(ScraperError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[test]
fn proxied_url_wraps_target_and_key() {
    let proxy = ProxySettings {
        endpoint: "https://render.example.com/fetch".to_owned(),
        api_key: "k123".to_owned(),
    };
    let url = SearchClient::proxied_url(&proxy, "https://www.walmart.com/search?q=acme&page=1")
        .unwrap();
    assert!(url.starts_with("https://render.example.com/fetch?"));
    assert!(url.contains("api_key=k123"));
    // The target URL must be percent-encoded inside the wrapper.
    assert!(url.contains("url=https%3A%2F%2Fwww.walmart.com%2Fsearch%3Fq%3Dacme%26page%3D1"));
}

#[test]
fn proxied_url_rejects_invalid_endpoint() {
    let proxy = ProxySettings {
        endpoint: "not a url".to_owned(),
        api_key: "k123".to_owned(),
    };
    let result = SearchClient::proxied_url(&proxy, "https://www.walmart.com/search");
    assert!(
        matches!(result, Err(ScraperError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}
