//! Client for the uniques catalog API
//!
//! One browse request maps to exactly one `GET {base}/api/uniques/?...` call.
//! Successful pages are kept in a [`ResponseCache`] keyed by the full request
//! URL, so identical queries within the freshness window are served locally.
//! There are no retries: a request either yields a whole page or an error.

pub mod cache;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, normalize_base_url};
use crate::error::{ConfigError, FetchError};
use crate::models::{Paginated, UniqueItem, UniqueQuery};

pub use cache::{CachedPage, ResponseCache};

const USER_AGENT: &str = concat!("poe-uniques/", env!("CARGO_PKG_VERSION"));

/// Source of unique item pages.
#[async_trait]
pub trait UniqueSource: Send + Sync {
    /// Fetch one page of uniques for the given query.
    ///
    /// # Returns
    /// * `Result<CachedPage, FetchError>` - The page and when it was fetched
    async fn fetch_uniques(&self, query: &UniqueQuery) -> Result<CachedPage, FetchError>;
}

/// HTTP implementation of [`UniqueSource`].
pub struct ApiClient {
    client: Client,
    base_url: String,
    endpoint: Url,
    cache: ResponseCache,
}

impl ApiClient {
    /// Create a client from the process configuration.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: config.request_timeout.as_secs().to_string(),
                reason: e.to_string(),
            })?;

        Self::with_client(
            client,
            Some(&config.api_base_url),
            ResponseCache::new(config.cache_capacity, config.cache_ttl),
        )
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The base address is checked here so that a missing one fails before
    /// any request is attempted.
    pub fn with_client(
        client: Client,
        base_url: Option<&str>,
        cache: ResponseCache,
    ) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(base_url)?;
        let endpoint =
            Url::parse(&format!("{base_url}/api/uniques/")).map_err(|e| ConfigError::Invalid {
                key: "API_BASE_URL",
                value: base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            endpoint,
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Build the request URL for a query.
    ///
    /// Keys are emitted in a fixed order (league, page, search, ordering) so
    /// equal queries produce equal URLs. Empty `league`, `search` and
    /// `ordering` are left out; `page` is always sent as given.
    pub fn build_url(&self, query: &UniqueQuery) -> String {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if !query.league.is_empty() {
                pairs.append_pair("league", &query.league);
            }
            pairs.append_pair("page", &query.page);
            if !query.search.is_empty() {
                pairs.append_pair("search", &query.search);
            }
            if !query.ordering.is_empty() {
                pairs.append_pair("ordering", &query.ordering);
            }
        }
        url.to_string()
    }

    async fn request_page(&self, url: &str) -> Result<Paginated<UniqueItem>, FetchError> {
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let page = serde_json::from_slice(&body)?;
        Ok(page)
    }
}

#[async_trait]
impl UniqueSource for ApiClient {
    async fn fetch_uniques(&self, query: &UniqueQuery) -> Result<CachedPage, FetchError> {
        let url = self.build_url(query);

        if let Some(hit) = self.cache.get(&url) {
            debug!("Cache hit for {}", url);
            return Ok(hit);
        }

        let page = match self.request_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Uniques fetch failed for {}: {}", url, e);
                return Err(e);
            }
        };

        let fetched_at = Utc::now();
        info!(
            "Fetched {} of {} uniques (page {}, league {})",
            page.results.len(),
            page.count,
            query.page,
            if query.league.is_empty() {
                "current"
            } else {
                query.league.as_str()
            }
        );

        self.cache.insert(url, page.clone(), fetched_at);

        Ok(CachedPage::fresh(page, fetched_at))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::Router;
    use axum::extract::{RawQuery, State};
    use axum::http::StatusCode;
    use axum::routing::get;

    use super::*;

    const PAGE_JSON: &str = r#"{
        "count": 3,
        "next": null,
        "previous": "http://api.local/api/uniques/?page=1",
        "results": [{
            "id": 11,
            "name": "Goldrim",
            "required_level": 1,
            "image_url": "https://img.example/goldrim.png",
            "base_item": {"id": 1, "name": "Leather Cap", "item_class": "armour", "slot": "Helmet"},
            "flavour_text": "No metal slips as easily through the fingers as gold.",
            "divine_value": "0.01",
            "listing_count": 300
        }]
    }"#;

    async fn spawn_api(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str, ttl: Duration) -> ApiClient {
        ApiClient::with_client(Client::new(), Some(base), ResponseCache::new(8, ttl)).unwrap()
    }

    fn query(page: &str, search: &str, ordering: &str, league: &str) -> UniqueQuery {
        UniqueQuery {
            page: page.to_string(),
            search: search.to_string(),
            ordering: ordering.to_string(),
            league: league.to_string(),
        }
    }

    #[test]
    fn missing_base_is_a_config_error() {
        let cache = ResponseCache::new(1, Duration::ZERO);
        let err = ApiClient::with_client(Client::new(), None, cache).err().unwrap();
        assert!(matches!(err, ConfigError::MissingApiBase));
    }

    #[test]
    fn builds_url_in_stable_order() {
        let api = client("http://api.local///", Duration::ZERO);
        let url = api.build_url(&query("2", "foo bar", "-chaos_value", ""));

        assert_eq!(
            url,
            "http://api.local/api/uniques/?page=2&search=foo+bar&ordering=-chaos_value"
        );
        assert!(!url.contains("league"));
    }

    #[test]
    fn league_leads_the_query_string() {
        let api = client("https://poe.example/backend", Duration::ZERO);
        let url = api.build_url(&query("1", "", "name", "Settlers of Kalguur"));

        assert_eq!(
            url,
            "https://poe.example/backend/api/uniques/?league=Settlers+of+Kalguur&page=1&ordering=name"
        );
    }

    #[test]
    fn page_is_sent_verbatim() {
        let api = client("http://api.local", Duration::ZERO);
        let url = api.build_url(&query("last", "", "", ""));

        assert_eq!(url, "http://api.local/api/uniques/?page=last");
    }

    #[tokio::test]
    async fn fetches_and_parses_page() {
        let router = Router::new().route(
            "/api/uniques/",
            get(|RawQuery(raw): RawQuery| async move {
                assert_eq!(raw.as_deref(), Some("page=2&search=gold"));
                PAGE_JSON
            }),
        );
        let base = spawn_api(router).await;
        let api = client(&base, Duration::ZERO);

        let fetched = api.fetch_uniques(&query("2", "gold", "", "")).await.unwrap();
        let page = fetched.page;

        assert_eq!(page.count, 3);
        assert!(page.next.is_none());
        assert!(page.previous.is_some());
        assert_eq!(page.results.len(), 1);

        let item = &page.results[0];
        assert_eq!(item.name, "Goldrim");
        assert_eq!(item.chaos_value, None);
        assert_eq!(item.divine_value.as_deref(), Some("0.01"));
    }

    #[tokio::test]
    async fn not_found_is_a_status_error() {
        let router = Router::new().route(
            "/api/uniques/",
            get(|| async { (StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#) }),
        );
        let base = spawn_api(router).await;
        let api = client(&base, Duration::from_secs(60));

        let err = api
            .fetch_uniques(&UniqueQuery::default())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(404));
        match err {
            FetchError::Status { code, text } => {
                assert_eq!(code, 404);
                assert_eq!(text, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(api.cache().stats().0, 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let router = Router::new().route("/api/uniques/", get(|| async { "<html>oops</html>" }));
        let base = spawn_api(router).await;
        let api = client(&base, Duration::ZERO);

        let err = api
            .fetch_uniques(&UniqueQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{addr}"), Duration::ZERO);
        let err = api
            .fetch_uniques(&UniqueQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }

    async fn counting_api() -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/api/uniques/",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    PAGE_JSON
                }),
            )
            .with_state(hits.clone());
        (spawn_api(router).await, hits)
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let (base, hits) = counting_api().await;
        let api = client(&base, Duration::from_secs(1800));

        let first = api.fetch_uniques(&UniqueQuery::default()).await.unwrap();
        let second = api.fetch_uniques(&UniqueQuery::default()).await.unwrap();
        api.fetch_uniques(&query("2", "", "name", "")).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(first.fetched_at, second.fetched_at);
    }

    #[tokio::test]
    async fn disabled_cache_always_requests() {
        let (base, hits) = counting_api().await;
        let api = client(&base, Duration::ZERO);

        api.fetch_uniques(&UniqueQuery::default()).await.unwrap();
        api.fetch_uniques(&UniqueQuery::default()).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
