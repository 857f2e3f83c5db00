use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::error::{ApiError, ApiResult};
use super::types::{
    Alert, Brand, Category, Health, HistoryQuery, MessageResponse, NewAlert, PriceHistoryEntry,
    Product, ProductDetail, ProductQuery, Stats, StoreComparison, StoreEntry,
};

/// Default API location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client for the WongPrime REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wongprime-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base(base_url)?,
        })
    }

    /// Base URL with a trailing slash so relative joins keep any path prefix
    fn normalize_base(base_url: &str) -> ApiResult<Url> {
        let trimmed = base_url.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        Ok(Url::parse(&with_slash)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);
        Ok(self.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("API returned {}: {}", status, body);
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    /// General statistics shown in the counters row
    pub async fn stats(&self) -> ApiResult<Stats> {
        self.get("estadisticas/", &[]).await
    }

    /// Active categories
    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get("estadisticas/categorias", &[]).await
    }

    /// All brands ordered by name
    pub async fn brands(&self) -> ApiResult<Vec<Brand>> {
        self.get("estadisticas/marcas", &[]).await
    }

    /// Active stores
    pub async fn stores(&self) -> ApiResult<Vec<StoreEntry>> {
        self.get("estadisticas/tiendas", &[]).await
    }

    /// Product listing with optional filters
    pub async fn products(&self, query: &ProductQuery) -> ApiResult<Vec<Product>> {
        self.get("productos/", &query.to_pairs()).await
    }

    /// Product with its current prices per store
    pub async fn product(&self, product_id: i64) -> ApiResult<ProductDetail> {
        self.get(&format!("productos/{product_id}"), &[]).await
    }

    /// Price history, newest first
    pub async fn price_history(
        &self,
        product_id: i64,
        query: &HistoryQuery,
    ) -> ApiResult<Vec<PriceHistoryEntry>> {
        self.get(&format!("productos/{product_id}/historico"), &query.to_pairs())
            .await
    }

    /// Cross-store comparison
    pub async fn compare(&self, product_id: i64) -> ApiResult<StoreComparison> {
        self.get(&format!("productos/{product_id}/comparar"), &[]).await
    }

    /// Alerts, optionally restricted to one email address
    pub async fn alerts(&self, email: Option<&str>) -> ApiResult<Vec<Alert>> {
        let query: Vec<(&str, String)> = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| vec![("email", e.to_string())])
            .unwrap_or_default();
        self.get("alertas/", &query).await
    }

    /// Register a target-price alert
    pub async fn create_alert(&self, alert: &NewAlert) -> ApiResult<Alert> {
        alert.validate()?;
        let request = self.request(Method::POST, "alertas/")?.json(alert);
        let created: Alert = self.send(request).await?;
        tracing::info!(
            "Created alert {} for product {} at S/ {:.2}",
            created.id,
            created.product_id,
            created.target_price
        );
        Ok(created)
    }

    /// Remove an alert
    pub async fn delete_alert(&self, alert_id: i64) -> ApiResult<MessageResponse> {
        let request = self.request(Method::DELETE, &format!("alertas/{alert_id}"))?;
        self.send(request).await
    }

    /// Stop an alert from firing without deleting it
    pub async fn deactivate_alert(&self, alert_id: i64) -> ApiResult<MessageResponse> {
        let request = self.request(Method::PUT, &format!("alertas/{alert_id}/desactivar"))?;
        self.send(request).await
    }

    /// Service health check
    pub async fn health(&self) -> ApiResult<Health> {
        self.get("health", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_with_and_without_trailing_slash() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint("/estadisticas/").unwrap().as_str(),
            "http://localhost:8000/estadisticas/"
        );

        let c = client("http://localhost:8000/");
        assert_eq!(
            c.endpoint("productos/4/comparar").unwrap().as_str(),
            "http://localhost:8000/productos/4/comparar"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let c = client("https://prices.example.com/api");
        assert_eq!(
            c.endpoint("alertas/").unwrap().as_str(),
            "https://prices.example.com/api/alertas/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_create_alert_validates_before_sending() {
        // Nothing listens on this port; validation must fail first.
        let c = client("http://127.0.0.1:9");
        let err = c
            .create_alert(&NewAlert::new(1, "bad-email", 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
