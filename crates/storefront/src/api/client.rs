//! REST client for the MebliHub catalog API.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use meblihub_core::{Lang, ProductId};

use super::ApiError;
use super::cache::CacheValue;
use super::conversions::normalize_reviews;
use super::types::{
    AuthResponse, CartPayload, Category, ChatMessage, Location, Order, OrderPayload, Product,
    Review, ReviewSummary, SupportAdmin, User,
};
use crate::config::CatalogApiConfig;

/// Catalog read cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Client for the MebliHub catalog API.
///
/// Cheap to clone; catalog reads (products, categories, locations,
/// translations) are cached for 5 minutes, everything user-specific is not.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    rest_base: String,
    origin: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                rest_base: config.rest_base(),
                origin: config.origin.clone(),
                cache,
            }),
        }
    }

    /// Origin of the backend (serves uploaded images).
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.rest_base)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let url = response.url().path().to_owned();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }

        if !status.is_success() {
            // The backend reports errors as `{"message": "..."}`
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::warn!(status = %status, path = %url, "catalog API error: {message}");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(ApiError::Parse)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(self.url(path));
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::handle_response(request.send().await?).await
    }

    async fn send_json<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::handle_response(request.send().await?).await
    }

    // =========================================================================
    // Products & categories (cached reads)
    // =========================================================================

    /// Get the full product list (`GET /products`). Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products:all".to_owned();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get("/products", None, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get products through the server-side filter endpoint
    /// (`GET /products/filter`). Never cached - the param space is unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, params))]
    pub async fn filter_products(
        &self,
        params: &[(String, String)],
    ) -> Result<Vec<Product>, ApiError> {
        self.get("/products/filter", None, params).await
    }

    /// Get a single product by id. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&format!("/products/{id}"), None, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get all categories. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories:all".to_owned();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get("/categories", None, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get all company locations. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_locations(&self) -> Result<Vec<Location>, ApiError> {
        let cache_key = "locations:all".to_owned();

        if let Some(CacheValue::Locations(locations)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for locations");
            return Ok(locations);
        }

        let locations: Vec<Location> = self.get("/locations", None, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Locations(locations.clone()))
            .await;

        Ok(locations)
    }

    /// Get the translation tree for a language. Cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_translations(&self, lang: Lang) -> Result<Value, ApiError> {
        let cache_key = format!("translations:{lang}");

        if let Some(CacheValue::Translations(tree)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for translations");
            return Ok(tree);
        }

        let tree: Value = self.get(&format!("/translations/{lang}"), None, &[]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Translations(tree.clone()))
            .await;

        Ok(tree)
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Get reviews and the normalized aggregate for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_reviews(
        &self,
        id: &ProductId,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Review>, ReviewSummary), ApiError> {
        let raw: Value = self
            .get(
                &format!("/reviews/product/{id}"),
                None,
                &[
                    ("page".to_owned(), page.to_string()),
                    ("limit".to_owned(), limit.to_string()),
                ],
            )
            .await?;

        Ok(normalize_reviews(&raw))
    }

    // =========================================================================
    // Likes (authenticated)
    // =========================================================================

    /// Get the current user's liked product ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_likes(&self, token: &str) -> Result<Vec<String>, ApiError> {
        let raw: Value = self.get("/likes", Some(token), &[]).await?;
        Ok(super::conversions::normalize_likes(&raw))
    }

    /// Toggle a like; the response is the new like state (source of truth).
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn toggle_like(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<Vec<String>, ApiError> {
        let raw: Value = self
            .send_json(
                reqwest::Method::POST,
                "/likes",
                Some(token),
                Some(&json!({ "productId": product_id })),
            )
            .await?;
        Ok(super::conversions::normalize_likes(&raw))
    }

    // =========================================================================
    // Cart (authenticated, never cached - mutable state)
    // =========================================================================

    /// Fetch the current user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &str) -> Result<CartPayload, ApiError> {
        self.get("/cart/", Some(token), &[]).await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &str,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<CartPayload, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/cart/add",
            Some(token),
            Some(&json!({ "productId": product_id, "qty": qty })),
        )
        .await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_cart_qty(
        &self,
        token: &str,
        product_id: &ProductId,
        qty: u32,
    ) -> Result<CartPayload, ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            "/cart/qty",
            Some(token),
            Some(&json!({ "productId": product_id, "qty": qty })),
        )
        .await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<CartPayload, ApiError> {
        self.send_json::<CartPayload, ()>(
            reqwest::Method::DELETE,
            &format!("/cart/item/{product_id}"),
            Some(token),
            None,
        )
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &str) -> Result<CartPayload, ApiError> {
        self.send_json::<CartPayload, ()>(
            reqwest::Method::DELETE,
            "/cart/clear",
            Some(token),
            None,
        )
        .await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/auth/login",
            None,
            Some(&json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            "/auth/register",
            None,
            Some(&json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    /// Fetch the current user for a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is invalid.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.get("/auth/me", Some(token), &[]).await
    }

    // =========================================================================
    // Orders (authenticated)
    // =========================================================================

    /// Place an order from the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is rejected.
    #[instrument(skip(self, token, payload))]
    pub async fn create_order(
        &self,
        token: &str,
        payload: &OrderPayload,
    ) -> Result<Value, ApiError> {
        self.send_json(reqwest::Method::POST, "/orders", Some(token), Some(payload))
            .await
    }

    /// List the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>, ApiError> {
        self.get("/orders/my", Some(token), &[]).await
    }

    /// Fetch one of the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn my_order(&self, token: &str, id: &meblihub_core::OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/my/{id}"), Some(token), &[]).await
    }

    // =========================================================================
    // Chat REST surface
    // =========================================================================

    /// Id of the support admin account (no auth required).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn support_admin(&self) -> Result<SupportAdmin, ApiError> {
        self.get("/chat/support-admin", None, &[]).await
    }

    /// Message history between two chat parties.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn message_history(
        &self,
        me: &str,
        partner: &str,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        self.get(
            &format!(
                "/messages/{}/{}",
                urlencoding::encode(me),
                urlencoding::encode(partner)
            ),
            None,
            &[],
        )
        .await
    }

    // =========================================================================
    // Cache management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: &ProductId) {
        self.inner.cache.invalidate(&format!("product:{id}")).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
