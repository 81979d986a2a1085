//! REST client for the catalog API's admin endpoints.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::instrument;

use meblihub_core::{CategoryId, Lang, OrderId, OrderStatus, ProductId, UserId};

use super::ApiError;
use super::types::{
    AdminCategory, AdminOrder, AdminProduct, AdminUser, AuthResponse, ChatMessage, Conversation,
    OrderListResponse, SupportAdmin,
};
use crate::config::AdminConfig;

/// Client for the admin surface of the catalog API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    rest_base: String,
}

impl AdminClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                rest_base: config.rest_base(),
            }),
        }
    }

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

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        let path = response.url().path().to_owned();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.chars().take(200).collect());
            tracing::warn!(status = %status, path = %path, "catalog API error: {message}");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(ApiError::Parse)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.get(self.url(path)).bearer_auth(token);
        if !params.is_empty() {
            request = request.query(params);
        }
        Self::handle_response(request.send().await?).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .request(method, self.url(path))
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::handle_response(request.send().await?).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in; the caller checks the role before creating a panel session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        Self::handle_response(request.send().await?).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_products(&self, token: &str) -> Result<Vec<AdminProduct>, ApiError> {
        self.get(token, "/admin/products", &[]).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or validation is rejected.
    #[instrument(skip(self, token, payload))]
    pub async fn create_product(&self, token: &str, payload: &Value) -> Result<Value, ApiError> {
        self.send_json(token, reqwest::Method::POST, "/admin/products", Some(payload))
            .await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or validation is rejected.
    #[instrument(skip(self, token, payload), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::PUT,
            &format!("/admin/products/{id}"),
            Some(payload),
        )
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &str, id: &ProductId) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::DELETE,
            &format!("/admin/products/{id}"),
            None,
        )
        .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_categories(&self, token: &str) -> Result<Vec<AdminCategory>, ApiError> {
        self.get(token, "/admin/categories", &[]).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn create_category(&self, token: &str, payload: &Value) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::POST,
            "/admin/categories",
            Some(payload),
        )
        .await
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        token: &str,
        id: &CategoryId,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::PUT,
            &format!("/admin/categories/{id}"),
            Some(payload),
        )
        .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(category_id = %id))]
    pub async fn delete_category(&self, token: &str, id: &CategoryId) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::DELETE,
            &format!("/admin/categories/{id}"),
            None,
        )
        .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_users(&self, token: &str) -> Result<Vec<AdminUser>, ApiError> {
        self.get(token, "/admin/users", &[]).await
    }

    /// Update a user (role, ban flag, profile fields).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        token: &str,
        id: &UserId,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::PUT,
            &format!("/admin/users/{id}"),
            Some(payload),
        )
        .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, token: &str, id: &UserId) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::DELETE,
            &format!("/admin/users/{id}"),
            None,
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List orders with search, status filter, and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(
        &self,
        token: &str,
        q: &str,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> Result<OrderListResponse, ApiError> {
        let params = vec![
            ("q".to_owned(), q.to_owned()),
            (
                "status".to_owned(),
                status.map(|s| s.as_str().to_owned()).unwrap_or_default(),
            ),
            ("page".to_owned(), page.to_string()),
            ("limit".to_owned(), limit.to_string()),
        ];
        self.get(token, "/admin/orders", &params).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(&self, token: &str, id: &OrderId) -> Result<AdminOrder, ApiError> {
        self.get(token, &format!("/admin/orders/{id}"), &[]).await
    }

    /// Patch an order (status and the admin note block).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(order_id = %id))]
    pub async fn patch_order(
        &self,
        token: &str,
        id: &OrderId,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::PATCH,
            &format!("/admin/orders/{id}"),
            Some(payload),
        )
        .await
    }

    /// Cancel an order with a reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn cancel_order(
        &self,
        token: &str,
        id: &OrderId,
        reason: &str,
    ) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::POST,
            &format!("/admin/orders/{id}/cancel"),
            Some(&json!({ "reason": reason })),
        )
        .await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn delete_order(&self, token: &str, id: &OrderId) -> Result<Value, ApiError> {
        self.send_json(
            token,
            reqwest::Method::DELETE,
            &format!("/admin/orders/{id}"),
            None,
        )
        .await
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Id of the support admin inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn support_admin(&self) -> Result<SupportAdmin, ApiError> {
        let request = self.inner.client.get(self.url("/chat/support-admin"));
        Self::handle_response(request.send().await?).await
    }

    /// Support conversations, most recent first.
    ///
    /// Accepts both observed shapes: a bare array and `{conversations}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn chat_conversations(&self, token: &str) -> Result<Vec<Conversation>, ApiError> {
        let raw: Value = self.get(token, "/admin/chat-conversations", &[]).await?;
        let list = if raw.is_array() {
            raw
        } else {
            raw.get("conversations").cloned().unwrap_or(Value::Array(Vec::new()))
        };
        Ok(serde_json::from_value(list).unwrap_or_default())
    }

    /// Message history between the inbox and a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn message_history(
        &self,
        inbox: &str,
        partner: &str,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let request = self.inner.client.get(self.url(&format!(
            "/messages/{}/{}",
            urlencoding::encode(inbox),
            urlencoding::encode(partner)
        )));
        Self::handle_response(request.send().await?).await
    }

    // =========================================================================
    // Translations
    // =========================================================================

    /// Raw translation tree for a language.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn translations(&self, lang: Lang) -> Result<Value, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("/translations/{lang}")));
        Self::handle_response(request.send().await?).await
    }
}
