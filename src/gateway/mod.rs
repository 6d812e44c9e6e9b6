//! Gateway abstractions over the remote order-management API.
//!
//! The backend is the single source of truth; every trait here is a thin
//! request/response contract, never a place for business state.

mod http;

use crate::domain::{
    Cart, Order, OrderStatus, OrdersCreate, PaymentMethod, Product, ProductCreate, StockUpdate,
    User,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

pub use http::{Client, ClientConfig, HttpApi};

/// Structured error body returned by the API: a stable error code key
/// (e.g. "insufficient_stock_quantity") plus a message.
#[derive(Debug, Clone, Error, Deserialize)]
#[error("api error {code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Gateway errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure, no usable response.
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server rejected the token (403). The session has been revoked.
    #[error("access forbidden")]
    Forbidden,

    /// Structured rejection from the API.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Whether an order operation runs against the user's own orders or the
/// vendor-scoped endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    User,
    Vendor,
}

/// Page request for list endpoints.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub page_index: u32,
    pub items_per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            items_per_page: 20,
        }
    }
}

/// One page of a list endpoint's results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub items_per_page: u32,
    pub total: u64,
}

/// CartGateway is the remote half of cart synchronization.
///
/// All mutations return no data; callers confirm the effect by re-fetching
/// the cart. `add_item` on a product already in the cart increments the
/// existing line server-side instead of duplicating it.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetches the authenticated user's cart.
    async fn get_cart(&self) -> Result<Cart>;

    /// Adds `quantity` of a product to the cart.
    async fn add_item(&self, product_id: u64, quantity: u32) -> Result<()>;

    /// Removes a product's line from the cart entirely.
    async fn remove_item(&self, product_id: u64) -> Result<()>;

    /// Sets the quantity of an existing cart line.
    async fn set_quantity(&self, product_id: u64, quantity: u32) -> Result<()>;
}

/// OrderGateway covers order submission and lifecycle requests.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits one order per vendor from a checkout selection.
    async fn create_orders(&self, orders: &OrdersCreate) -> Result<()>;

    /// Requests cancellation of an order. The server validates that the
    /// order is still cancellable.
    async fn cancel_order(&self, order_id: u64) -> Result<()>;

    /// Vendor action: asks the server to move an order to its next status.
    /// The client never computes the next status itself.
    async fn advance_order(&self, order_id: u64) -> Result<()>;

    /// Fetches a single order.
    async fn get_order(&self, order_id: u64) -> Result<Order>;

    /// Lists orders page by page, user- or vendor-scoped, optionally
    /// filtered by status.
    async fn list_orders(
        &self,
        scope: OrderScope,
        page: &PageQuery,
        status: Option<OrderStatus>,
    ) -> Result<Page<Order>>;

    /// Downloads orders as CSV, optionally filtered by status.
    /// Returns the raw bytes; persisting them is the caller's concern.
    async fn export_csv(&self, scope: OrderScope, status: Option<OrderStatus>)
    -> Result<Vec<u8>>;

    /// Lists the payment methods accepted at checkout.
    async fn payment_methods(&self) -> Result<Vec<PaymentMethod>>;
}

/// ProductGateway covers the public catalog and the vendor's product
/// management endpoints.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Lists available products page by page.
    async fn list_products(&self, page: &PageQuery) -> Result<Page<Product>>;

    /// Vendor action: adds a new product to the vendor's catalog.
    async fn create_product(&self, product: &ProductCreate) -> Result<()>;

    /// Vendor action: sets the product's current price. Existing cart
    /// lines keep the price they were added at.
    async fn set_price(&self, product_id: u64, price: Decimal) -> Result<()>;

    /// Vendor action: books stock in or out of a product.
    async fn update_stock(&self, product_id: u64, update: &StockUpdate) -> Result<()>;
}

/// AuthGateway covers the authentication collaborator endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for an access token.
    async fn login(&self, email: &str, password: &str) -> Result<String>;

    /// Fetches the account behind the current access token.
    async fn current_user(&self) -> Result<User>;
}
