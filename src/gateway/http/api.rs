//! Gateway trait implementations over the raw HTTP client.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use rust_decimal::Decimal;

use crate::domain::{
    Cart, Order, OrderStatus, OrdersCreate, PaymentMethod, Product, ProductCreate, StockUpdate,
    User,
};
use crate::gateway::{
    AuthGateway, CartGateway, OrderGateway, OrderScope, Page, PageQuery, ProductGateway, Result,
};

use super::client::Client;

/// HTTP implementation of the cart, order, product, and auth gateways.
pub struct HttpApi {
    client: Client,
}

impl HttpApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn order_endpoint(scope: OrderScope, path: &str) -> String {
        match scope {
            OrderScope::User => path.to_string(),
            OrderScope::Vendor => format!("/vendors{}", path),
        }
    }

    fn page_query(page: &PageQuery) -> Vec<(&'static str, String)> {
        vec![
            ("pageIndex", page.page_index.to_string()),
            ("itemsPerPage", page.items_per_page.to_string()),
        ]
    }
}

#[async_trait]
impl CartGateway for HttpApi {
    async fn get_cart(&self) -> Result<Cart> {
        let body = self
            .client
            .request(Method::GET, "/cart", None, &[])
            .await?;
        let cart: Cart = serde_json::from_slice(&body)?;
        Ok(cart)
    }

    async fn add_item(&self, product_id: u64, quantity: u32) -> Result<()> {
        self.client
            .request(
                Method::POST,
                "/cart",
                Some(json!({ "productId": product_id, "quantity": quantity })),
                &[],
            )
            .await?;
        Ok(())
    }

    async fn remove_item(&self, product_id: u64) -> Result<()> {
        self.client
            .request(
                Method::POST,
                "/cart/remove-item",
                Some(json!({ "productId": product_id })),
                &[],
            )
            .await?;
        Ok(())
    }

    async fn set_quantity(&self, product_id: u64, quantity: u32) -> Result<()> {
        self.client
            .request(
                Method::PUT,
                "/cart",
                Some(json!({ "productId": product_id, "quantity": quantity })),
                &[],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for HttpApi {
    async fn create_orders(&self, orders: &OrdersCreate) -> Result<()> {
        self.client
            .request(
                Method::POST,
                "/orders",
                Some(serde_json::to_value(orders)?),
                &[],
            )
            .await?;
        Ok(())
    }

    async fn cancel_order(&self, order_id: u64) -> Result<()> {
        let endpoint = format!("/orders/{}/cancel", order_id);
        self.client
            .request(Method::POST, &endpoint, None, &[])
            .await?;
        Ok(())
    }

    async fn advance_order(&self, order_id: u64) -> Result<()> {
        let endpoint = format!("/vendors/orders/{}", order_id);
        self.client
            .request(Method::PUT, &endpoint, None, &[])
            .await?;
        Ok(())
    }

    async fn get_order(&self, order_id: u64) -> Result<Order> {
        let endpoint = format!("/orders/{}", order_id);
        let body = self
            .client
            .request(Method::GET, &endpoint, None, &[])
            .await?;
        let order: Order = serde_json::from_slice(&body)?;
        Ok(order)
    }

    async fn list_orders(
        &self,
        scope: OrderScope,
        page: &PageQuery,
        status: Option<OrderStatus>,
    ) -> Result<Page<Order>> {
        let endpoint = Self::order_endpoint(scope, "/orders");

        let mut query = Self::page_query(page);
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }

        let body = self
            .client
            .request(Method::GET, &endpoint, None, &query)
            .await?;
        let page: Page<Order> = serde_json::from_slice(&body)?;

        debug!(items = page.items.len(), total = page.total, "fetched orders page");

        Ok(page)
    }

    async fn export_csv(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
    ) -> Result<Vec<u8>> {
        let endpoint = Self::order_endpoint(scope, "/orders/export-csv");

        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }

        self.client
            .request(Method::GET, &endpoint, None, &query)
            .await
    }

    async fn payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        let body = self
            .client
            .request(Method::GET, "/payment-methods", None, &[])
            .await?;
        let methods: Vec<PaymentMethod> = serde_json::from_slice(&body)?;
        Ok(methods)
    }
}

#[async_trait]
impl ProductGateway for HttpApi {
    async fn list_products(&self, page: &PageQuery) -> Result<Page<Product>> {
        let body = self
            .client
            .request(Method::GET, "/products", None, &Self::page_query(page))
            .await?;
        let page: Page<Product> = serde_json::from_slice(&body)?;
        Ok(page)
    }

    async fn create_product(&self, product: &ProductCreate) -> Result<()> {
        self.client
            .request(
                Method::POST,
                "/vendors/products",
                Some(serde_json::to_value(product)?),
                &[],
            )
            .await?;
        Ok(())
    }

    async fn set_price(&self, product_id: u64, price: Decimal) -> Result<()> {
        let endpoint = format!("/vendors/products/{}/prices", product_id);
        self.client
            .request(Method::POST, &endpoint, Some(json!({ "price": price })), &[])
            .await?;
        Ok(())
    }

    async fn update_stock(&self, product_id: u64, update: &StockUpdate) -> Result<()> {
        let endpoint = format!("/vendors/products/{}/stocks", product_id);
        self.client
            .request(
                Method::POST,
                &endpoint,
                Some(serde_json::to_value(update)?),
                &[],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LoginResponse {
            access_token: String,
        }

        let body = self
            .client
            .request(
                Method::POST,
                "/login",
                Some(json!({ "email": email, "password": password })),
                &[],
            )
            .await?;

        let resp: LoginResponse = serde_json::from_slice(&body)?;
        Ok(resp.access_token)
    }

    async fn current_user(&self) -> Result<User> {
        let body = self.client.request(Method::GET, "/me", None, &[]).await?;
        let user: User = serde_json::from_slice(&body)?;
        Ok(user)
    }
}
