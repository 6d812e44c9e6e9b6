//! Product catalog entities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub vendor_id: u64,
    /// Unit the product is sold in, e.g. "kg".
    pub unit: String,
    pub stock_quantity: u32,
    /// Reference to the active price-list entry.
    pub product_price_id: u64,
    /// Current unit price, server-computed from the price list.
    pub product_price: Decimal,
}

/// Request body for `POST /vendors/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockChange {
    /// Goods received into stock.
    #[serde(rename = "in")]
    In,
    /// Goods booked out of stock.
    #[serde(rename = "out")]
    Out,
}

/// Request body for `POST /vendors/products/{id}/stocks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdate {
    pub quantity: u32,
    #[serde(rename = "type")]
    pub change: StockChange,
    pub description: String,
}
