//! Cart entities and vendor grouping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single cart line. A cart holds at most one item per product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: u64,
    pub product_name: String,
    /// Unit price at the time the item was added, server-computed.
    pub product_price: Decimal,
    pub quantity: u32,
    /// Reference into the vendor's price list.
    pub product_price_id: u64,
    pub vendor_id: u64,
    pub vendor_name: String,
}

/// Wire shape of `GET /cart`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

/// Cart items of a single vendor, as partitioned by [`group_by_vendor`].
#[derive(Debug, Clone)]
pub struct VendorGroup {
    pub vendor_id: u64,
    pub vendor_name: String,
    pub items: Vec<CartItem>,
}

/// Partitions items into one group per vendor.
///
/// Groups appear in first-occurrence order of their vendor id; within a
/// group, items keep their relative order from the input.
pub fn group_by_vendor(items: &[CartItem]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for item in items {
        let idx = *index.entry(item.vendor_id).or_insert_with(|| {
            groups.push(VendorGroup {
                vendor_id: item.vendor_id,
                vendor_name: item.vendor_name.clone(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].items.push(item.clone());
    }

    groups
}
