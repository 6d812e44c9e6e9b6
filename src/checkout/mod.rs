//! Order submission support: turns a checkout selection into the
//! `POST /orders` request body.

use thiserror::Error;

use crate::domain::{
    CartItem, OrderCreate, OrderItem, OrdersCreate, PaymentInfo, group_by_vendor,
};

/// Checkout request construction errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing is selected for checkout.
    #[error("checkout selection is empty")]
    EmptySelection,
}

/// Builds an [`OrdersCreate`] request from the checkout selection:
/// one sub-order per vendor (first-occurrence vendor order, stable item
/// order) sharing a single payment/recipient payload.
pub fn build_orders_create(
    selection: &[CartItem],
    payment: &PaymentInfo,
) -> Result<OrdersCreate, CheckoutError> {
    if selection.is_empty() {
        return Err(CheckoutError::EmptySelection);
    }

    let orders = group_by_vendor(selection)
        .into_iter()
        .map(|group| OrderCreate {
            items: group
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price: item.product_price,
                })
                .collect(),
        })
        .collect();

    Ok(OrdersCreate {
        orders,
        payment_method_id: payment.payment_method_id.clone(),
        recipient_address: payment.recipient_address.clone(),
        recipient_name: payment.recipient_name.clone(),
        recipient_phone: payment.recipient_phone.clone(),
    })
}
