//! Payment collaborator types.

use serde::{Deserialize, Serialize};

/// A payment method offered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
}

/// Payment and recipient details shared by every sub-order of a checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub payment_method_id: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
}
