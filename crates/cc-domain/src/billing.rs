use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A VPS line on the account's orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpsOrder {
    pub order_id: Uuid,
    pub product_name: String,
    pub service_name: String,
    pub billing_at: DateTime<FixedOffset>,
    pub unit_price: i64,
    pub status: String,
}
