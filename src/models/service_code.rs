use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Billing category with its per-unit rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCode {
    pub id: i64,
    pub name: String,
    pub unit_rate: Decimal,
    pub description: Option<String>,
}
