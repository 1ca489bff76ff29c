use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Authorized remaining units for one (consumer, service code) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBlock {
    pub id: i64,
    pub consumer: i64,
    pub service_code: i64,
    pub units: Decimal,
}
