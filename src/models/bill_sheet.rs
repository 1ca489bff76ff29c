use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored bill-sheet entry. `billed_amount` is always derived from the
/// service code's unit rate, never taken from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSheetEntry {
    pub id: i64,
    pub specialist: i64,
    pub consumer: i64,
    pub units: Decimal,
    pub service_date: NaiveDate,
    pub service_code: i64,
    pub hold: bool,
    pub contract_type: Option<String>,
    pub recipient_id: Option<String>,
    pub record_number: Option<String>,
    pub status: Option<i64>,
    /// External billing code the entry is submitted under.
    pub billed_code: Option<String>,
    pub billed_amount: Decimal,
    pub county: Option<i64>,
    pub confirmation: Option<String>,
    pub description: Option<String>,
}

impl BillSheetEntry {
    /// Service date as shown on printed bill sheets (`MM/DD/YY`).
    pub fn formatted_date(&self) -> String {
        self.service_date.format("%m/%d/%y").to_string()
    }
}

/// Client-supplied fields for creating or updating an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSheetPayload {
    pub specialist: i64,
    /// The logged-in specialist when entering on behalf of `specialist`.
    #[serde(default)]
    pub real_specialist: Option<i64>,
    pub consumer: i64,
    pub units: Decimal,
    pub service_date: String,
    pub service_code: i64,
    #[serde(default)]
    pub hold: Option<bool>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub record_number: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub billed_code: Option<String>,
    #[serde(default)]
    pub county: Option<i64>,
    #[serde(default)]
    pub confirmation: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl BillSheetPayload {
    /// Specialist whose authorization level governs date checks.
    pub fn acting_specialist(&self) -> i64 {
        self.real_specialist.unwrap_or(self.specialist)
    }
}

/// Fully resolved row, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillSheetRow {
    pub specialist: i64,
    pub consumer: i64,
    pub units: Decimal,
    pub service_date: NaiveDate,
    pub service_code: i64,
    pub hold: bool,
    pub contract_type: Option<String>,
    pub recipient_id: Option<String>,
    pub record_number: Option<String>,
    pub status: Option<i64>,
    /// External billing code the entry is submitted under.
    pub billed_code: Option<String>,
    pub billed_amount: Decimal,
    pub county: Option<i64>,
    pub confirmation: Option<String>,
    pub description: Option<String>,
}

impl NewBillSheetRow {
    pub fn into_entry(self, id: i64) -> BillSheetEntry {
        BillSheetEntry {
            id,
            specialist: self.specialist,
            consumer: self.consumer,
            units: self.units,
            service_date: self.service_date,
            service_code: self.service_code,
            hold: self.hold,
            contract_type: self.contract_type,
            recipient_id: self.recipient_id,
            record_number: self.record_number,
            status: self.status,
            billed_code: self.billed_code,
            billed_amount: self.billed_amount,
            county: self.county,
            confirmation: self.confirmation,
            description: self.description,
        }
    }
}
