//! Shared types for the API layer.

use std::sync::Arc;

use serde::Serialize;

use crate::billing::{BillSheetPage, Pager};
use crate::core_state::CoreState;
use crate::models::BillSheetEntry;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// A bill-sheet entry as returned to clients, with the printable date.
#[derive(Debug, Clone, Serialize)]
pub struct BillSheetView {
    #[serde(flatten)]
    pub entry: BillSheetEntry,
    pub formatted_date: String,
}

impl From<BillSheetEntry> for BillSheetView {
    fn from(entry: BillSheetEntry) -> Self {
        let formatted_date = entry.formatted_date();
        Self {
            entry,
            formatted_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillSheetPageView {
    pub billsheets: Vec<BillSheetView>,
    pub pager: Pager,
}

impl From<BillSheetPage> for BillSheetPageView {
    fn from(page: BillSheetPage) -> Self {
        Self {
            billsheets: page.billsheets.into_iter().map(BillSheetView::from).collect(),
            pager: page.pager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn view_flattens_entry_and_adds_formatted_date() {
        let entry = BillSheetEntry {
            id: 3,
            specialist: 1,
            consumer: 2,
            units: Decimal::new(25, 1),
            service_date: NaiveDate::from_ymd_opt(2024, 7, 4).unwrap(),
            service_code: 5,
            hold: false,
            contract_type: None,
            recipient_id: None,
            record_number: None,
            status: None,
            billed_code: None,
            billed_amount: Decimal::new(3125, 2),
            county: None,
            confirmation: None,
            description: None,
        };
        let json = serde_json::to_value(BillSheetView::from(entry)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["service_date"], "2024-07-04");
        assert_eq!(json["formatted_date"], "07/04/24");
        assert_eq!(json["billed_amount"], "31.25");
    }
}
