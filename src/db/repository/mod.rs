//! Repository layer — table-scoped database operations.
//!
//! Every function takes a `&Connection`, so the same code runs against a
//! plain connection or inside a `Transaction` (which derefs to one).

mod bill_sheet;
mod reference;
mod unit_block;

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::types::Value;

use super::DatabaseError;

pub use bill_sheet::*;
pub use reference::*;
pub use unit_block::*;

/// A parameterized SQL fragment. `sql` uses positional `?` placeholders,
/// bound in order from `params`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlPredicate {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlPredicate {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Storage form for dates: ISO `YYYY-MM-DD`.
pub(crate) fn date_to_sql(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn date_from_sql(field: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: raw.into(),
    })
}

/// Decimals are stored as text with their scale, so `12.50` reads back as `12.50`.
pub(crate) fn decimal_to_sql(value: &Decimal) -> String {
    value.to_string()
}

pub(crate) fn decimal_from_sql(field: &str, raw: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(raw).map_err(|_| DatabaseError::InvalidValue {
        field: field.into(),
        value: raw.into(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_storage_form_keeps_scale() {
        assert_eq!(decimal_to_sql(&Decimal::new(2500, 2)), "25.00");
        assert_eq!(decimal_to_sql(&Decimal::new(2467, 2)), "24.67");
        assert_eq!(decimal_from_sql("units", "24.670").unwrap(), Decimal::new(2467, 2));
    }

    #[test]
    fn bad_stored_values_are_reported_with_field() {
        let err = decimal_from_sql("units", "abc").unwrap_err();
        assert!(err.to_string().contains("units"));
        assert!(date_from_sql("service_date", "03/01/24").is_err());
    }
}
