//! Page filters: allow-listed conditions compiled to a parameterized
//! predicate. Caller text never reaches the SQL string.

use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use super::service_date::parse_service_date;
use super::BillingError;
use crate::db::repository::{date_to_sql, SqlPredicate};
use crate::models::enums::{FilterField, FilterOp};

/// All conditions must hold. An empty filter matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillSheetFilter {
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: FilterField,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

enum FieldKind {
    Integer,
    Date,
    Flag,
    Text,
}

fn kind_of(field: FilterField) -> FieldKind {
    match field {
        FilterField::Specialist
        | FilterField::Consumer
        | FilterField::ServiceCode
        | FilterField::Status
        | FilterField::County => FieldKind::Integer,
        FilterField::ServiceDate => FieldKind::Date,
        FilterField::Hold => FieldKind::Flag,
        FilterField::ContractType | FilterField::Confirmation | FilterField::BilledCode => {
            FieldKind::Text
        }
    }
}

fn operator_sql(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Eq => "=",
        FilterOp::Ne => "!=",
        FilterOp::Lt => "<",
        FilterOp::Le => "<=",
        FilterOp::Gt => ">",
        FilterOp::Ge => ">=",
    }
}

fn invalid(field: FilterField, detail: &str) -> BillingError {
    BillingError::InvalidFilter(format!("{field}: {detail}"))
}

impl FilterCondition {
    fn bind_value(&self, today: NaiveDate) -> Result<Value, BillingError> {
        let ordering = !matches!(self.op, FilterOp::Eq | FilterOp::Ne);
        match kind_of(self.field) {
            FieldKind::Integer => self
                .value
                .as_i64()
                .map(Value::Integer)
                .ok_or_else(|| invalid(self.field, "expected an integer")),
            FieldKind::Date => {
                let raw = self
                    .value
                    .as_str()
                    .ok_or_else(|| invalid(self.field, "expected a date string"))?;
                let date = parse_service_date(raw, today)
                    .map_err(|err| invalid(self.field, &err.to_string()))?;
                Ok(Value::Text(date_to_sql(&date)))
            }
            FieldKind::Flag if ordering => Err(invalid(self.field, "only eq and ne are allowed")),
            FieldKind::Flag => self
                .value
                .as_bool()
                .map(|b| Value::Integer(b as i64))
                .ok_or_else(|| invalid(self.field, "expected true or false")),
            FieldKind::Text if ordering => Err(invalid(self.field, "only eq and ne are allowed")),
            FieldKind::Text => self
                .value
                .as_str()
                .map(|s| Value::Text(s.to_string()))
                .ok_or_else(|| invalid(self.field, "expected a string")),
        }
    }
}

impl BillSheetFilter {
    /// Compile to a predicate over the `billsheet` table. `today` resolves
    /// dates written without a year.
    pub fn compile(&self, today: NaiveDate) -> Result<SqlPredicate, BillingError> {
        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut params = Vec::with_capacity(self.conditions.len());
        for condition in &self.conditions {
            params.push(condition.bind_value(today)?);
            clauses.push(format!(
                "billsheet.{} {} ?",
                condition.field.as_str(),
                operator_sql(condition.op)
            ));
        }
        Ok(SqlPredicate {
            sql: clauses.join(" AND "),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn filter(value: serde_json::Value) -> BillSheetFilter {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_filter_compiles_to_nothing() {
        let predicate = BillSheetFilter::default().compile(today()).unwrap();
        assert!(predicate.is_empty());
        assert!(predicate.params.is_empty());
    }

    #[test]
    fn conditions_are_anded_with_bound_values() {
        let f = filter(json!({
            "conditions": [
                { "field": "county", "op": "eq", "value": 3 },
                { "field": "service_date", "op": "ge", "value": "06/01/24" },
                { "field": "hold", "op": "eq", "value": true },
                { "field": "contract_type", "op": "ne", "value": "x'; DROP TABLE billsheet; --" }
            ]
        }));
        let predicate = f.compile(today()).unwrap();
        assert_eq!(
            predicate.sql,
            "billsheet.county = ? AND billsheet.service_date >= ? AND billsheet.hold = ? \
             AND billsheet.contract_type != ?"
        );
        assert_eq!(
            predicate.params,
            vec![
                Value::Integer(3),
                Value::Text("2024-06-01".into()),
                Value::Integer(1),
                Value::Text("x'; DROP TABLE billsheet; --".into()),
            ]
        );
    }

    #[test]
    fn unknown_fields_do_not_deserialize() {
        let parsed: Result<BillSheetFilter, _> = serde_json::from_value(json!({
            "conditions": [{ "field": "1=1 OR id", "op": "eq", "value": 1 }]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn billed_code_matches_as_text() {
        let predicate = filter(json!({
            "conditions": [{ "field": "billed_code", "op": "eq", "value": "T1017" }]
        }))
        .compile(today())
        .unwrap();
        assert_eq!(predicate.sql, "billsheet.billed_code = ?");
        assert_eq!(predicate.params, vec![Value::Text("T1017".into())]);
    }

    #[test]
    fn ordering_on_text_is_rejected() {
        let f = filter(json!({
            "conditions": [{ "field": "confirmation", "op": "lt", "value": "A" }]
        }));
        assert!(matches!(f.compile(today()), Err(BillingError::InvalidFilter(_))));
    }

    #[test]
    fn type_mismatches_are_rejected() {
        for bad in [
            json!({ "field": "county", "op": "eq", "value": "three" }),
            json!({ "field": "hold", "op": "eq", "value": 1 }),
            json!({ "field": "service_date", "op": "eq", "value": "13/45/24" }),
        ] {
            let f = filter(json!({ "conditions": [bad] }));
            assert!(matches!(f.compile(today()), Err(BillingError::InvalidFilter(_))));
        }
    }
}
