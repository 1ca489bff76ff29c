//! Bill-sheet operations exposed to the HTTP layer.
//!
//! A create or update runs validate → detect duplicate/hold → price →
//! adjust unit block → write inside one transaction. Any error drops the
//! transaction before commit, so nothing from a failed call is persisted.

use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;

use super::duplicate::{resolve_hold, EntryKey};
use super::ledger::{adjust_unit_block, credit_unit_block};
use super::service_date::validate_service_date;
use super::{compute_billed_amount, BillSheetFilter, BillSheetPage, BillingError, Pager};
use crate::config::{BillingRules, RECORDS_PER_PAGE};
use crate::db;
use crate::models::{BillSheetEntry, BillSheetPayload, NewBillSheetRow};

/// A bill-sheet write, resolved at compile time rather than by inspecting
/// the payload.
#[derive(Debug, Clone)]
pub enum BillSheetWrite {
    Create(BillSheetPayload),
    Update { id: i64, payload: BillSheetPayload },
}

impl BillSheetWrite {
    fn payload(&self) -> &BillSheetPayload {
        match self {
            BillSheetWrite::Create(payload) => payload,
            BillSheetWrite::Update { payload, .. } => payload,
        }
    }

    fn existing_id(&self) -> Option<i64> {
        match self {
            BillSheetWrite::Create(_) => None,
            BillSheetWrite::Update { id, .. } => Some(*id),
        }
    }
}

fn not_found(id: i64) -> BillingError {
    BillingError::NotFound(format!("Bill sheet {id} not found"))
}

// ═══════════════════════════════════════════
// Writes
// ═══════════════════════════════════════════

pub fn write_bill_sheet(
    conn: &Connection,
    rules: &BillingRules,
    write: &BillSheetWrite,
    today: NaiveDate,
) -> Result<BillSheetEntry, BillingError> {
    let payload = write.payload();
    if payload.units < Decimal::ZERO {
        return Err(BillingError::Validation("Units cannot be negative".into()));
    }

    // Take the write lock up front so concurrent writers queue on the busy
    // timeout instead of failing when a read lock cannot be upgraded.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let previous = match write.existing_id() {
        Some(id) => Some(db::get_bill_sheet(&tx, id)?.ok_or_else(|| not_found(id))?),
        None => None,
    };

    let service_date =
        validate_service_date(&tx, payload.acting_specialist(), &payload.service_date, today)?;

    let key = EntryKey {
        specialist: payload.specialist,
        consumer: payload.consumer,
        service_code: payload.service_code,
        service_date,
    };
    let hold = resolve_hold(
        &tx,
        rules.duplicate_policy,
        &key,
        payload.hold.unwrap_or(false),
        write.existing_id(),
    )?;

    let unit_rate = db::lookup_unit_rate(&tx, payload.service_code)?.ok_or_else(|| {
        BillingError::NotFound(format!("Service code {} has no unit rate", payload.service_code))
    })?;

    let remaining = match &previous {
        Some(prev)
            if prev.consumer == payload.consumer && prev.service_code == payload.service_code =>
        {
            adjust_unit_block(
                &tx,
                rules.overdraw_policy,
                payload.consumer,
                payload.service_code,
                prev.units,
                payload.units,
            )?
        }
        Some(prev) => {
            credit_unit_block(&tx, prev.consumer, prev.service_code, prev.units)?;
            adjust_unit_block(
                &tx,
                rules.overdraw_policy,
                payload.consumer,
                payload.service_code,
                Decimal::ZERO,
                payload.units,
            )?
        }
        None => adjust_unit_block(
            &tx,
            rules.overdraw_policy,
            payload.consumer,
            payload.service_code,
            Decimal::ZERO,
            payload.units,
        )?,
    };

    let row = NewBillSheetRow {
        specialist: payload.specialist,
        consumer: payload.consumer,
        units: payload.units,
        service_date,
        service_code: payload.service_code,
        hold,
        contract_type: payload.contract_type.clone(),
        recipient_id: payload.recipient_id.clone(),
        record_number: payload.record_number.clone(),
        status: payload.status,
        billed_code: payload.billed_code.clone(),
        billed_amount: compute_billed_amount(unit_rate, payload.units),
        county: payload.county,
        confirmation: payload.confirmation.clone(),
        description: payload.description.clone(),
    };

    let id = match write.existing_id() {
        Some(id) => {
            db::update_bill_sheet(&tx, id, &row)?;
            id
        }
        None => db::insert_bill_sheet(&tx, &row)?,
    };

    tx.commit()?;

    tracing::info!(
        id,
        consumer = row.consumer,
        service_code = row.service_code,
        remaining_units = %remaining,
        billed_amount = %row.billed_amount,
        created = previous.is_none(),
        "Bill sheet written"
    );
    Ok(row.into_entry(id))
}

pub fn create_bill_sheet(
    conn: &Connection,
    rules: &BillingRules,
    payload: BillSheetPayload,
    today: NaiveDate,
) -> Result<BillSheetEntry, BillingError> {
    write_bill_sheet(conn, rules, &BillSheetWrite::Create(payload), today)
}

pub fn update_bill_sheet(
    conn: &Connection,
    rules: &BillingRules,
    id: i64,
    payload: BillSheetPayload,
    today: NaiveDate,
) -> Result<BillSheetEntry, BillingError> {
    write_bill_sheet(conn, rules, &BillSheetWrite::Update { id, payload }, today)
}

/// Delete by id. The unit block is not credited.
pub fn delete_bill_sheet(conn: &Connection, id: i64) -> Result<i64, BillingError> {
    if !db::delete_bill_sheet(conn, id)? {
        return Err(not_found(id));
    }
    tracing::info!(id, "Bill sheet deleted");
    Ok(id)
}

// ═══════════════════════════════════════════
// Reads
// ═══════════════════════════════════════════

pub fn get_bill_sheet(conn: &Connection, id: i64) -> Result<BillSheetEntry, BillingError> {
    db::get_bill_sheet(conn, id)?.ok_or_else(|| not_found(id))
}

pub fn list_bill_sheets(conn: &Connection) -> Result<Vec<BillSheetEntry>, BillingError> {
    Ok(db::list_bill_sheets(conn)?)
}

/// One page of entries for active consumers, newest service date first.
pub fn page_bill_sheets(
    conn: &Connection,
    page: i64,
    filter: &BillSheetFilter,
    today: NaiveDate,
) -> Result<BillSheetPage, BillingError> {
    let predicate = filter.compile(today)?;
    let total_count = db::count_active_bill_sheets(conn, &predicate)?;
    let pager = Pager::new(page, RECORDS_PER_PAGE, total_count);
    let billsheets = if pager.slice_len() == 0 {
        Vec::new()
    } else {
        db::page_active_bill_sheets(conn, &predicate, pager.offset(), pager.records_per_page)?
    };
    Ok(BillSheetPage { billsheets, pager })
}
