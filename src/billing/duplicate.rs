//! Duplicate and hold detection for a proposed entry.

use chrono::NaiveDate;
use rusqlite::Connection;

use super::{BillingError, SEE_ADMINISTRATOR};
use crate::db;
use crate::models::enums::DuplicatePolicy;

/// The (specialist, consumer, service code, day) a proposed entry bills for.
#[derive(Debug, Clone, Copy)]
pub struct EntryKey {
    pub specialist: i64,
    pub consumer: i64,
    pub service_code: i64,
    pub service_date: NaiveDate,
}

/// Decide the hold flag the proposed entry is written with, or reject it.
///
/// `existing` is the id of the entry being updated, `None` on create. Under
/// the hold policy a create that finds one prior same-day entry clears that
/// entry's hold flag; this write belongs to the caller's transaction.
pub fn resolve_hold(
    conn: &Connection,
    policy: DuplicatePolicy,
    key: &EntryKey,
    requested_hold: bool,
    existing: Option<i64>,
) -> Result<bool, BillingError> {
    match policy {
        DuplicatePolicy::RejectDuplicates => {
            reject_duplicates(conn, key, existing)?;
            Ok(requested_hold)
        }
        DuplicatePolicy::Hold => reconcile_holds(conn, key, requested_hold, existing),
    }
}

fn reject_duplicates(
    conn: &Connection,
    key: &EntryKey,
    existing: Option<i64>,
) -> Result<(), BillingError> {
    let count = db::count_duplicate_bill_sheets(
        conn,
        key.specialist,
        key.consumer,
        key.service_code,
        &key.service_date,
        existing,
    )?;
    if count > 0 {
        return Err(BillingError::Conflict(format!(
            "Duplicate entry: consumer {} already has an entry on {} with code {} from this specialist",
            key.consumer,
            key.service_date.format("%m/%d/%y"),
            key.service_code,
        )));
    }
    Ok(())
}

fn reconcile_holds(
    conn: &Connection,
    key: &EntryKey,
    requested_hold: bool,
    existing: Option<i64>,
) -> Result<bool, BillingError> {
    let others: Vec<i64> =
        db::find_same_day_bill_sheets(conn, key.consumer, key.service_code, &key.service_date)?
            .into_iter()
            .filter(|id| Some(*id) != existing)
            .collect();

    match others.as_slice() {
        [] => Ok(requested_hold),
        [prior] => {
            if existing.is_none() {
                db::set_bill_sheet_hold(conn, *prior, false)?;
                tracing::info!(
                    prior_id = *prior,
                    consumer = key.consumer,
                    service_code = key.service_code,
                    "Same-day entry corroborated, hold cleared"
                );
            }
            Ok(false)
        }
        _ => Err(BillingError::Conflict(format!(
            "Consumer already has two entries on {} with code {}, aborting. {}",
            key.service_date.format("%m/%d/%y"),
            key.service_code,
            SEE_ADMINISTRATOR,
        ))),
    }
}
