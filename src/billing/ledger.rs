//! Unit-block ledger: the authorized units a consumer has left per service code.

use rusqlite::Connection;
use rust_decimal::Decimal;

use super::{BillingError, SEE_ADMINISTRATOR};
use crate::db;
use crate::models::enums::OverdrawPolicy;
use crate::models::UnitBlock;

fn single_block(
    conn: &Connection,
    consumer: i64,
    service_code: i64,
) -> Result<Option<UnitBlock>, BillingError> {
    let mut blocks = db::find_unit_blocks(conn, consumer, service_code)?;
    match blocks.len() {
        0 => Ok(None),
        1 => Ok(blocks.pop()),
        _ => Err(BillingError::Conflict(format!(
            "Consumer {consumer} has multiple unit blocks for service code {service_code}. {SEE_ADMINISTRATOR}"
        ))),
    }
}

/// Move the block for (consumer, service code) by `current_record_units -
/// new_units` and return the balance written.
///
/// On create `current_record_units` is zero. A balance that would go below
/// zero is clamped or rejected according to `policy`.
pub fn adjust_unit_block(
    conn: &Connection,
    policy: OverdrawPolicy,
    consumer: i64,
    service_code: i64,
    current_record_units: Decimal,
    new_units: Decimal,
) -> Result<Decimal, BillingError> {
    let block = single_block(conn, consumer, service_code)?.ok_or_else(|| {
        BillingError::Authorization(
            "This Consumer is not authorized for that Service Code".into(),
        )
    })?;

    let mut balance = block.units + (current_record_units - new_units);
    if balance < Decimal::ZERO {
        match policy {
            OverdrawPolicy::Clamp => {
                tracing::warn!(
                    block_id = block.id,
                    consumer,
                    service_code,
                    shortfall = %(-balance),
                    "Unit block overdrawn, clamping to zero"
                );
                balance = Decimal::ZERO;
            }
            OverdrawPolicy::Reject => {
                return Err(BillingError::Conflict(format!(
                    "Only {} units remain for this Consumer and Service Code",
                    block.units.normalize()
                )));
            }
        }
    }

    db::set_unit_block_units(conn, block.id, balance)?;
    tracing::debug!(
        block_id = block.id,
        consumer,
        service_code,
        remaining = %balance,
        "Unit block adjusted"
    );
    Ok(balance)
}

/// Return units to the block for (consumer, service code) when an entry
/// moves off that pair. A pair without a block is left alone.
pub fn credit_unit_block(
    conn: &Connection,
    consumer: i64,
    service_code: i64,
    units: Decimal,
) -> Result<Option<Decimal>, BillingError> {
    let Some(block) = single_block(conn, consumer, service_code)? else {
        tracing::debug!(consumer, service_code, "No unit block to credit");
        return Ok(None);
    };
    let balance = block.units + units;
    db::set_unit_block_units(conn, block.id, balance)?;
    Ok(Some(balance))
}
