use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{decimal_from_sql, decimal_to_sql};
use crate::db::DatabaseError;
use crate::models::UnitBlock;

pub fn insert_unit_block(
    conn: &Connection,
    consumer: i64,
    service_code: i64,
    units: Decimal,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO unit_block (consumer, service_code, units) VALUES (?1, ?2, ?3)",
        params![consumer, service_code, decimal_to_sql(&units)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_unit_block(conn: &Connection, id: i64) -> Result<Option<UnitBlock>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, consumer, service_code, units FROM unit_block WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, consumer, service_code, units)| {
        Ok(UnitBlock {
            id,
            consumer,
            service_code,
            units: decimal_from_sql("unit_block.units", &units)?,
        })
    })
    .transpose()
}

/// All unit blocks for a (consumer, service code) pair. Exactly one is
/// expected; callers decide what zero or several mean.
pub fn find_unit_blocks(
    conn: &Connection,
    consumer: i64,
    service_code: i64,
) -> Result<Vec<UnitBlock>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, consumer, service_code, units FROM unit_block
         WHERE consumer = ?1 AND service_code = ?2 ORDER BY id",
    )?;

    let rows = stmt.query_map(params![consumer, service_code], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut blocks = Vec::new();
    for row in rows {
        let (id, consumer, service_code, units) = row?;
        blocks.push(UnitBlock {
            id,
            consumer,
            service_code,
            units: decimal_from_sql("unit_block.units", &units)?,
        });
    }
    Ok(blocks)
}

pub fn set_unit_block_units(conn: &Connection, id: i64, units: Decimal) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE unit_block SET units = ?1 WHERE id = ?2",
        params![decimal_to_sql(&units), id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "unit_block".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
