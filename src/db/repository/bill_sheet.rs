use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{date_from_sql, date_to_sql, decimal_from_sql, decimal_to_sql, SqlPredicate};
use crate::db::DatabaseError;
use crate::models::{BillSheetEntry, NewBillSheetRow};

const BILLSHEET_COLUMNS: &str = "billsheet.id, billsheet.specialist, billsheet.consumer, \
     billsheet.units, billsheet.service_date, billsheet.service_code, billsheet.hold, \
     billsheet.contract_type, billsheet.recipient_id, billsheet.record_number, \
     billsheet.status, billsheet.billed_amount, billsheet.county, billsheet.confirmation, \
     billsheet.description, billsheet.billed_code";

/// Pages only show entries for consumers that are still active.
const ACTIVE_CONSUMER_JOIN: &str =
    "INNER JOIN consumer ON consumer.id = billsheet.consumer WHERE consumer.active = 1";

/// Raw column values, converted to `BillSheetEntry` after the row is read.
struct BillSheetRow {
    id: i64,
    specialist: i64,
    consumer: i64,
    units: String,
    service_date: String,
    service_code: i64,
    hold: i64,
    contract_type: Option<String>,
    recipient_id: Option<String>,
    record_number: Option<String>,
    status: Option<i64>,
    billed_amount: String,
    county: Option<i64>,
    confirmation: Option<String>,
    description: Option<String>,
    billed_code: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<BillSheetRow> {
    Ok(BillSheetRow {
        id: row.get(0)?,
        specialist: row.get(1)?,
        consumer: row.get(2)?,
        units: row.get(3)?,
        service_date: row.get(4)?,
        service_code: row.get(5)?,
        hold: row.get(6)?,
        contract_type: row.get(7)?,
        recipient_id: row.get(8)?,
        record_number: row.get(9)?,
        status: row.get(10)?,
        billed_amount: row.get(11)?,
        county: row.get(12)?,
        confirmation: row.get(13)?,
        description: row.get(14)?,
        billed_code: row.get(15)?,
    })
}

fn entry_from_row(row: BillSheetRow) -> Result<BillSheetEntry, DatabaseError> {
    Ok(BillSheetEntry {
        id: row.id,
        specialist: row.specialist,
        consumer: row.consumer,
        units: decimal_from_sql("billsheet.units", &row.units)?,
        service_date: date_from_sql("billsheet.service_date", &row.service_date)?,
        service_code: row.service_code,
        hold: row.hold != 0,
        contract_type: row.contract_type,
        recipient_id: row.recipient_id,
        record_number: row.record_number,
        status: row.status,
        billed_code: row.billed_code,
        billed_amount: decimal_from_sql("billsheet.billed_amount", &row.billed_amount)?,
        county: row.county,
        confirmation: row.confirmation,
        description: row.description,
    })
}

fn collect_entries(
    conn: &Connection,
    sql: &str,
    params: Vec<Value>,
) -> Result<Vec<BillSheetEntry>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(params), read_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(entry_from_row(row?)?);
    }
    Ok(entries)
}

pub fn insert_bill_sheet(conn: &Connection, row: &NewBillSheetRow) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO billsheet (specialist, consumer, units, service_date, service_code, hold,
         contract_type, recipient_id, record_number, status, billed_amount, county,
         confirmation, description, billed_code)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            row.specialist,
            row.consumer,
            decimal_to_sql(&row.units),
            date_to_sql(&row.service_date),
            row.service_code,
            row.hold as i32,
            row.contract_type,
            row.recipient_id,
            row.record_number,
            row.status,
            decimal_to_sql(&row.billed_amount),
            row.county,
            row.confirmation,
            row.description,
            row.billed_code,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_bill_sheet(
    conn: &Connection,
    id: i64,
    row: &NewBillSheetRow,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE billsheet SET specialist = ?1, consumer = ?2, units = ?3, service_date = ?4,
         service_code = ?5, hold = ?6, contract_type = ?7, recipient_id = ?8,
         record_number = ?9, status = ?10, billed_amount = ?11, county = ?12,
         confirmation = ?13, description = ?14, billed_code = ?15
         WHERE id = ?16",
        params![
            row.specialist,
            row.consumer,
            decimal_to_sql(&row.units),
            date_to_sql(&row.service_date),
            row.service_code,
            row.hold as i32,
            row.contract_type,
            row.recipient_id,
            row.record_number,
            row.status,
            decimal_to_sql(&row.billed_amount),
            row.county,
            row.confirmation,
            row.description,
            row.billed_code,
            id,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "billsheet".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Returns `false` when no row had that id.
pub fn delete_bill_sheet(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM billsheet WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn get_bill_sheet(conn: &Connection, id: i64) -> Result<Option<BillSheetEntry>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {BILLSHEET_COLUMNS} FROM billsheet WHERE id = ?1"),
            params![id],
            read_row,
        )
        .optional()?;
    row.map(entry_from_row).transpose()
}

pub fn list_bill_sheets(conn: &Connection) -> Result<Vec<BillSheetEntry>, DatabaseError> {
    collect_entries(
        conn,
        &format!("SELECT {BILLSHEET_COLUMNS} FROM billsheet ORDER BY billsheet.id"),
        Vec::new(),
    )
}

/// Entries by the same specialist for the same consumer, service code and
/// day. `exclude_id` leaves the row being updated out of the count.
pub fn count_duplicate_bill_sheets(
    conn: &Connection,
    specialist: i64,
    consumer: i64,
    service_code: i64,
    service_date: &NaiveDate,
    exclude_id: Option<i64>,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM billsheet
         WHERE specialist = ?1 AND consumer = ?2 AND service_code = ?3 AND service_date = ?4
           AND (?5 IS NULL OR id != ?5)",
        params![specialist, consumer, service_code, date_to_sql(service_date), exclude_id],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Ids of every entry for the consumer on that day with that service code,
/// regardless of specialist.
pub fn find_same_day_bill_sheets(
    conn: &Connection,
    consumer: i64,
    service_code: i64,
    service_date: &NaiveDate,
) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM billsheet
         WHERE consumer = ?1 AND service_date = ?2 AND service_code = ?3 ORDER BY id",
    )?;
    let ids = stmt
        .query_map(
            params![consumer, date_to_sql(service_date), service_code],
            |row| row.get::<_, i64>(0),
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

pub fn set_bill_sheet_hold(conn: &Connection, id: i64, hold: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE billsheet SET hold = ?1 WHERE id = ?2",
        params![hold as i32, id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "billsheet".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Count of entries for active consumers matching an optional predicate.
pub fn count_active_bill_sheets(
    conn: &Connection,
    predicate: &SqlPredicate,
) -> Result<i64, DatabaseError> {
    let sql = format!(
        "SELECT COUNT(*) FROM billsheet {ACTIVE_CONSUMER_JOIN}{}",
        and_clause(predicate)
    );
    let count = conn.query_row(&sql, params_from_iter(predicate.params.iter()), |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(count)
}

/// One window of entries for active consumers, newest service date first.
pub fn page_active_bill_sheets(
    conn: &Connection,
    predicate: &SqlPredicate,
    offset: i64,
    limit: i64,
) -> Result<Vec<BillSheetEntry>, DatabaseError> {
    let sql = format!(
        "SELECT {BILLSHEET_COLUMNS} FROM billsheet {ACTIVE_CONSUMER_JOIN}{}
         ORDER BY billsheet.service_date DESC, billsheet.id DESC LIMIT ? OFFSET ?",
        and_clause(predicate)
    );
    let mut params = predicate.params.clone();
    params.push(Value::Integer(limit));
    params.push(Value::Integer(offset));
    collect_entries(conn, &sql, params)
}

fn and_clause(predicate: &SqlPredicate) -> String {
    if predicate.is_empty() {
        String::new()
    } else {
        format!(" AND ({})", predicate.sql)
    }
}
