use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use super::{decimal_from_sql, decimal_to_sql};
use crate::db::DatabaseError;
use crate::models::ServiceCode;

/// Authorization level of a specialist, `None` when the id is unknown.
pub fn lookup_auth_level(conn: &Connection, specialist: i64) -> Result<Option<i64>, DatabaseError> {
    let level = conn
        .query_row(
            "SELECT auth_level FROM specialist WHERE id = ?1",
            params![specialist],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(level)
}

pub fn get_service_code(conn: &Connection, id: i64) -> Result<Option<ServiceCode>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, unit_rate, description FROM service_code WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, name, unit_rate, description)) => Ok(Some(ServiceCode {
            id,
            name,
            unit_rate: decimal_from_sql("unit_rate", &unit_rate)?,
            description,
        })),
        None => Ok(None),
    }
}

/// Unit rate of a service code, `None` when the code has no row.
pub fn lookup_unit_rate(conn: &Connection, service_code: i64) -> Result<Option<Decimal>, DatabaseError> {
    Ok(get_service_code(conn, service_code)?.map(|code| code.unit_rate))
}

pub fn insert_specialist(
    conn: &Connection,
    username: &str,
    firstname: &str,
    lastname: &str,
    auth_level: i64,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO specialist (username, firstname, lastname, auth_level) VALUES (?1, ?2, ?3, ?4)",
        params![username, firstname, lastname, auth_level],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_consumer(
    conn: &Connection,
    firstname: &str,
    lastname: &str,
    active: bool,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO consumer (firstname, lastname, active) VALUES (?1, ?2, ?3)",
        params![firstname, lastname, active as i32],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_consumer_active(conn: &Connection, id: i64, active: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE consumer SET active = ?1 WHERE id = ?2",
        params![active as i32, id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "consumer".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn insert_service_code(
    conn: &Connection,
    name: &str,
    unit_rate: Decimal,
    description: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO service_code (name, unit_rate, description) VALUES (?1, ?2, ?3)",
        params![name, decimal_to_sql(&unit_rate), description],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed, test_db};

    #[test]
    fn auth_level_lookup() {
        let conn = test_db();
        let s = seed(&conn);
        assert_eq!(lookup_auth_level(&conn, s.admin).unwrap(), Some(1));
        assert_eq!(lookup_auth_level(&conn, s.specialist).unwrap(), Some(2));
        assert_eq!(lookup_auth_level(&conn, 9999).unwrap(), None);
    }

    #[test]
    fn unit_rate_keeps_exact_decimal() {
        let conn = test_db();
        let code = insert_service_code(&conn, "X", Decimal::new(10005, 3), Some("odd rate")).unwrap();
        assert_eq!(lookup_unit_rate(&conn, code).unwrap(), Some(Decimal::new(10005, 3)));
        assert_eq!(lookup_unit_rate(&conn, code + 1).unwrap(), None);

        let stored = get_service_code(&conn, code).unwrap().unwrap();
        assert_eq!(stored.name, "X");
        assert_eq!(stored.description.as_deref(), Some("odd rate"));
    }

    #[test]
    fn deactivating_unknown_consumer_is_not_found() {
        let conn = test_db();
        let err = set_consumer_active(&conn, 42, false).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
