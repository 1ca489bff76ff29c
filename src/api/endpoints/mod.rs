//! HTTP endpoint handlers.

pub mod bill_sheets;
pub mod health;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Run SQLite work on the blocking pool with a fresh connection.
pub(crate) async fn with_db<T, F>(ctx: &ApiContext, work: F) -> Result<T, ApiError>
where
    F: FnOnce(&CoreState, &Connection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let core = ctx.core.clone();
    tokio::task::spawn_blocking(move || {
        let conn = core.open_db()?;
        work(core.as_ref(), &conn)
    })
    .await?
}
