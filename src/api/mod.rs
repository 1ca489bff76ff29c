//! HTTP API.
//!
//! Routes are nested under `/api/` and pass through the access-logging
//! middleware. Handlers run database work on the blocking pool.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server_on, ApiServer};
pub use types::ApiContext;
