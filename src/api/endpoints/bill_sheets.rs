//! Bill-sheet endpoints.
//!
//! - `POST   /api/billsheet` — create
//! - `GET    /api/billsheet/:id` — read one
//! - `PUT    /api/billsheet/:id` — update
//! - `DELETE /api/billsheet/:id` — delete
//! - `GET    /api/billsheet/list` — every entry
//! - `POST   /api/billsheet/list/:page` — one page, optional `{ "filter": … }`

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::with_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, BillSheetPageView, BillSheetView};
use crate::billing::{workflow, BillSheetFilter};
use crate::models::BillSheetPayload;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRequest {
    #[serde(default)]
    pub filter: BillSheetFilter,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    Json(payload): Json<BillSheetPayload>,
) -> Result<Json<BillSheetView>, ApiError> {
    let entry = with_db(&ctx, move |core, conn| {
        Ok(workflow::create_bill_sheet(conn, &core.rules, payload, core.today())?)
    })
    .await?;
    Ok(Json(entry.into()))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<BillSheetPayload>,
) -> Result<Json<BillSheetView>, ApiError> {
    let entry = with_db(&ctx, move |core, conn| {
        Ok(workflow::update_bill_sheet(conn, &core.rules, id, payload, core.today())?)
    })
    .await?;
    Ok(Json(entry.into()))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let id = with_db(&ctx, move |_, conn| Ok(workflow::delete_bill_sheet(conn, id)?)).await?;
    Ok(Json(DeletedResponse { id }))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<BillSheetView>, ApiError> {
    let entry = with_db(&ctx, move |_, conn| Ok(workflow::get_bill_sheet(conn, id)?)).await?;
    Ok(Json(entry.into()))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<BillSheetView>>, ApiError> {
    let entries = with_db(&ctx, |_, conn| Ok(workflow::list_bill_sheets(conn)?)).await?;
    Ok(Json(entries.into_iter().map(BillSheetView::from).collect()))
}

/// The body is optional; an empty body pages without a filter.
pub async fn page(
    State(ctx): State<ApiContext>,
    Path(page): Path<i64>,
    body: Bytes,
) -> Result<Json<BillSheetPageView>, ApiError> {
    if page < 0 {
        return Err(ApiError::BadRequest("Page must not be negative".into()));
    }
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PageRequest::default()
    } else {
        serde_json::from_slice::<PageRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid page request: {e}")))?
    };

    let result = with_db(&ctx, move |core, conn| {
        Ok(workflow::page_bill_sheets(conn, page, &request.filter, core.today())?)
    })
    .await?;
    Ok(Json(result.into()))
}
