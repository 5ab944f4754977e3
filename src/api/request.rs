use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::request::{AdjustmentRequest, RequestKind, RequestStatus};

#[derive(Deserialize, ToSchema)]
pub struct CreateRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "ot")]
    pub kind: RequestKind,
    #[schema(example = "2026-07-14", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-14", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Overtime hours (required for OT requests).
    #[schema(value_type = f64, nullable = true, example = 2.5)]
    pub hours: Option<Decimal>,
    /// OB engagement kind (required for OB requests).
    #[schema(example = "assisted", nullable = true)]
    pub ob_kind: Option<String>,
    /// OB occurrence count (required for OB requests).
    #[schema(value_type = f64, nullable = true, example = 1)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub has_proof: bool,
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    /// Filter by request kind
    pub kind: Option<RequestKind>,
    /// Filter by request status
    pub status: Option<RequestStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    pub data: Vec<AdjustmentRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Kind(RequestKind),
    Status(RequestStatus),
}

fn validate_kind_fields(payload: &CreateRequest) -> Result<(), &'static str> {
    match payload.kind {
        RequestKind::Ot => {
            let ok = payload.hours.is_some_and(|h| h > Decimal::ZERO);
            if !ok {
                return Err("OT requests need positive hours");
            }
        }
        RequestKind::Ob => {
            if payload.ob_kind.as_deref().is_none_or(str::is_empty) {
                return Err("OB requests need an ob_kind");
            }
            if !payload.quantity.is_some_and(|q| q > Decimal::ZERO) {
                return Err("OB requests need a positive quantity");
            }
        }
        RequestKind::Leave | RequestKind::Wfh => {}
    }
    Ok(())
}

/* =========================
Create adjustment request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body(
        content = CreateRequest,
        description = "Adjustment request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Request submitted",
         body = Object,
         example = json!({
            "message": "Request submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request")
    ),
    tag = "Requests"
)]
pub async fn create_request(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    if let Err(message) = validate_kind_fields(&payload) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": message
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO requests
            (employee_id, kind, status, start_date, end_date, hours, ob_kind,
             quantity, has_proof, reason)
        VALUES (?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.kind)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.hours)
    .bind(&payload.ob_kind)
    .bind(payload.quantity)
    .bind(payload.has_proof)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request submitted",
        "status": "pending"
    })))
}

/* =========================
Approve request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the request to approve")
    ),
    responses(
        (status = 200, description = "Request approved", body = Object, example = json!({
            "message": "Request approved"
        })),
        (status = 400, description = "Request not found or already processed")
    ),
    tag = "Requests"
)]
pub async fn approve_request(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE requests
        SET status = 'approved'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Approve request failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request approved"
    })))
}

/* =========================
Reject request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the request to reject")
    ),
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Request rejected"
        })),
        (status = 400, description = "Request not found or already processed")
    ),
    tag = "Requests"
)]
pub async fn reject_request(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE requests
        SET status = 'rejected'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Reject request failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Request not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request rejected"
    })))
}

/// Get one adjustment request
#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}",
    params(
        ("request_id" = u64, Path, description = "ID of the request to fetch")
    ),
    responses(
        (status = 200, description = "Request found", body = AdjustmentRequest),
        (status = 404, description = "Request not found")
    ),
    tag = "Requests"
)]
pub async fn get_request(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();

    let request = sqlx::query_as::<_, AdjustmentRequest>(
        r#"SELECT * FROM requests WHERE id = ?"#,
    )
    .bind(request_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, request_id, "Failed to fetch request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match request {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Request not found"
        }))),
    }
}

/// List adjustment requests
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestFilter),
    responses(
        (status = 200, description = "Paginated request list", body = RequestListResponse)
    ),
    tag = "Requests"
)]
pub async fn list_requests(
    pool: web::Data<MySqlPool>,
    query: web::Query<RequestFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(kind) = query.kind {
        where_sql.push_str(" AND kind = ?");
        args.push(FilterValue::Kind(kind));
    }
    if let Some(status) = query.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Status(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Kind(k) => count_q.bind(*k),
            FilterValue::Status(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT * FROM requests
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AdjustmentRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Kind(k) => data_q.bind(k),
            FilterValue::Status(s) => data_q.bind(s),
        };
    }

    let requests = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch request list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let response = RequestListResponse {
        data: requests,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
