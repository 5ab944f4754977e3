use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::cash_advance::CashAdvance;

#[derive(Deserialize, ToSchema)]
pub struct CreateCashAdvance {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(value_type = f64, example = 5000.0)]
    pub principal: Decimal,
    #[schema(value_type = f64, example = 500.0)]
    pub per_cutoff: Decimal,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CashAdvanceQuery {
    pub employee_id: Option<u64>,
    #[schema(example = "open")]
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct CashAdvanceListResponse {
    pub data: Vec<CashAdvance>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Create a cash advance. The balance starts at the principal and each
/// payroll run deducts at most the per-cutoff installment.
#[utoipa::path(
    post,
    path = "/api/v1/cash-advances",
    request_body = CreateCashAdvance,
    responses(
        (status = 201, description = "Cash advance created"),
        (status = 400, description = "Bad request")
    ),
    tag = "CashAdvance"
)]
pub async fn create_cash_advance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCashAdvance>,
) -> actix_web::Result<impl Responder> {
    if payload.principal <= Decimal::ZERO || payload.per_cutoff <= Decimal::ZERO {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "principal and per_cutoff must be positive"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO cash_advances
            (employee_id, principal, per_cutoff, balance, status)
        VALUES (?, ?, ?, ?, 'open')
        "#,
    )
    .bind(payload.employee_id)
    .bind(payload.principal)
    .bind(payload.per_cutoff)
    .bind(payload.principal)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id = payload.employee_id, "Failed to create cash advance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Cash advance created"
    })))
}

/// List cash advances
#[utoipa::path(
    get,
    path = "/api/v1/cash-advances",
    params(CashAdvanceQuery),
    responses(
        (status = 200, body = CashAdvanceListResponse)
    ),
    tag = "CashAdvance"
)]
pub async fn list_cash_advances(
    pool: web::Data<MySqlPool>,
    query: web::Query<CashAdvanceQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if query.status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM cash_advances{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = query.employee_id {
        count_q = count_q.bind(id);
    }
    if let Some(status) = query.status.as_deref() {
        count_q = count_q.bind(status);
    }
    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count cash advances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT * FROM cash_advances
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, CashAdvance>(&data_sql);
    if let Some(id) = query.employee_id {
        data_q = data_q.bind(id);
    }
    if let Some(status) = query.status.as_deref() {
        data_q = data_q.bind(status);
    }

    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch cash advance list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(CashAdvanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
