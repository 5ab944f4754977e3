use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};

use crate::calc::calculator::{CashAdvanceDue, ObClaim, PayrollInput, RateProfile, calculate};
use crate::config::Config;
use crate::model::attendance::{AttendanceRecord, CutoffWindow};
use crate::model::cash_advance::CashAdvance;
use crate::model::employee::Employee;
use crate::model::payroll::{
    DraftStatus, LineLeave, LineOb, LineOt, PayrollDraft, PayrollDraftLine, TimePair,
};
use crate::model::payslip::Payslip;
use crate::model::request::{AdjustmentRequest, RequestKind};

#[derive(Deserialize, ToSchema)]
pub struct PublishDraft {
    /// Operator-confirmed cutoff window.
    pub cutoff: CutoffWindow,
    /// Overrides the configured number of executive approvals.
    pub required_exec_approvals: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct DraftDetailResponse {
    pub draft: PayrollDraft,
    pub lines: Vec<PayrollDraftLine>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct DraftQuery {
    pub status: Option<DraftStatus>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct DraftListResponse {
    pub data: Vec<PayrollDraft>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayslipQuery {
    pub draft_id: Option<u64>,
    pub employee_id: Option<u64>,
    #[schema(example = "unpublished")]
    pub status: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PayslipListResponse {
    pub data: Vec<Payslip>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Per-employee accumulator while building draft lines.
#[derive(Default)]
struct LineDraft {
    days: f64,
    hours: f64,
    tardiness: i64,
    pairs: Vec<TimePair>,
    ot: Vec<LineOt>,
    ob: Vec<LineOb>,
    leaves: Vec<LineLeave>,
}

/// Days of the request span falling inside the window, inclusive.
fn overlap_days(start: NaiveDate, end: NaiveDate, window: &CutoffWindow) -> i64 {
    let s = start.max(window.start);
    let e = end.min(window.end);
    ((e - s).num_days() + 1).max(0)
}

async fn fetch_draft(
    pool: &MySqlPool,
    draft_id: u64,
) -> Result<Option<PayrollDraft>, sqlx::Error> {
    sqlx::query_as::<_, PayrollDraft>(r#"SELECT * FROM payroll_drafts WHERE id = ?"#)
        .bind(draft_id)
        .fetch_optional(pool)
        .await
}

async fn load_names(
    pool: &MySqlPool,
    ids: &[u64],
) -> Result<HashMap<u64, String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT id, CONCAT(first_name, ' ', last_name)
        FROM employees
        WHERE id IN ({})
        "#,
        placeholders
    );
    let mut q = sqlx::query_as::<_, (u64, String)>(&sql);
    for id in ids {
        q = q.bind(*id);
    }
    Ok(q.fetch_all(pool).await?.into_iter().collect())
}

/* =========================
Publish a cutoff as a draft
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/payroll/drafts",
    request_body = PublishDraft,
    responses(
        (status = 201, description = "Draft published", body = Object, example = json!({
            "message": "Draft published",
            "draft_id": 7,
            "line_count": 12,
            "period_key": "20260711_20260725"
        })),
        (status = 409, description = "A non-rejected draft already exists for this cutoff")
    ),
    tag = "Payroll"
)]
pub async fn publish_draft(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<PublishDraft>,
) -> actix_web::Result<impl Responder> {
    let window = &payload.cutoff;
    let period_key = window.period_key();

    // Double-publish guard: one live draft per cutoff.
    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM payroll_drafts
        WHERE period_key = ? AND status != 'rejected'
        "#,
    )
    .bind(&period_key)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, %period_key, "Failed to check for existing drafts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if existing > 0 {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "A non-rejected draft already exists for this cutoff",
            "period_key": period_key
        })));
    }

    let attendance = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE date BETWEEN ? AND ?
        ORDER BY employee_id, date
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load attendance for draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let requests = sqlx::query_as::<_, AdjustmentRequest>(
        r#"
        SELECT * FROM requests
        WHERE status = 'approved'
          AND start_date <= ?
          AND end_date >= ?
        "#,
    )
    .bind(window.end)
    .bind(window.start)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load approved requests for draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut lines: BTreeMap<u64, LineDraft> = BTreeMap::new();

    for record in &attendance {
        let entry = lines.entry(record.employee_id).or_default();
        entry.days += record.days_worked;
        entry.hours += record.hours_worked;
        entry.tardiness += record.tardiness_minutes;
        entry.pairs.push(TimePair {
            date: record.date,
            time_in: record.time_in,
            time_out: record.time_out,
        });
    }

    for request in &requests {
        let entry = lines.entry(request.employee_id).or_default();
        match request.kind {
            // OT is only payable with proof attached.
            RequestKind::Ot => {
                if request.has_proof {
                    if let Some(hours) = request.hours {
                        entry.ot.push(LineOt {
                            request_id: request.id,
                            hours,
                        });
                    }
                }
            }
            RequestKind::Ob => entry.ob.push(LineOb {
                request_id: request.id,
                kind: request.ob_kind.clone().unwrap_or_default(),
                quantity: request.quantity.unwrap_or(Decimal::ONE),
            }),
            // WFH days are credited as worked days.
            RequestKind::Wfh => {
                entry.days +=
                    overlap_days(request.start_date, request.end_date, window) as f64;
            }
            RequestKind::Leave => entry.leaves.push(LineLeave {
                request_id: request.id,
                start_date: request.start_date,
                end_date: request.end_date,
            }),
        }
    }

    let ids: Vec<u64> = lines.keys().copied().collect();
    let names = load_names(pool.get_ref(), &ids).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load employee names for draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let required = payload
        .required_exec_approvals
        .unwrap_or(config.required_exec_approvals);
    let total_worked_days: f64 = lines.values().map(|l| l.days).sum();

    let head = sqlx::query(
        r#"
        INSERT INTO payroll_drafts
            (period_key, cutoff_label, cutoff_start, cutoff_end, status,
             total_worked_days, required_exec_approvals, exec_approvals)
        VALUES (?, ?, ?, ?, 'draft', ?, ?, 0)
        "#,
    )
    .bind(&period_key)
    .bind(&window.label)
    .bind(window.start)
    .bind(window.end)
    .bind(total_worked_days)
    .bind(required)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, %period_key, "Failed to create payroll draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let draft_id = head.last_insert_id();
    let line_count = lines.len();

    for (employee_id, line) in lines {
        let name = names.get(&employee_id).cloned().unwrap_or_default();
        sqlx::query(
            r#"
            INSERT INTO payroll_draft_lines
                (draft_id, employee_id, name, days_worked, hours_worked,
                 tardiness_minutes, time_in_out, ot, ob, leaves)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft_id)
        .bind(employee_id)
        .bind(&name)
        .bind(line.days)
        .bind(line.hours)
        .bind(line.tardiness)
        .bind(Json(line.pairs))
        .bind(Json(line.ot))
        .bind(Json(line.ob))
        .bind(Json(line.leaves))
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, draft_id, employee_id, "Failed to insert draft line");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    tracing::info!(draft_id, %period_key, line_count, "Payroll draft published");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Draft published",
        "draft_id": draft_id,
        "line_count": line_count,
        "period_key": period_key
    })))
}

/// Get a draft with its lines
#[utoipa::path(
    get,
    path = "/api/v1/payroll/drafts/{draft_id}",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, body = DraftDetailResponse),
        (status = 404)
    ),
    tag = "Payroll"
)]
pub async fn get_draft(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    let draft = fetch_draft(pool.get_ref(), draft_id).await.map_err(|e| {
        tracing::error!(error = %e, draft_id, "Failed to fetch draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(draft) = draft else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Draft not found"
        })));
    };

    let lines = sqlx::query_as::<_, PayrollDraftLine>(
        r#"SELECT * FROM payroll_draft_lines WHERE draft_id = ? ORDER BY name"#,
    )
    .bind(draft_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Failed to fetch draft lines");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(DraftDetailResponse { draft, lines }))
}

/// List drafts
#[utoipa::path(
    get,
    path = "/api/v1/payroll/drafts",
    params(DraftQuery),
    responses(
        (status = 200, body = DraftListResponse)
    ),
    tag = "Payroll"
)]
pub async fn list_drafts(
    pool: web::Data<MySqlPool>,
    query: web::Query<DraftQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM payroll_drafts{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(status) = query.status {
        count_q = count_q.bind(status);
    }
    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count drafts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT * FROM payroll_drafts
        {}
        ORDER BY cutoff_start DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, PayrollDraft>(&data_sql);
    if let Some(status) = query.status {
        data_q = data_q.bind(status);
    }

    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch draft list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(DraftListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Fetch a draft and 400 unless it can move to `next`.
async fn guard_transition(
    pool: &MySqlPool,
    draft_id: u64,
    next: DraftStatus,
) -> Result<Result<PayrollDraft, HttpResponse>, actix_web::Error> {
    let draft = fetch_draft(pool, draft_id).await.map_err(|e| {
        tracing::error!(error = %e, draft_id, "Failed to fetch draft");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(draft) = draft else {
        return Ok(Err(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Draft not found"
        }))));
    };

    if !draft.status.can_transition(next) {
        return Ok(Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("Cannot move a {} draft to {}", draft.status, next)
        }))));
    }

    Ok(Ok(draft))
}

/* =========================
Submit draft for approval
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/payroll/drafts/{draft_id}/submit",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Draft submitted"),
        (status = 400, description = "Illegal transition"),
        (status = 404)
    ),
    tag = "Payroll"
)]
pub async fn submit_draft(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    match guard_transition(pool.get_ref(), draft_id, DraftStatus::PendingExec).await? {
        Err(resp) => return Ok(resp),
        Ok(_) => {}
    }

    let result = sqlx::query(
        r#"UPDATE payroll_drafts SET status = 'pending_exec' WHERE id = ? AND status = 'draft'"#,
    )
    .bind(draft_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Submit draft failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Draft not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Draft submitted for executive approval"
    })))
}

/* =========================
Executive approval
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/payroll/drafts/{draft_id}/approve-exec",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Approval recorded"),
        (status = 400, description = "Illegal transition"),
        (status = 404)
    ),
    tag = "Payroll"
)]
pub async fn approve_exec(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    match guard_transition(pool.get_ref(), draft_id, DraftStatus::PendingAdmin).await? {
        Err(resp) => return Ok(resp),
        Ok(_) => {}
    }

    let result = sqlx::query(
        r#"
        UPDATE payroll_drafts
        SET exec_approvals = exec_approvals + 1
        WHERE id = ? AND status = 'pending_exec'
        "#,
    )
    .bind(draft_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Exec approval failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Draft not found or already processed"
        })));
    }

    // Enough approvals moves the draft along.
    sqlx::query(
        r#"
        UPDATE payroll_drafts
        SET status = 'pending_admin'
        WHERE id = ?
          AND status = 'pending_exec'
          AND exec_approvals >= required_exec_approvals
        "#,
    )
    .bind(draft_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Exec approval promotion failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let draft = fetch_draft(pool.get_ref(), draft_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, draft_id, "Failed to re-fetch draft");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Internal Server Error"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Approval recorded",
        "status": draft.status,
        "exec_approvals": draft.exec_approvals,
        "required_exec_approvals": draft.required_exec_approvals
    })))
}

/* =========================
Admin approval: payslips are generated here
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/payroll/drafts/{draft_id}/approve-admin",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Draft approved, payslips generated"),
        (status = 400, description = "Illegal transition"),
        (status = 404)
    ),
    tag = "Payroll"
)]
pub async fn approve_admin(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    let draft = match guard_transition(pool.get_ref(), draft_id, DraftStatus::Approved).await? {
        Err(resp) => return Ok(resp),
        Ok(draft) => draft,
    };

    let result = sqlx::query(
        r#"UPDATE payroll_drafts SET status = 'approved' WHERE id = ? AND status = 'pending_admin'"#,
    )
    .bind(draft_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Admin approval failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Draft not found or already processed"
        })));
    }

    let lines = sqlx::query_as::<_, PayrollDraftLine>(
        r#"SELECT * FROM payroll_draft_lines WHERE draft_id = ?"#,
    )
    .bind(draft_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Failed to fetch draft lines");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let statutory = config.statutory();
    let mut created = 0usize;

    for line in &lines {
        let employee = sqlx::query_as::<_, Employee>(r#"SELECT * FROM employees WHERE id = ?"#)
            .bind(line.employee_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id = line.employee_id, "Failed to fetch employee");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

        let Some(employee) = employee else {
            tracing::warn!(
                employee_id = line.employee_id,
                draft_id,
                "Draft line references a missing employee, skipping payslip"
            );
            continue;
        };

        let advance = sqlx::query_as::<_, CashAdvance>(
            r#"
            SELECT * FROM cash_advances
            WHERE employee_id = ? AND status = 'open' AND balance > 0
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(line.employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = line.employee_id, "Failed to fetch cash advance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        let input = PayrollInput {
            rates: RateProfile::from_employee(&employee),
            worked_days: Decimal::from_f64_retain(line.days_worked).unwrap_or_default(),
            ot_hours: line.ot.0.iter().map(|o| o.hours).sum(),
            ob_claims: line
                .ob
                .0
                .iter()
                .map(|o| ObClaim {
                    kind: o.kind.clone(),
                    quantity: o.quantity,
                })
                .collect(),
            rdot_hours: Decimal::ZERO,
            regular_holiday_days: Decimal::ZERO,
            special_holiday_days: Decimal::ZERO,
            night_diff_hours: Decimal::ZERO,
            month_day_divisor: config.month_day_divisor,
            statutory,
            cash_advance: advance.as_ref().map(|a| CashAdvanceDue {
                per_cutoff: a.per_cutoff,
                balance: a.balance,
            }),
        };

        let breakdown = calculate(&input);

        sqlx::query(
            r#"
            INSERT INTO payslips
                (draft_id, employee_id, cutoff_label, earnings, deductions,
                 total_earnings, total_deductions, net_pay, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'unpublished')
            "#,
        )
        .bind(draft_id)
        .bind(line.employee_id)
        .bind(&draft.cutoff_label)
        .bind(Json(breakdown.earnings.clone()))
        .bind(Json(breakdown.deductions.clone()))
        .bind(breakdown.gross_earnings)
        .bind(breakdown.total_deductions)
        .bind(breakdown.net_pay)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = line.employee_id, "Failed to insert payslip");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

        // Settle the applied installment.
        if let Some(advance) = advance {
            let due = advance.due_now();
            if due > Decimal::ZERO {
                let new_balance = advance.balance - due;
                let new_status = if new_balance <= Decimal::ZERO {
                    "settled"
                } else {
                    "open"
                };
                sqlx::query(
                    r#"UPDATE cash_advances SET balance = ?, status = ? WHERE id = ?"#,
                )
                .bind(new_balance)
                .bind(new_status)
                .bind(advance.id)
                .execute(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, advance_id = advance.id, "Failed to settle cash advance");
                    actix_web::error::ErrorInternalServerError("Internal Server Error")
                })?;
            }
        }

        created += 1;
    }

    tracing::info!(draft_id, payslips = created, "Draft approved");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Draft approved",
        "payslips_created": created
    })))
}

/* =========================
Reject draft
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/payroll/drafts/{draft_id}/reject",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Draft rejected"),
        (status = 400, description = "Illegal transition"),
        (status = 404)
    ),
    tag = "Payroll"
)]
pub async fn reject_draft(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    match guard_transition(pool.get_ref(), draft_id, DraftStatus::Rejected).await? {
        Err(resp) => return Ok(resp),
        Ok(_) => {}
    }

    let result = sqlx::query(
        r#"
        UPDATE payroll_drafts
        SET status = 'rejected'
        WHERE id = ? AND status IN ('pending_exec', 'pending_admin')
        "#,
    )
    .bind(draft_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Reject draft failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Draft not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Draft rejected"
    })))
}

/// List payslips
#[utoipa::path(
    get,
    path = "/api/v1/payslips",
    params(PayslipQuery),
    responses(
        (status = 200, body = PayslipListResponse)
    ),
    tag = "Payroll"
)]
pub async fn list_payslips(
    pool: web::Data<MySqlPool>,
    query: web::Query<PayslipQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.draft_id.is_some() {
        where_sql.push_str(" AND draft_id = ?");
    }
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if query.status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM payslips{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = query.draft_id {
        count_q = count_q.bind(id);
    }
    if let Some(id) = query.employee_id {
        count_q = count_q.bind(id);
    }
    if let Some(status) = query.status.as_deref() {
        count_q = count_q.bind(status);
    }
    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payslips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT * FROM payslips
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, Payslip>(&data_sql);
    if let Some(id) = query.draft_id {
        data_q = data_q.bind(id);
    }
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
            tracing::error!(error = %e, "Failed to fetch payslip list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PayslipListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Publish one payslip
#[utoipa::path(
    put,
    path = "/api/v1/payslips/{payslip_id}/publish",
    params(
        ("payslip_id", description = "Payslip ID")
    ),
    responses(
        (status = 200, description = "Payslip published"),
        (status = 400, description = "Payslip not found or already published")
    ),
    tag = "Payroll"
)]
pub async fn publish_payslip(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let payslip_id = path.into_inner();

    let result = sqlx::query(
        r#"UPDATE payslips SET status = 'published' WHERE id = ? AND status = 'unpublished'"#,
    )
    .bind(payslip_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payslip_id, "Publish payslip failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Payslip not found or already published"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payslip published"
    })))
}

/// Publish every unpublished payslip of a draft, one at a time. Failures on
/// individual slips are reported, not retried.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/drafts/{draft_id}/publish-payslips",
    params(
        ("draft_id", description = "Draft ID")
    ),
    responses(
        (status = 200, description = "Publish summary", body = Object, example = json!({
            "published": 11,
            "failed": []
        }))
    ),
    tag = "Payroll"
)]
pub async fn publish_all_payslips(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let draft_id = path.into_inner();

    let ids = sqlx::query_scalar::<_, u64>(
        r#"SELECT id FROM payslips WHERE draft_id = ? AND status = 'unpublished' ORDER BY id"#,
    )
    .bind(draft_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, draft_id, "Failed to list unpublished payslips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut published = 0usize;
    let mut failed: Vec<u64> = Vec::new();

    for payslip_id in ids {
        let result = sqlx::query(
            r#"UPDATE payslips SET status = 'published' WHERE id = ? AND status = 'unpublished'"#,
        )
        .bind(payslip_id)
        .execute(pool.get_ref())
        .await;

        match result {
            Ok(r) if r.rows_affected() > 0 => published += 1,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, payslip_id, "Publish payslip failed");
                failed.push(payslip_id);
            }
        }
    }

    tracing::info!(draft_id, published, failed = failed.len(), "Payslips published");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "published": published,
        "failed": failed
    })))
}
