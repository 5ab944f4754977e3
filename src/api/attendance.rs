use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::{AttendanceRecord, CutoffWindow};
use crate::model::category::EmployeeCategory;
use crate::reconcile::parser::{self, ParseOutcome, SkippedRow};
use crate::reconcile::shift::{DayPlan, ShiftPolicy, derive_day};
use crate::reconcile::{ReconcilePolicy, cutoff, normalize_name, reconcile};
use crate::utils::alias_cache;

#[derive(Deserialize, ToSchema)]
pub struct ImportPayload {
    /// Raw time-clock export, comma- or tab-delimited with a header row.
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    pub batch_id: String,
    #[schema(example = 184)]
    pub punches_found: usize,
    pub skipped: Vec<SkippedRow>,
    pub cutoff_options: Vec<CutoffWindow>,
    /// Most recent window containing data. A default for the operator to
    /// confirm, not a guarantee.
    pub suggested_cutoff: Option<CutoffWindow>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProcessPayload {
    pub content: String,
    /// Operator-confirmed cutoff window.
    pub cutoff: CutoffWindow,
}

#[derive(Serialize, ToSchema)]
pub struct ProcessResponse {
    pub batch_id: String,
    pub records: Vec<AttendanceRecord>,
    pub skipped: Vec<SkippedRow>,
    /// Exported names that resolve to no employee.
    pub unmatched: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct OverrideAttendance {
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_in: Option<NaiveTime>,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub time_out: Option<NaiveTime>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    pub employee_id: Option<u64>,
    #[schema(value_type = String, format = "date", nullable = true)]
    pub from: Option<NaiveDate>,
    #[schema(value_type = String, format = "date", nullable = true)]
    pub to: Option<NaiveDate>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

fn parse_upload(content: &str) -> Result<ParseOutcome, actix_web::Error> {
    parser::parse(content).map_err(|e| actix_web::error::ErrorBadRequest(e.to_string()))
}

/// Parse an export and suggest cutoff windows. Nothing is persisted; the
/// operator confirms a window and calls the process endpoint.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/import",
    request_body = ImportPayload,
    responses(
        (status = 200, description = "Parse summary with cutoff suggestions", body = ImportResponse),
        (status = 400, description = "Unusable file (no header, empty)")
    ),
    tag = "Attendance"
)]
pub async fn import_attendance(
    payload: web::Json<ImportPayload>,
) -> actix_web::Result<impl Responder> {
    let outcome = parse_upload(&payload.content)?;

    let cutoff_options = cutoff::build_cutoff_options(&outcome.punches);
    let suggested_cutoff =
        cutoff::suggest_default(&cutoff_options, &outcome.punches).cloned();

    tracing::info!(
        punches = outcome.punches.len(),
        skipped = outcome.skipped.len(),
        "Attendance import parsed"
    );

    Ok(HttpResponse::Ok().json(ImportResponse {
        batch_id: uuid::Uuid::new_v4().to_string(),
        punches_found: outcome.punches.len(),
        skipped: outcome.skipped,
        cutoff_options,
        suggested_cutoff,
    }))
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    first_name: String,
    last_name: String,
    clock_alias: Option<String>,
    category: EmployeeCategory,
    shift_end_override: Option<NaiveTime>,
}

impl PlanRow {
    fn clock_name(&self) -> String {
        self.clock_alias
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.first_name, self.last_name))
    }

    fn plan(&self, shift: &ShiftPolicy) -> DayPlan {
        let mut plan = match self.category {
            EmployeeCategory::Intern => DayPlan::intern(shift),
            _ => DayPlan::nominal(shift),
        };
        if let Some(end) = self.shift_end_override {
            plan.shift_end = end;
        }
        plan
    }
}

async fn load_plan_rows(
    pool: &MySqlPool,
    ids: &BTreeSet<u64>,
) -> Result<Vec<PlanRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        r#"
        SELECT first_name, last_name, clock_alias, category, shift_end_override
        FROM employees
        WHERE id IN ({})
        "#,
        placeholders
    );
    let mut q = sqlx::query_as::<_, PlanRow>(&sql);
    for id in ids {
        q = q.bind(*id);
    }
    q.fetch_all(pool).await
}

/// Reconcile an export against the confirmed cutoff and persist the
/// attendance lines. Re-processing the same window upserts.
#[utoipa::path(
    post,
    path = "/api/v1/attendance/process",
    request_body = ProcessPayload,
    responses(
        (status = 200, description = "Reconciled attendance for the window", body = ProcessResponse),
        (status = 400, description = "Unusable file")
    ),
    tag = "Attendance"
)]
pub async fn process_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<ProcessPayload>,
) -> actix_web::Result<impl Responder> {
    let outcome = parse_upload(&payload.content)?;
    let window = &payload.cutoff;

    // Resolve every distinct exported name once: filter screens names that
    // belong to no employee, the cache carries repeats across uploads.
    let mut resolved: HashMap<String, u64> = HashMap::new();
    let mut unmatched: BTreeSet<String> = BTreeSet::new();
    for punch in &outcome.punches {
        let key = normalize_name(&punch.name);
        if resolved.contains_key(&key) || unmatched.contains(punch.name.as_str()) {
            continue;
        }
        match alias_cache::resolve_employee(pool.get_ref(), &punch.name).await {
            Ok(Some(id)) => {
                resolved.insert(key, id);
            }
            Ok(None) => {
                unmatched.insert(punch.name.clone());
            }
            Err(e) => {
                tracing::error!(error = %e, name = %punch.name, "Alias resolution failed");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Internal Server Error",
                ));
            }
        }
    }

    let ids: BTreeSet<u64> = resolved.values().copied().collect();
    let plan_rows = load_plan_rows(pool.get_ref(), &ids).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to load employee shift plans");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let shift = ShiftPolicy::default();
    let mut policy = ReconcilePolicy::new(shift);
    for row in &plan_rows {
        let plan = row.plan(&policy.shift);
        policy.plans.insert(normalize_name(&row.clock_name()), plan);
    }

    let records = reconcile(&outcome.punches, window, &policy);

    for record in &records {
        let Some(employee_id) = resolved.get(&normalize_name(&record.name)).copied() else {
            continue; // unmatched name, already reported
        };
        sqlx::query(
            r#"
            INSERT INTO attendance
                (employee_id, date, time_in, time_out, hours_worked,
                 days_worked, tardiness_minutes, cutoff_start, cutoff_end)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                time_in = VALUES(time_in),
                time_out = VALUES(time_out),
                hours_worked = VALUES(hours_worked),
                days_worked = VALUES(days_worked),
                tardiness_minutes = VALUES(tardiness_minutes),
                cutoff_start = VALUES(cutoff_start),
                cutoff_end = VALUES(cutoff_end)
            "#,
        )
        .bind(employee_id)
        .bind(record.date)
        .bind(record.time_in)
        .bind(record.time_out)
        .bind(record.hours_worked)
        .bind(record.days_worked)
        .bind(record.tardiness_minutes)
        .bind(window.start)
        .bind(window.end)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, date = %record.date, "Failed to save attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    let saved = sqlx::query_as::<_, AttendanceRecord>(
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
        tracing::error!(error = %e, "Failed to fetch reconciled attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        records = saved.len(),
        unmatched = unmatched.len(),
        cutoff = %window.label,
        "Attendance processed"
    );

    Ok(HttpResponse::Ok().json(ProcessResponse {
        batch_id: uuid::Uuid::new_v4().to_string(),
        records: saved,
        skipped: outcome.skipped,
        unmatched: unmatched.into_iter().collect(),
    }))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, body = AttendanceListResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    if query.employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if query.from.is_some() {
        where_sql.push_str(" AND date >= ?");
    }
    if query.to.is_some() {
        where_sql.push_str(" AND date <= ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = query.employee_id {
        count_q = count_q.bind(id);
    }
    if let Some(from) = query.from {
        count_q = count_q.bind(from);
    }
    if let Some(to) = query.to {
        count_q = count_q.bind(to);
    }
    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT * FROM attendance
        {}
        ORDER BY date DESC, employee_id
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    if let Some(id) = query.employee_id {
        data_q = data_q.bind(id);
    }
    if let Some(from) = query.from {
        data_q = data_q.bind(from);
    }
    if let Some(to) = query.to {
        data_q = data_q.bind(to);
    }

    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Override a record's in/out before publishing. Hours, days and tardiness
/// are re-derived with the same rules as the batch reconcile.
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{record_id}",
    request_body = OverrideAttendance,
    params(
        ("record_id", description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record updated", body = AttendanceRecord),
        (status = 404, description = "Record not found")
    ),
    tag = "Attendance"
)]
pub async fn override_attendance(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<OverrideAttendance>,
) -> actix_web::Result<impl Responder> {
    let record_id = path.into_inner();

    let current = sqlx::query_as::<_, AttendanceRecord>(
        r#"SELECT * FROM attendance WHERE id = ?"#,
    )
    .bind(record_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, record_id, "Failed to fetch attendance record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(current) = current else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Attendance record not found"
        })));
    };

    let ids = BTreeSet::from([current.employee_id]);
    let plan_rows = load_plan_rows(pool.get_ref(), &ids).await.map_err(|e| {
        tracing::error!(error = %e, record_id, "Failed to load employee shift plan");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let shift = ShiftPolicy::default();
    let (name, plan) = match plan_rows.first() {
        Some(row) => (row.clock_name(), row.plan(&shift)),
        None => (String::new(), DayPlan::nominal(&shift)),
    };

    let time_in = body.time_in.or(current.time_in);
    let time_out = body.time_out.or(current.time_out);
    let derived = derive_day(&name, current.date, time_in, time_out, &plan, &shift);

    sqlx::query(
        r#"
        UPDATE attendance
        SET time_in = ?, time_out = ?, hours_worked = ?, days_worked = ?,
            tardiness_minutes = ?
        WHERE id = ?
        "#,
    )
    .bind(derived.time_in)
    .bind(derived.time_out)
    .bind(derived.hours_worked)
    .bind(derived.days_worked)
    .bind(derived.tardiness_minutes)
    .bind(record_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, record_id, "Failed to update attendance record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(AttendanceRecord {
        time_in: derived.time_in,
        time_out: derived.time_out,
        hours_worked: derived.hours_worked,
        days_worked: derived.days_worked,
        tardiness_minutes: derived.tardiness_minutes,
        ..current
    }))
}
