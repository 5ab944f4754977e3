use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};

use crate::model::category::EmployeeCategory;
use crate::model::employee::{Employee, FreelanceItem, ObRate};
use crate::utils::{alias_cache, alias_filter};

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "Maria")]
    pub first_name: String,
    #[schema(example = "Santos")]
    pub last_name: String,
    #[schema(example = "maria.santos@company.com", format = "email")]
    pub email: String,
    #[schema(example = "M.Santos", nullable = true)]
    pub clock_alias: Option<String>,
    pub category: EmployeeCategory,
    #[schema(value_type = f64, nullable = true)]
    pub monthly_salary: Option<Decimal>,
    #[schema(value_type = f64, nullable = true)]
    pub per_day_rate: Option<Decimal>,
    #[schema(value_type = f64, nullable = true)]
    pub allowance_per_day: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Vec<ObRate>)]
    pub ob_rates: Vec<ObRate>,
    #[serde(default)]
    #[schema(value_type = Vec<FreelanceItem>)]
    pub freelance_items: Vec<FreelanceItem>,
    #[serde(default)]
    pub sss: bool,
    #[serde(default)]
    pub philhealth: bool,
    #[serde(default)]
    pub pagibig: bool,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub shift_end_override: Option<NaiveTime>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub employee_code: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub clock_alias: Option<String>,
    pub category: Option<EmployeeCategory>,
    #[schema(value_type = f64, nullable = true)]
    pub monthly_salary: Option<Decimal>,
    #[schema(value_type = f64, nullable = true)]
    pub per_day_rate: Option<Decimal>,
    #[schema(value_type = f64, nullable = true)]
    pub allowance_per_day: Option<Decimal>,
    #[schema(value_type = Vec<ObRate>, nullable = true)]
    pub ob_rates: Option<Vec<ObRate>>,
    #[schema(value_type = Vec<FreelanceItem>, nullable = true)]
    pub freelance_items: Option<Vec<FreelanceItem>>,
    pub sss: Option<bool>,
    pub philhealth: Option<bool>,
    pub pagibig: Option<bool>,
    #[schema(value_type = String, format = "time", nullable = true)]
    pub shift_end_override: Option<NaiveTime>,
    pub status: Option<String>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
    pub category: Option<EmployeeCategory>,
    #[schema(example = "active")]
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
    Category(EmployeeCategory),
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created",
            "id": 42
        })),
        (status = 409, description = "Duplicate employee code"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees
            (employee_code, first_name, last_name, email, clock_alias, category,
             monthly_salary, per_day_rate, allowance_per_day, ob_rates,
             freelance_items, sss, philhealth, pagibig, shift_end_override,
             hire_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active')
        "#,
    )
    .bind(&payload.employee_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(&payload.clock_alias)
    .bind(payload.category)
    .bind(payload.monthly_salary)
    .bind(payload.per_day_rate)
    .bind(payload.allowance_per_day)
    .bind(Json(payload.ob_rates.clone()))
    .bind(Json(payload.freelance_items.clone()))
    .bind(payload.sss)
    .bind(payload.philhealth)
    .bind(payload.pagibig)
    .bind(payload.shift_end_override)
    .bind(payload.hire_date)
    .execute(pool.get_ref())
    .await;

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(serde_json::json!({
                        "message": "Employee code or email already exists"
                    })));
                }
            }
            tracing::error!(error = %e, "Failed to create employee");
            return Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ));
        }
    };

    let id = result.last_insert_id();

    // Keep the clock-name filter and cache in step with the directory.
    let clock_name = payload
        .clock_alias
        .clone()
        .unwrap_or_else(|| format!("{} {}", payload.first_name, payload.last_name));
    alias_filter::insert(&clock_name);
    alias_cache::remember(&clock_name, id).await;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Employee created",
        "id": id
    })))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    request_body = UpdateEmployee,
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee updated"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let current = sqlx::query_as::<_, Employee>(r#"SELECT * FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let current = match current {
        Some(c) => c,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Employee not found"
            })));
        }
    };

    let old_clock_name = current.clock_name();

    let body = body.into_inner();
    let employee_code = body.employee_code.unwrap_or(current.employee_code);
    let first_name = body.first_name.unwrap_or(current.first_name);
    let last_name = body.last_name.unwrap_or(current.last_name);
    let email = body.email.unwrap_or(current.email);
    let clock_alias = body.clock_alias.or(current.clock_alias);
    let category = body.category.unwrap_or(current.category);
    let monthly_salary = body.monthly_salary.or(current.monthly_salary);
    let per_day_rate = body.per_day_rate.or(current.per_day_rate);
    let allowance_per_day = body.allowance_per_day.or(current.allowance_per_day);
    let ob_rates = body.ob_rates.map(Json).unwrap_or(current.ob_rates);
    let freelance_items = body
        .freelance_items
        .map(Json)
        .unwrap_or(current.freelance_items);
    let sss = body.sss.unwrap_or(current.sss);
    let philhealth = body.philhealth.unwrap_or(current.philhealth);
    let pagibig = body.pagibig.unwrap_or(current.pagibig);
    let shift_end_override = body.shift_end_override.or(current.shift_end_override);
    let status = body.status.unwrap_or(current.status);
    let hire_date = body.hire_date.unwrap_or(current.hire_date);

    sqlx::query(
        r#"
        UPDATE employees
        SET employee_code = ?, first_name = ?, last_name = ?, email = ?,
            clock_alias = ?, category = ?, monthly_salary = ?, per_day_rate = ?,
            allowance_per_day = ?, ob_rates = ?, freelance_items = ?, sss = ?,
            philhealth = ?, pagibig = ?, shift_end_override = ?, status = ?,
            hire_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&employee_code)
    .bind(&first_name)
    .bind(&last_name)
    .bind(&email)
    .bind(&clock_alias)
    .bind(category)
    .bind(monthly_salary)
    .bind(per_day_rate)
    .bind(allowance_per_day)
    .bind(&ob_rates)
    .bind(&freelance_items)
    .bind(sss)
    .bind(philhealth)
    .bind(pagibig)
    .bind(shift_end_override)
    .bind(&status)
    .bind(hire_date)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to update employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let new_clock_name = clock_alias.unwrap_or_else(|| format!("{} {}", first_name, last_name));
    if new_clock_name != old_clock_name {
        alias_filter::remove(&old_clock_name);
        alias_cache::forget(&old_clock_name).await;
        alias_filter::insert(&new_clock_name);
        alias_cache::remember(&new_clock_name, employee_id).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Employee updated"
    })))
}

/// Get one employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, body = Employee),
        (status = 404)
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(r#"SELECT * FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match employee {
        Some(e) => Ok(HttpResponse::Ok().json(e)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        }))),
    }
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(category) = query.category {
        where_sql.push_str(" AND category = ?");
        args.push(FilterValue::Category(category));
    }
    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    let count_sql = format!("SELECT COUNT(*) FROM employees{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::Str(s) => count_q.bind(*s),
            FilterValue::Category(c) => count_q.bind(*c),
        };
    }
    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT * FROM employees
        {}
        ORDER BY last_name, first_name
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, Employee>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Category(c) => data_q.bind(c),
        };
    }

    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch employee list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let current = sqlx::query_as::<_, Employee>(r#"SELECT * FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(current) = current else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    };

    sqlx::query(r#"DELETE FROM employees WHERE id = ?"#)
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to delete employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let clock_name = current.clock_name();
    alias_filter::remove(&clock_name);
    alias_cache::forget(&clock_name).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Employee deleted"
    })))
}
