use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Local};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    model::employee_stats::EmployeeStats,
    report::aggregator,
    state::AppState,
    utils::leave_filter::ALL_EMPLOYEES,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Year to summarize, defaults to the current year
    pub year: Option<i32>,
}

/// Employee selection list, "All" first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Sorted employee names", body = Object, example = json!({
            "data": ["All", "Alice Moreau", "Bruno Keller"]
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(state: web::Data<AppState>) -> impl Responder {
    let mut names = vec![ALL_EMPLOYEES.to_string()];
    names.extend(state.store.employee_names());

    HttpResponse::Ok().json(serde_json::json!({ "data": names }))
}

/// Yearly leave statistics for one employee
#[utoipa::path(
    get,
    path = "/api/employees/{name}/stats",
    params(
        ("name" = String, Path, description = "Employee name, exact match"),
        StatsQuery
    ),
    responses(
        (status = 200, description = "Statistics; all zeros when no leave that year", body = EmployeeStats),
        (status = 404, description = "No record for this employee at all", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn employee_stats(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<StatsQuery>,
) -> actix_web::Result<impl Responder> {
    let employee = path.into_inner();
    let year = query.year.unwrap_or_else(|| Local::now().year());

    if !state.store.has_employee(&employee) {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Employee not found"
        })));
    }

    let records = state.store.snapshot();
    let stats = aggregator::employee_stats(&records, &employee, year);
    if stats.is_empty() {
        tracing::debug!(employee = %employee, year, "No leave recorded for year");
    }

    Ok(HttpResponse::Ok().json(stats))
}
