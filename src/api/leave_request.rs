use actix_web::{HttpResponse, Responder, http::header, web};
use chrono::NaiveDate;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::Config,
    model::leave_record::{LeaveDraft, LeaveDuration, LeaveRecord, StandardLeaveType},
    state::{AppState, ReloadError},
    utils::{
        leave_filter::EmployeeFilter,
        spreadsheet::{self, LoadError, XLSX_CONTENT_TYPE},
    },
};

#[derive(Deserialize, ToSchema)]
pub struct ApplyLeave {
    #[schema(example = "Alice Moreau")]
    pub employee_name: String,
    #[schema(example = "alice@company.com")]
    pub email: Option<String>,
    #[schema(example = "Sick Leave")]
    pub leave_type: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-02", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// defaults to full_day
    pub duration: Option<LeaveDuration>,
    #[schema(example = "Fever")]
    pub reason: Option<String>,
}

impl From<ApplyLeave> for LeaveDraft {
    fn from(form: ApplyLeave) -> Self {
        LeaveDraft {
            employee_name: form.employee_name,
            email: form.email,
            leave_type: form.leave_type,
            start_date: form.start_date,
            end_date: form.end_date,
            duration: form.duration.unwrap_or(LeaveDuration::FullDay),
            reason: form.reason,
        }
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    #[schema(example = "Alice Moreau")]
    /// Employee name, or "All"
    pub employee: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRecord>,
    #[schema(example = "All")]
    pub employee: String,
    #[schema(example = 1)]
    pub total: usize,
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = ApplyLeave,
        description = "Leave application form",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave application recorded",
         body = Object,
         example = json!({
            "message": "Leave application submitted",
            "application_id": "LA0012",
            "days": 2
         })
        ),
        (status = 400, description = "End date before start date or missing field", body = Object, example = json!({
            "message": "start_date 2026-01-10 cannot be after end_date 2026-01-05"
        })),
        (status = 429, description = "Too many requests")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    state: web::Data<AppState>,
    payload: web::Json<ApplyLeave>,
) -> actix_web::Result<impl Responder> {
    let draft = LeaveDraft::from(payload.into_inner());

    match state.store.append(draft) {
        Ok(record) => {
            tracing::info!(
                application_id = %record.application_id(),
                employee = %record.employee_name,
                "Leave application recorded"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Leave application submitted",
                "application_id": record.application_id(),
                "days": record.days()
            })))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Leave application rejected");
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })))
        }
    }
}

/// for getting a single leave record
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "Numeric part of the application id")
    ),
    responses(
        (status = 200, description = "Leave record found", body = LeaveRecord),
        (status = 404, description = "Leave record not found", body = Object, example = json!({
            "message": "Leave record not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    match state.store.get(leave_id) {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave record not found"
        }))),
    }
}

/// for listing leave records, optionally for one employee
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave records in store order", body = LeaveListResponse)
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    state: web::Data<AppState>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let filter = EmployeeFilter::from_selection(query.employee.as_deref());
    let records = state.store.snapshot();

    let data: Vec<LeaveRecord> = filter.apply(&records).into_iter().cloned().collect();
    let response = LeaveListResponse {
        total: data.len(),
        employee: filter.label().to_string(),
        data,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Leave types offered on the application form
#[utoipa::path(
    get,
    path = "/api/leave/types",
    responses(
        (status = 200, description = "Standard leave types", body = Object, example = json!({
            "data": ["Earned Leave", "Sick Leave", "Personal Leave", "Emergency Leave", "Joining Transfer Leave", "Casual Leave"]
        }))
    ),
    tag = "Leave"
)]
pub async fn leave_types() -> impl Responder {
    let types: Vec<String> = StandardLeaveType::iter().map(|t| t.to_string()).collect();
    HttpResponse::Ok().json(serde_json::json!({ "data": types }))
}

/* =========================
Spreadsheet upload / export
========================= */
#[utoipa::path(
    post,
    path = "/api/leave/upload",
    request_body(
        content = Vec<u8>,
        description = "xlsx workbook; first sheet, header row, metadata columns then Email, Name, Leave Date, Leave Type, Duration",
        content_type = "application/octet-stream"
    ),
    responses(
        (status = 200, description = "Store replaced with the workbook rows", body = Object, example = json!({
            "message": "Leave records loaded",
            "records": 42,
            "cached": false
        })),
        (status = 413, description = "Workbook larger than MAX_UPLOAD_BYTES"),
        (status = 422, description = "Workbook rejected, store unchanged", body = Object, example = json!({
            "message": "1 invalid row(s), first at row 3: duration \"2\" is neither 1 nor 0.5",
            "rows": ["row 3: duration \"2\" is neither 1 nor 0.5"]
        })),
        (status = 429, description = "Too many requests")
    ),
    tag = "Leave"
)]
pub async fn upload_leaves(
    state: web::Data<AppState>,
    config: web::Data<Config>,
    mut payload: web::Payload,
) -> actix_web::Result<impl Responder> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > config.max_upload_bytes {
            return Ok(HttpResponse::PayloadTooLarge().json(serde_json::json!({
                "message": format!("workbook exceeds {} bytes", config.max_upload_bytes)
            })));
        }
        body.extend_from_slice(&chunk);
    }

    let (records, loaded) = match state.reload(&body).await {
        Ok(reloaded) => reloaded,
        Err(e) => {
            tracing::error!(error = %e, bytes = body.len(), "Leave upload rejected");
            return Ok(rejected_upload(&e));
        }
    };

    tracing::info!(
        records,
        cached = loaded.cached,
        replaced_source = loaded.previous.is_some(),
        checksum = %format!("{:08x}", loaded.key.checksum),
        "Leave records loaded from upload"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave records loaded",
        "records": records,
        "cached": loaded.cached
    })))
}

/// 422 body for a workbook that did not make it into the store.
fn rejected_upload(e: &ReloadError) -> HttpResponse {
    let rows: Vec<String> = match e {
        ReloadError::Load(LoadError::Rows(rows)) => rows.iter().map(ToString::to_string).collect(),
        _ => Vec::new(),
    };
    HttpResponse::UnprocessableEntity().json(serde_json::json!({
        "message": e.to_string(),
        "rows": rows
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/export",
    params(LeaveFilter),
    responses(
        (status = 200, description = "xlsx workbook of the selected records", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn export_leaves(
    state: web::Data<AppState>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    let filter = EmployeeFilter::from_selection(query.employee.as_deref());
    let records = state.store.snapshot();
    let selected = filter.apply(&records);

    let bytes = spreadsheet::write_workbook(&selected).map_err(|e| {
        tracing::error!(error = %e, "Failed to export leave records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"leave-tracker.xlsx\"",
        ))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_record::ValidationError;
    use crate::utils::spreadsheet::{RowError, RowProblem};
    use actix_web::{body, http::StatusCode};
    use serde_json::Value;

    async fn json_body(resp: HttpResponse) -> Value {
        let bytes = body::to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn invalid_rows_answer_json() {
        let resp = rejected_upload(&ReloadError::Invalid(ValidationError::MissingField("leave_type")));
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json_body(resp).await;
        assert_eq!(body["message"], "leave_type is required");
        assert_eq!(body["rows"], Value::Array(vec![]));
    }

    #[actix_web::test]
    async fn row_errors_are_listed() {
        let err = ReloadError::Load(LoadError::Rows(vec![RowError {
            row: 3,
            problem: RowProblem::MissingValue("Name"),
        }]));
        let body = json_body(rejected_upload(&err)).await;
        assert_eq!(body["rows"][0], "row 3: missing Name");
    }
}
