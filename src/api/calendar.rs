use actix_web::{HttpResponse, Responder, web};

use crate::{
    model::calendar::CalendarMonth,
    report::calendar_grid,
    state::{AppState, ViewQuery, ViewState},
};

/// Month calendar with the leaves active on each day
#[utoipa::path(
    get,
    path = "/api/calendar",
    params(ViewQuery),
    responses(
        (status = 200, description = "Calendar grid for the selected month", body = CalendarMonth),
        (status = 400, description = "Month outside 1-12 or malformed query", body = Object, example = json!({
            "message": "month must be between 1 and 12, got 13"
        }))
    ),
    tag = "Calendar"
)]
pub async fn month_calendar(
    state: web::Data<AppState>,
    view: ViewState,
) -> actix_web::Result<impl Responder> {
    let records = state.store.snapshot();

    match calendar_grid::build_month(view.year, view.month, &records, &view.employee) {
        Ok(grid) => {
            tracing::debug!(
                year = grid.year,
                month = grid.month,
                employee = %grid.employee,
                registrations = grid.registrations(),
                "Calendar built"
            );
            Ok(HttpResponse::Ok().json(grid))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": e.to_string()
        }))),
    }
}
