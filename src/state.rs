use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorBadRequest, web};
use chrono::{Datelike, Local, NaiveDate};
use derive_more::Display;
use futures::future::{Ready, ready};
use futures::lock::Mutex;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::model::leave_record::ValidationError;
use crate::store::LeaveStore;
use crate::utils::leave_filter::EmployeeFilter;
use crate::utils::source_cache::{LoadedSource, SourceCache};
use crate::utils::spreadsheet::{LoadError, SheetLayout};

/// Shared application state, registered once as `web::Data`.
pub struct AppState {
    pub store: LeaveStore,
    pub sources: SourceCache,
    pub layout: SheetLayout,
    /// held across cache load and store swap
    reloading: Mutex<()>,
}

#[derive(Debug, Display)]
pub enum ReloadError {
    #[display(fmt = "{}", _0)]
    Load(LoadError),
    #[display(fmt = "{}", _0)]
    Invalid(ValidationError),
}

impl std::error::Error for ReloadError {}

impl AppState {
    pub fn new(store: LeaveStore, sources: SourceCache, layout: SheetLayout) -> Self {
        Self {
            store,
            sources,
            layout,
            reloading: Mutex::new(()),
        }
    }

    /// Replace the store with a workbook's rows.
    ///
    /// Reloads run one at a time, so the cache's active source always
    /// matches what the store holds.
    pub async fn reload(&self, bytes: &[u8]) -> Result<(usize, LoadedSource), ReloadError> {
        let _guard = self.reloading.lock().await;

        let loaded = self
            .sources
            .load(bytes, self.layout)
            .await
            .map_err(ReloadError::Load)?;
        let records = self
            .store
            .replace_all(loaded.drafts.as_ref().clone())
            .map_err(ReloadError::Invalid)?;

        Ok((records, loaded))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewQuery {
    /// Calendar year, defaults to the current year
    pub year: Option<i32>,
    /// Month 1-12, defaults to the current month
    pub month: Option<u32>,
    /// Employee name, or "All" (default)
    pub employee: Option<String>,
}

/// What the dashboard is looking at: one month, one employee selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub year: i32,
    pub month: u32,
    pub employee: EmployeeFilter,
}

impl ViewState {
    /// Current month of `today`, all employees.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            employee: EmployeeFilter::All,
        }
    }

    /// Overlay explicit selections onto the initial state.
    pub fn resolve(query: ViewQuery, today: NaiveDate) -> Self {
        let initial = Self::initial(today);
        Self {
            year: query.year.unwrap_or(initial.year),
            month: query.month.unwrap_or(initial.month),
            employee: EmployeeFilter::from_selection(query.employee.as_deref()),
        }
    }
}

impl FromRequest for ViewState {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let query = match web::Query::<ViewQuery>::from_query(req.query_string()) {
            Ok(q) => q.into_inner(),
            Err(e) => return ready(Err(ErrorBadRequest(e.to_string()))),
        };

        ready(Ok(ViewState::resolve(query, Local::now().date_naive())))
    }
}
