//! REST API definitions.

pub mod employee;

use axum::{
    routing::{get, post},
    Router,
};

use crate::define_error;

pub use self::employee::Employee;

/// Creates a new [`Router`] serving the REST API.
///
/// Handlers expect the [`Service`] to be provided as an [`Extension`] layer.
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/employees",
            get(employee::list).post(employee::create),
        )
        .route("/api/employees/count", get(employee::count))
        .route("/api/employees/search", get(employee::search))
        .route(
            "/api/employees/employment-type/:type",
            get(employee::list_by_employment_type),
        )
        .route(
            "/api/employees/contract-type/:type",
            get(employee::list_by_contract_type),
        )
        .route("/api/employees/status", post(employee::preview_status))
        .route(
            "/api/employees/:id",
            get(employee::get)
                .patch(employee::update)
                .delete(employee::delete),
        )
}

define_error! {
    enum EmployeeError {
        #[code = "EMPLOYEE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Employee` with the provided ID does not exist"]
        NotExists,
    }
}
