use axum::{
    Router,
    routing::{get, post},
};

use onboard_core::health::{healthz, not_found, readyz};
use onboard_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    app_employee::add_employee, employee_link::employee_link, send_code::send_code,
    verify_code::verify_code,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup codes
        .route("/api/send-code", post(send_code))
        .route("/api/verify-code", post(verify_code))
        // Employees
        .route("/api/app-employee", post(add_employee))
        .route("/api/employee-link", post(employee_link))
        .fallback(not_found)
        .with_state(state)
        // Outermost last: the request id is assigned before tracing sees the request.
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
