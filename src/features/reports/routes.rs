use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports).post(handlers::create_report),
        )
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .put(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route("/api/reports/{id}/schedules", post(handlers::add_schedule))
        .route(
            "/api/reports/{id}/schedules/{schedule_id}",
            delete(handlers::remove_schedule),
        )
        .route("/api/reports/{id}/assign", post(handlers::assign_schools))
        .with_state(service)
}
