//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{RunType, StatementKey};

use super::request::RunRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(run_handler))
        .route(
            "/statements/:period_id/:run_type/:employee_id",
            get(statement_handler),
        )
        .with_state(state)
}

fn json_response(status: StatusCode, body: impl serde::Serialize) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn rejection_error(correlation_id: &Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /runs.
///
/// Computes and stores statements for a period and returns the batch result,
/// with one outcome per employee.
async fn run_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(&correlation_id, rejection),
            );
        }
    };

    let start_time = Instant::now();
    let result = state
        .orchestrator()
        .invoke(&request.period_id, request.run_type, request.selection())
        .await;

    info!(
        correlation_id = %correlation_id,
        batch_id = %result.batch_id,
        period_id = %request.period_id,
        run_type = %request.run_type,
        computed = result.computed_count(),
        failed = result.failed_count(),
        duration_us = start_time.elapsed().as_micros(),
        "Run completed"
    );
    json_response(StatusCode::OK, result)
}

/// Handler for GET /statements/{period_id}/{run_type}/{employee_id}.
async fn statement_handler(
    State(state): State<AppState>,
    path: Result<Path<(String, RunType, String)>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let (period_id, run_type, employee_id) = match path {
        Ok(Path(parts)) => parts,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid statement path"
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    let key = StatementKey {
        employee_id,
        period_id,
        run_type,
    };
    match state.orchestrator().statement(&key).await {
        Ok(statement) => json_response(StatusCode::OK, statement),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Statement lookup failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, ConfigStore};
    use crate::models::{
        EmployeeRecord, EmployeeWageProfile, PayStatement, PayrollPeriod, Periodicity, WageZone,
    };
    use crate::orchestrator::{BatchResult, PayrollOrchestrator};
    use crate::repository::{
        InMemoryEmployeeRepository, InMemoryPeriodRepository, InMemoryStatementRepository,
    };
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/payroll").expect("Failed to load config");
        let period = PayrollPeriod {
            id: "2025-12-A".to_string(),
            periodicity: Periodicity::SemiMonthly,
            start_date: make_date("2025-06-01"),
            end_date: make_date("2025-06-15"),
            payment_date: make_date("2025-06-15"),
        };
        let employee = EmployeeRecord {
            employee_id: "emp_001".to_string(),
            profile: EmployeeWageProfile {
                daily_wage: Decimal::new(50000, 2),
                integrated_daily_wage: Decimal::new(52260, 2),
                periodicity: Periodicity::SemiMonthly,
                hire_date: make_date("2020-01-01"),
                wage_zone: WageZone::General,
            },
            agreements: vec![],
            absence_days: Decimal::ZERO,
            vacation_days_taken: Decimal::ZERO,
            termination: None,
        };
        AppState::new(PayrollOrchestrator::new(
            Arc::new(ConfigStore::new(config.into_config())),
            Arc::new(InMemoryEmployeeRepository::new(vec![employee])),
            Arc::new(InMemoryPeriodRepository::new(vec![period])),
            Arc::new(InMemoryStatementRepository::new()),
        ))
    }

    fn post_runs(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/runs")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn read_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_run_request_returns_batch_result() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_runs(
                r#"{"period_id": "2025-12-A", "run_type": "ordinary"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: BatchResult = read_body(response).await;
        assert_eq!(result.period_id, "2025-12-A");
        let statement = result.statement("emp_001").unwrap();
        assert_eq!(statement.net, Decimal::new(660584, 2));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router.oneshot(post_runs("{invalid json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_period_id_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_runs(r#"{"run_type": "ordinary"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("period_id"));
    }

    #[tokio::test]
    async fn test_unknown_period_reports_per_employee_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_runs(
                r#"{"period_id": "2031-01-A", "run_type": "ordinary", "employees": ["emp_001"]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: BatchResult = read_body(response).await;
        assert_eq!(result.error("emp_001").unwrap().code, "CONFIGURATION_MISSING");
    }

    #[tokio::test]
    async fn test_stored_statement_can_be_fetched() {
        let router = create_router(create_test_state());

        let response = router
            .clone()
            .oneshot(post_runs(
                r#"{"period_id": "2025-12-A", "run_type": "ordinary"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/statements/2025-12-A/ordinary/emp_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let statement: PayStatement = read_body(response).await;
        assert_eq!(statement.employee_id, "emp_001");
        assert_eq!(statement.withholding, Decimal::new(69699, 2));
    }

    #[tokio::test]
    async fn test_missing_statement_returns_404() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/statements/2025-12-A/bonus/emp_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "STATEMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_run_type_in_path_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/statements/2025-12-A/quarterly/emp_001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }
}
