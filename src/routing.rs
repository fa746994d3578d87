//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, ErrorDetail, SERVICE_NAME, endpoints,
    expense::{
        ExpenseStore, create_expense_endpoint, get_categories_endpoint, get_expenses_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Any origin may call the API, so a browser front end can be served from elsewhere.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: ExpenseStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint::<S>).post(create_expense_endpoint::<S>),
        )
        .route(
            endpoints::EXPENSE_CATEGORIES,
            get(get_categories_endpoint::<S>),
        )
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The body of the root route.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct RootMessage {
    message: String,
}

/// The root path '/' reports the name of the service.
async fn get_root() -> Json<RootMessage> {
    Json(RootMessage {
        message: SERVICE_NAME.to_owned(),
    })
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorDetail::new("Not Found"))).into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{AppState, build_router, endpoints, expense::test_utils::get_test_store};

    fn get_test_server() -> TestServer {
        let app = build_router(AppState::with_store(get_test_store()));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_reports_service_name() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Personal Expense Tracker API" }));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/budgets").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "detail": "Not Found" }));
    }

    #[tokio::test]
    async fn allows_cross_origin_requests() {
        let server = get_test_server();

        let response = server
            .get(endpoints::EXPENSES)
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            HeaderValue::from_static("*")
        );
    }
}
