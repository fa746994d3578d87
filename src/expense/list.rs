//! The endpoints for listing expenses and their categories.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    expense::{ExpenseStore, SortOrder, list_categories, list_expenses},
};

/// The query parameters for listing expenses.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    /// Only list expenses in this category.
    pub category: Option<String>,
    /// How to sort the expenses: `date_desc`, `date_asc`, or anything else for newest created first.
    pub sort: Option<String>,
}

/// The JSON body listing the distinct categories.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Each category used by at least one expense.
    pub categories: Vec<String>,
}

/// Handle a request to list expenses.
pub async fn get_expenses_endpoint<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<ExpenseListQuery>,
) -> Response
where
    S: ExpenseStore,
{
    let sort_order = SortOrder::from_query(query.sort.as_deref());

    match list_expenses(query.category.as_deref(), sort_order, &state.expense_store) {
        Ok(expenses) => Json(expenses).into_response(),
        Err(error) => error.into_detail_response("Error fetching expenses"),
    }
}

/// Handle a request to list the distinct expense categories.
pub async fn get_categories_endpoint<S>(State(state): State<AppState<S>>) -> Response
where
    S: ExpenseStore,
{
    match list_categories(&state.expense_store) {
        Ok(categories) => Json(CategoriesResponse { categories }).into_response(),
        Err(error) => error.into_detail_response("Error fetching categories"),
    }
}


#[cfg(test)]
mod get_categories_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, ErrorDetail, build_router, endpoints,
        expense::test_utils::{FailingExpenseStore, get_test_store},
    };

    use super::CategoriesResponse;

    #[tokio::test]
    async fn lists_distinct_categories() {
        let app = build_router(AppState::with_store(get_test_store()));
        let server = TestServer::new(app).expect("Could not create test server.");
        for (i, category) in ["Food", "Food", "Travel"].into_iter().enumerate() {
            server
                .post(endpoints::EXPENSES)
                .json(&json!({
                    "amount": "3.20",
                    "category": category,
                    "description": format!("expense #{i}"),
                    "date": "2024-05-01",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(endpoints::EXPENSE_CATEGORIES).await;

        response.assert_status_ok();
        let mut categories = response.json::<CategoriesResponse>().categories;
        categories.sort();
        assert_eq!(categories, ["Food", "Travel"]);
    }

    #[tokio::test]
    async fn lists_no_categories_when_empty() {
        let app = build_router(AppState::with_store(get_test_store()));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(endpoints::EXPENSE_CATEGORIES).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "categories": [] }));
    }

    #[tokio::test]
    async fn storage_failure_is_internal_server_error() {
        let app = build_router(AppState::with_store(FailingExpenseStore));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(endpoints::EXPENSE_CATEGORIES).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            response
                .json::<ErrorDetail>()
                .detail
                .starts_with("Error fetching categories: ")
        );
    }
}
