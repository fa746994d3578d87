//! The endpoint for recording an expense.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    expense::{CreatedExpense, ExpenseFormData, ExpenseStore, NewExpense, create_expense},
};

const CREATE_ERROR_CONTEXT: &str = "Error creating expense";

/// Handle a request to record an expense.
///
/// Responds with 201 and the new expense, or with 200 and the earlier expense
/// when the request repeats one made within the idempotency window.
pub async fn create_expense_endpoint<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<ExpenseFormData>, JsonRejection>,
) -> Response
where
    S: ExpenseStore,
{
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::debug!("Rejected expense body: {rejection}");
            return Error::InvalidRequestBody(rejection.body_text())
                .into_detail_response(CREATE_ERROR_CONTEXT);
        }
    };

    let new_expense = match NewExpense::try_from(form) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_detail_response(CREATE_ERROR_CONTEXT),
    };

    match create_expense(new_expense, OffsetDateTime::now_utc(), &state.expense_store) {
        Ok(CreatedExpense::Created(expense)) => (StatusCode::CREATED, Json(expense)).into_response(),
        Ok(CreatedExpense::Existing(expense)) => (StatusCode::OK, Json(expense)).into_response(),
        Err(error) => error.into_detail_response(CREATE_ERROR_CONTEXT),
    }
}
