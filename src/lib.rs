//! A small service for recording personal expenses.
//!
//! Clients submit expenses (amount, category, description, date) and read
//! them back filtered by category and sorted by date or insertion time.
//! Repeated identical submissions that arrive within a few seconds of each
//! other are collapsed into a single stored expense.
//!
//! This library provides a JSON REST API backed by SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod expense;
mod logging;
mod routing;

pub use app_state::{AppState, SERVICE_NAME};
pub use db::initialize as initialize_db;
pub use expense::{
    Amount, CreatedExpense, Expense, ExpenseFormData, ExpenseId, ExpenseStore, IDEMPOTENCY_WINDOW,
    NewExpense, SQLiteExpenseStore, SortOrder, create_expense, list_categories, list_expenses,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// How long in-flight requests are given to finish once a shutdown signal arrives.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "ctrl+c",
        _ = terminate => "terminate",
    };

    tracing::info!("Received {signal_name} signal, shutting down.");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was submitted with an amount of zero or less.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// An expense was submitted with an empty category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// An expense was submitted with an empty description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// The request body could not be parsed into the expected shape.
    ///
    /// Covers malformed JSON, missing fields, wrong types and unparsable dates.
    #[error("{0}")]
    InvalidRequestBody(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// Whether the error was caused by the client's input rather than by the server.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NonPositiveAmount(_)
                | Error::EmptyCategory
                | Error::EmptyDescription
                | Error::InvalidRequestBody(_)
        )
    }

    /// Convert the error into a JSON response with a `detail` message.
    ///
    /// Validation errors become a 422 response carrying the error message.
    /// Every other error is logged and becomes a 500 response whose message
    /// is prefixed with `context`, e.g. "Error creating expense".
    pub(crate) fn into_detail_response(self, context: &str) -> Response {
        if self.is_validation() {
            return ErrorDetail::new(self.to_string())
                .into_response_with_status(StatusCode::UNPROCESSABLE_ENTITY);
        }

        tracing::error!("{context}: {self}");
        ErrorDetail::new(format!("{context}: {self}"))
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// A human readable description of what went wrong.
    pub detail: String,
}

impl ErrorDetail {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub(crate) fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
