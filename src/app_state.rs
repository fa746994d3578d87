//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, expense::SQLiteExpenseStore};

/// The name reported by the root endpoint.
pub const SERVICE_NAME: &str = "Personal Expense Tracker API";

/// The state of the REST server.
///
/// The expense store is constructed once at start up and handed to every
/// request handler, so its lifetime is tied to the server process.
#[derive(Debug, Clone)]
pub struct AppState<S = SQLiteExpenseStore> {
    /// The store that persists expenses.
    pub expense_store: S,
}

impl AppState<SQLiteExpenseStore> {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self::with_store(SQLiteExpenseStore::new(connection)))
    }
}

impl<S> AppState<S> {
    /// Create a new [AppState] around an already initialized expense store.
    pub fn with_store(expense_store: S) -> Self {
        Self { expense_store }
    }
}
