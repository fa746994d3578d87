//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::expense::create_expense_table;

/// Create the tables and indexes for the domain models.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error. No tables are created in that case.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;

    transaction.commit()
}
