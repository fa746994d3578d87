//! Core expense domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::Error;

/// The unique identifier of an expense, generated by the server when the expense is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Generate a new random ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl ToSql for ExpenseId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ExpenseId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A strictly positive amount of money.
///
/// The amount is kept in normalized form, so `12.50` and `12.5` are the same
/// amount and compare equal both in memory and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::NonPositiveAmount] if `value` is zero or negative.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value <= Decimal::ZERO {
            Err(Error::NonPositiveAmount(value))
        } else {
            Ok(Self(value.normalize()))
        }
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Amounts are stored as text so that equality checks in SQL are exact.
impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let decimal = Decimal::from_str(value.as_str()?)
            .map_err(|error| FromSqlError::Other(Box::new(error)))?;

        Amount::new(decimal).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A single spending event.
///
/// Expenses are never changed once they have been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much money was spent.
    pub amount: Amount,
    /// A free-form label used to group expenses, e.g. "Food".
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
    /// When the server stored the expense.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated fields of an expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// How much money was spent.
    pub amount: Amount,
    /// A non-empty, free-form label used to group expenses.
    pub category: String,
    /// A non-empty description of what the money was spent on.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// Text fields are kept exactly as given; only empty strings are rejected.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is zero or negative,
    /// - [Error::EmptyCategory] if `category` is an empty string,
    /// - or [Error::EmptyDescription] if `description` is an empty string.
    pub fn new(
        amount: Decimal,
        category: &str,
        description: &str,
        date: Date,
    ) -> Result<Self, Error> {
        let amount = Amount::new(amount)?;

        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(Self {
            amount,
            category: category.to_owned(),
            description: description.to_owned(),
            date,
        })
    }
}

/// The JSON body for creating an expense.
///
/// `amount` accepts either a JSON number or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseFormData {
    /// How much money was spent.
    pub amount: Decimal,
    /// The category label.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// When the money was spent, formatted as `YYYY-MM-DD`.
    pub date: Date,
}

impl TryFrom<ExpenseFormData> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseFormData) -> Result<Self, Self::Error> {
        NewExpense::new(form.amount, &form.category, &form.description, form.date)
    }
}
