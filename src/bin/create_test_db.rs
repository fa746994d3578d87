use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use expense_tracker::{NewExpense, SQLiteExpenseStore, create_expense, initialize_db};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (amount in cents, category, description, days ago)
const SAMPLE_EXPENSES: [(i64, &str, &str, i64); 8] = [
    (1250, "Food", "Lunch", 0),
    (450, "Food", "Coffee", 0),
    (8999, "Groceries", "Weekly shop", 1),
    (320, "Transport", "Bus fare", 2),
    (4500, "Transport", "Fuel", 5),
    (2000, "Entertainment", "Cinema tickets", 7),
    (1575, "Food", "Takeaway", 9),
    (120000, "Rent", "Monthly rent", 14),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SQLiteExpenseStore::new(Arc::new(Mutex::new(conn)));
    let now = OffsetDateTime::now_utc();

    println!("Creating {} test expenses...", SAMPLE_EXPENSES.len());

    for (cents, category, description, days_ago) in SAMPLE_EXPENSES {
        let date = (now - Duration::days(days_ago)).date();
        let new_expense = NewExpense::new(Decimal::new(cents, 2), category, description, date)?;
        let created_at = now - Duration::days(days_ago);

        let created = create_expense(new_expense, created_at, &store)?;
        println!("  {} {}", created.expense().date, created.expense().description);
    }

    println!("Success!");

    Ok(())
}
