use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use time::OffsetDateTime;

use budget_tracker_rs::{
    initialize_db,
    models::{
        ExpenseCategory, Mobile, NewExpense, NewMonthlyExpense, NewUser, PasswordHash,
        ValidatedPassword,
    },
    stores::{
        ExpenseStore, MonthlyExpenseStore, UserStore,
        sqlite::{SQLiteExpenseStore, SQLiteMonthlyExpenseStore, SQLiteUserStore},
    },
};

/// A utility for creating a test database for the budget_tracker_rs API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path where the SQLite database will be created.
    #[arg(long, short)]
    output_path: String,
}

/// Create and seed a small database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("The output path must have a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("The output path must have a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("A file already exists at {output_path:#?}, refusing to overwrite it.");
        exit(1);
    }

    println!("Creating the database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let connection = Arc::new(Mutex::new(conn));
    let mut user_store = SQLiteUserStore::new(connection.clone());
    let mut monthly_expense_store = SQLiteMonthlyExpenseStore::new(connection.clone());
    let mut expense_store = SQLiteExpenseStore::new(connection);

    println!("Creating test user 'test@test.com' with the password 'test'...");

    let email = EmailAddress::from_str("test@test.com")?;
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = user_store.create(NewUser {
        first_name: Some("Test".to_string()),
        last_name: Some("User".to_string()),
        mobile: Mobile::new("021 555 0123")?,
        auth_id: Some(format!("local|{email}")),
        email,
        password_hash,
    })?;

    println!("Creating a monthly expense budget with a few expenses...");

    let monthly_expense =
        monthly_expense_store.create(NewMonthlyExpense::new(8, 2_500.0)?, user.id())?;

    let date = OffsetDateTime::now_utc();

    expense_store.create(NewExpense::new(
        "Weekly shop".to_string(),
        ExpenseCategory::Grocery,
        150.0,
        date,
        monthly_expense.id(),
    )?)?;
    expense_store.create(NewExpense::new(
        "Bus card top up".to_string(),
        ExpenseCategory::Transportation,
        62.5,
        date,
        monthly_expense.id(),
    )?)?;

    println!("Success!");

    Ok(())
}
