//! Monthly minimum-earning check command.

use chrono::Utc;
use worktrack_core::aggregate::monthly_minimum_check;
use worktrack_core::storage::Database;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let outcomes = monthly_minimum_check(&db, Utc::now().timestamp())?;
    if outcomes.is_empty() {
        println!("all employees met their minimum");
    } else {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    }
    Ok(())
}
