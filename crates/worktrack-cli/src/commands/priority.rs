//! Priority escalation command.

use chrono::Utc;
use worktrack_core::priority::escalate_priorities;
use worktrack_core::storage::Database;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut tasks = db.tasks()?;
    let bumped = escalate_priorities(&mut tasks, Utc::now().timestamp())?;
    for task in &tasks {
        db.upsert_task(task)?;
    }
    if bumped.is_empty() {
        println!("no tasks escalated");
    } else {
        println!("{}", serde_json::to_string_pretty(&bumped)?);
    }
    Ok(())
}
