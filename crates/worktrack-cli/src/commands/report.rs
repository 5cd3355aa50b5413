//! Performance report command.

use worktrack_core::aggregate::{aggregate_for_time_range, TimeRange};
use worktrack_core::input::parse_unix_timestamp_str;
use worktrack_core::storage::Database;

pub fn run(profile_id: &str, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>> {
    let range = TimeRange::new(parse_unix_timestamp_str(from)?, parse_unix_timestamp_str(to)?)?;
    let db = Database::open()?;
    let profile = db.get_profile(profile_id)?;
    let report = aggregate_for_time_range(&db, &profile, range)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
