//! Profile and XP ledger commands.

use chrono::Utc;
use clap::Subcommand;
use worktrack_core::storage::Database;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,
    /// Get profile details
    Get {
        /// Profile ID
        id: String,
    },
    /// Print a profile's XP ledger, oldest first
    Ledger {
        /// Profile ID
        id: String,
    },
    /// Append a manual XP adjustment to a profile's ledger
    Award {
        /// Profile ID
        id: String,
        /// Signed XP delta
        #[arg(long, allow_hyphen_values = true)]
        xp: f64,
        /// Reason recorded on the ledger entry
        #[arg(long)]
        details: String,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        ProfileAction::List => {
            let profiles = db.profiles()?;
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
        ProfileAction::Get { id } => {
            let profile = db.get_profile(&id)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Ledger { id } => {
            let entries = db.xp_entries(&id)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        ProfileAction::Award { id, xp, details } => {
            let entry = db.append_xp(&id, xp, &details, Utc::now().timestamp_millis())?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
    }
    Ok(())
}
