//! Rate and minimum configuration commands.

use clap::Subcommand;
use worktrack_core::storage::Database;
use worktrack_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set the hourly rate for a skill
    SetRate {
        /// Skill name (e.g. "PHP")
        skill: String,
        /// Hourly rate
        rate: f64,
    },
    /// Set the monthly minimum earning for a role
    SetMinimum {
        /// Employee role (e.g. "Apprentice")
        role: String,
        /// Required monthly minimum
        minimum: f64,
    },
    /// Copy rates and minimums from the config file into the database
    Seed,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::SetRate { skill, rate } => {
            let mut config = Config::load()?;
            config.rates.rates.insert(skill, rate);
            config.save()?;
            println!("ok");
        }
        ConfigAction::SetMinimum { role, minimum } => {
            let mut config = Config::load()?;
            config.minimums.minimums.insert(role, minimum);
            config.save()?;
            println!("ok");
        }
        ConfigAction::Seed => {
            let config = Config::load()?;
            let db = Database::open()?;
            config.seed_database(&db)?;
            println!("database seeded");
        }
    }
    Ok(())
}
