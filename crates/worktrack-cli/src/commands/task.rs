//! Task inspection and delivery commands.

use chrono::Utc;
use clap::Subcommand;
use worktrack_core::awards::{apply_awards, delivery_awards};
use worktrack_core::model::TaskChanges;
use worktrack_core::payout::task_values;
use worktrack_core::performance::per_task;
use worktrack_core::storage::Database;

#[derive(Subcommand)]
pub enum TaskAction {
    /// List all tasks
    List,
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Monetary and XP values of a task for a profile
    Values {
        /// Task ID
        id: String,
        /// Profile ID
        #[arg(long)]
        profile: String,
    },
    /// Per-profile elapsed seconds breakdown for a task
    Performance {
        /// Task ID
        id: String,
    },
    /// Mark a task as having passed QA and apply XP awards
    Deliver {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        TaskAction::List => {
            let tasks = db.tasks()?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Get { id } => {
            let task = db.get_task(&id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Values { id, profile } => {
            let task = db.get_task(&id)?;
            let profile = db.get_profile(&profile)?;
            let rates = db.hourly_rates()?;
            let values = task_values(&profile, &task, &rates);
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        TaskAction::Performance { id } => {
            let task = db.get_task(&id)?;
            let performance = per_task(&task, Utc::now().timestamp())?;
            println!("{}", serde_json::to_string_pretty(&performance)?);
        }
        TaskAction::Deliver { id } => {
            let mut task = db.get_task(&id)?;
            if task.passed_qa {
                println!("task already delivered: {id}");
                return Ok(());
            }
            if task.is_unassigned() {
                return Err(format!("task has no owner: {id}").into());
            }

            let now = Utc::now().timestamp();
            let owner = db.get_profile(&task.owner)?;
            let rates = db.hourly_rates()?;
            let values = task_values(&owner, &task, &rates);
            // Awards read the pre-delivery view so an open QA round still
            // counts toward the reviewer deadline.
            let performance = per_task(&task, now)?;
            let project = match &task.project_id {
                Some(pid) => db.get_project(pid).ok(),
                None => None,
            };
            // Scarcity candidates come from the owner's project memberships.
            let member_projects: Vec<String> = db
                .projects_with_member(&owner.id)?
                .into_iter()
                .map(|p| p.id)
                .collect();
            let siblings = db.tasks_in_projects(&member_projects)?;
            let changes = TaskChanges {
                passed_qa: Some(true),
            };

            let awards = delivery_awards(
                &task,
                &changes,
                &owner,
                &values,
                &performance,
                project.as_ref(),
                &siblings,
            );
            apply_awards(&mut db, &awards, now * 1000)?;

            task.passed_qa = true;
            task.qa_in_progress = false;
            task.submitted_for_qa = false;
            task.time_finished = Some(now);
            db.upsert_task(&task)?;

            println!("Task delivered: {id}");
            println!("{}", serde_json::to_string_pretty(&awards)?);
        }
    }
    Ok(())
}
