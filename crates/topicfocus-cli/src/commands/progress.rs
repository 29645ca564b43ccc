use clap::Subcommand;
use serde_json::json;
use topicfocus_core::{Config, ProgressStore};

use super::open_store;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Notes, completion and study time for one topic
    Show {
        /// Topic identifier
        topic: String,
    },
    /// Every topic with stored progress, most recent first
    List,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&Config::load()?)?;
    let user = store.current_user()?;

    match action {
        ProgressAction::Show { topic } => {
            let progress = store.load_progress(&user.id, &topic)?.unwrap_or_default();
            let study_minutes = store.study_minutes(&user.id, &topic)?;
            let out = json!({
                "topic_id": topic,
                "notes": progress.notes,
                "completed": progress.completed,
                "study_minutes": study_minutes,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        ProgressAction::List => {
            let records = store.list_progress(&user.id)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
