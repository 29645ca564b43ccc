use clap::Subcommand;
use topicfocus_core::{Config, ProgressStore};

use super::open_store;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Study totals and streak for the signed-in user
    Show,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&Config::load()?)?;

    match action {
        StatsAction::Show => {
            let user = store.current_user()?;
            let stats = store.load_stats(&user.id)?.unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
