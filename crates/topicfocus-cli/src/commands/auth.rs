use clap::Subcommand;
use topicfocus_core::{Config, ProgressStore};

use super::open_store;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in locally
    Login {
        /// Account email; the same address always maps to the same user id
        #[arg(long)]
        email: String,
    },
    /// Forget the signed-in user
    Logout,
    /// Print the signed-in user
    Whoami,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&Config::load()?)?;

    match action {
        AuthAction::Login { email } => {
            let email = email.trim();
            if email.is_empty() {
                return Err("email must not be empty".into());
            }
            let user = store.sign_in(email)?;
            store.ensure_user_record(&user.id, &user.email)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        AuthAction::Logout => {
            store.sign_out()?;
            println!("signed out");
        }
        AuthAction::Whoami => {
            let user = store.current_user()?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }
    Ok(())
}
