use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use topicfocus_core::notes;

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the blocks of a notes file as JSON
    Parse {
        /// Input file, or "-" for stdin
        input: PathBuf,
    },
    /// Print a notes file in normalized form
    Format {
        /// Input file, or "-" for stdin
        input: PathBuf,
    },
}

fn read_input(input: &Path) -> std::io::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

pub fn run(action: NotesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotesAction::Parse { input } => {
            let doc = notes::parse(&read_input(&input)?);
            println!("{}", serde_json::to_string_pretty(doc.blocks())?);
        }
        NotesAction::Format { input } => {
            let doc = notes::parse(&read_input(&input)?);
            println!("{}", notes::serialize(&doc));
        }
    }
    Ok(())
}
