//! Interactive focus session.
//!
//! Reads one command per stdin line and prints surface events as JSON lines
//! on stdout. End of input closes the surface like `quit`.

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use topicfocus_core::{
    BlockId, BlockType, Config, CoreError, Event, FocusHandle, FocusOptions, FocusSurface, Key,
    ValidationError,
};

use super::open_store;

#[derive(Args)]
pub struct FocusArgs {
    /// Topic identifier
    topic: String,
    /// Work phase length in minutes
    #[arg(long)]
    work: Option<u32>,
    /// Break phase length in minutes
    #[arg(long = "break")]
    break_minutes: Option<u32>,
    /// Also print an event for every timer tick
    #[arg(long)]
    ticks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Type(String),
    Enter,
    Backspace,
    As(BlockType),
    Select(usize),
    Done(bool),
    Start,
    Pause,
    Reset,
    Durations(u32, u32),
    Show,
    Save,
    Quit,
}

const HELP: &str = "commands: type <text> | enter | backspace | as <type> | select <n> | \
                    done on|off | start | pause | reset | durations <work> <break> | \
                    show | save | quit";

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let input = match word {
        "type" => Input::Type(rest.to_string()),
        "enter" => Input::Enter,
        "backspace" => Input::Backspace,
        "as" => Input::As(rest.parse().map_err(|e: ValidationError| e.to_string())?),
        "select" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Input::Select(n),
            _ => return Err(format!("select expects a block number from 1, got '{rest}'")),
        },
        "done" => match rest {
            "on" => Input::Done(true),
            "off" => Input::Done(false),
            _ => return Err("done expects 'on' or 'off'".into()),
        },
        "start" => Input::Start,
        "pause" => Input::Pause,
        "reset" => Input::Reset,
        "durations" => {
            let mut parts = rest.split_whitespace().map(str::parse::<u32>);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(Ok(work)), Some(Ok(brk)), None) => Input::Durations(work, brk),
                _ => return Err("durations expects two whole numbers of minutes".into()),
            }
        }
        "show" => Input::Show,
        "save" => Input::Save,
        "quit" | "exit" => Input::Quit,
        _ => return Err(format!("unknown command '{word}'; {HELP}")),
    };
    Ok(input)
}

pub fn run(args: FocusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = Arc::new(open_store(&config)?);

    let mut options = FocusOptions::from_config(args.topic, &config);
    if let Some(work) = args.work {
        options.work_minutes = work;
    }
    if let Some(brk) = args.break_minutes {
        options.break_minutes = brk;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(FocusSurface::open(store, options)?, args.ticks))
}

async fn session(mut handle: FocusHandle, ticks: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => {
                        if let Err(e) = apply(&handle, input).await {
                            eprintln!("error: {e}");
                        }
                    }
                    Err(msg) => eprintln!("{msg}"),
                }
                if handle.is_closed() {
                    break;
                }
            }
            event = handle.next_event() => match event {
                Some(event) => print_event(&event, ticks)?,
                None => break,
            },
        }
    }

    match handle.close().await {
        Ok(summary) => {
            if let Some(error) = summary.error {
                eprintln!("error: final save failed: {error}");
            }
        }
        Err(CoreError::SurfaceClosed) => {}
        Err(e) => return Err(e.into()),
    }
    while let Some(event) = handle.next_event().await {
        print_event(&event, ticks)?;
    }
    Ok(())
}

async fn apply(handle: &FocusHandle, input: Input) -> Result<(), CoreError> {
    match input {
        Input::Type(text) => {
            handle.update_content(target(handle).await?, text).await?;
        }
        Input::Enter => {
            handle.focus_block(target(handle).await?).await?;
            handle.press_key(Key::Enter).await?;
        }
        Input::Backspace => {
            handle.focus_block(target(handle).await?).await?;
            handle.press_key(Key::Backspace).await?;
        }
        Input::As(block_type) => {
            handle.change_type(target(handle).await?, block_type).await?;
        }
        Input::Select(n) => {
            let view = handle.view().await?;
            let block = view
                .blocks
                .get(n - 1)
                .ok_or_else(|| ValidationError::InvalidValue {
                    field: "block".into(),
                    message: format!("there are only {} blocks", view.blocks.len()),
                })?;
            handle.focus_block(block.id).await?;
        }
        Input::Done(completed) => {
            handle.set_completed(completed).await?;
        }
        Input::Start => {
            handle.start_timer().await?;
        }
        Input::Pause => {
            handle.pause_timer().await?;
        }
        Input::Reset => {
            handle.reset_timer().await?;
        }
        Input::Durations(work, brk) => {
            handle.set_durations(work, brk).await?;
        }
        Input::Show => {
            let view = handle.view().await?;
            println!("{}", serde_json::to_string(&view)?);
        }
        Input::Save => handle.save().await?,
        Input::Quit => {}
    }
    Ok(())
}

/// The focused block, or the first block when nothing has focus yet.
async fn target(handle: &FocusHandle) -> Result<BlockId, CoreError> {
    let view = handle.view().await?;
    view.focused
        .or_else(|| view.blocks.first().map(|b| b.id))
        .ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "block".into(),
                message: "document has no blocks".into(),
            }
            .into()
        })
}

fn print_event(event: &Event, ticks: bool) -> Result<(), serde_json::Error> {
    if matches!(event, Event::TimerTick { .. }) && !ticks {
        return Ok(());
    }
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_editing_commands() {
        assert_eq!(
            parse_input("type  hello world "),
            Ok(Input::Type("hello world".into()))
        );
        assert_eq!(parse_input("type"), Ok(Input::Type(String::new())));
        assert_eq!(parse_input("as heading2"), Ok(Input::As(BlockType::Heading2)));
        assert_eq!(parse_input("select 2"), Ok(Input::Select(2)));
        assert_eq!(parse_input("done on"), Ok(Input::Done(true)));
        assert_eq!(parse_input("enter"), Ok(Input::Enter));
    }

    #[test]
    fn parses_timer_commands() {
        assert_eq!(parse_input("durations 50 10"), Ok(Input::Durations(50, 10)));
        assert_eq!(parse_input("start"), Ok(Input::Start));
        assert_eq!(parse_input("quit"), Ok(Input::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_input("select 0").is_err());
        assert!(parse_input("as title").is_err());
        assert!(parse_input("done maybe").is_err());
        assert!(parse_input("durations 50").is_err());
        assert!(parse_input("durations 1 2 3").is_err());
        assert!(parse_input("jump").unwrap_err().contains("unknown command"));
    }
}
