//! Parsing of REPL input lines.

use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload(Vec<PathBuf>),
    Files,
    Analyze,
    Mode(Option<String>),
    Modes,
    History,
    Status,
    Run(PathBuf),
    Help,
    Quit,
    Chat(String),
    Empty,
}

pub const HELP: &str = "\
Commands:
  /upload <path>...   add files to the session
  /files              list uploaded files
  /analyze            review every uploaded file
  /mode [name]        show or change the assistant mode
  /modes              list available modes
  /history            print the conversation so far
  /status             show session statistics
  /run <path>         run a Python snippet locally
  /help               show this help
  /quit               leave
Anything else is sent to the assistant.";

pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "upload" => {
            if args.is_empty() {
                bail!("Usage: /upload <path>...");
            }
            Command::Upload(args.split_whitespace().map(PathBuf::from).collect())
        }
        "files" => Command::Files,
        "analyze" => Command::Analyze,
        "mode" => Command::Mode((!args.is_empty()).then(|| args.to_string())),
        "modes" => Command::Modes,
        "history" => Command::History,
        "status" => Command::Status,
        "run" => {
            if args.is_empty() {
                bail!("Usage: /run <path>");
            }
            Command::Run(PathBuf::from(args))
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '/{}'. Type /help for the list of commands.", other),
    };
    Ok(command)
}
