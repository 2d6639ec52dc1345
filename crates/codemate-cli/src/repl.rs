//! Interactive terminal loop over one assistant session.

use anyhow::{Context, Result};
use codemate_core::executors::CodeExecutor;
use codemate_core::{Assistant, AssistantError, Mode, Reply, Session, Upload, UploadOutcome};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{parse_command, Command, HELP};

pub struct Repl {
    assistant: Assistant,
    session: Session,
    executor: Box<dyn CodeExecutor>,
}

impl Repl {
    pub fn new(assistant: Assistant, session: Session, executor: Box<dyn CodeExecutor>) -> Self {
        Self {
            assistant,
            session,
            executor,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn submit(&mut self, prompt: &str) -> Reply {
        self.assistant.submit(&mut self.session, prompt).await
    }

    pub fn banner(&self) -> String {
        format!("Assistant is running in {} mode", self.session.mode())
    }

    /// Reads files from disk and ingests them, reporting per-file problems.
    pub async fn upload_paths<W: Write>(&mut self, paths: &[PathBuf], out: &mut W) -> Result<()> {
        for path in paths {
            let upload = match Upload::from_path(path).await {
                Ok(upload) => upload,
                Err(e) => {
                    writeln!(out, "Warning: {}", e)?;
                    continue;
                }
            };
            match self.assistant.upload(&mut self.session, &upload) {
                Ok(UploadOutcome::Stored {
                    extraction_failed: true,
                }) => writeln!(
                    out,
                    "Warning: {}",
                    self.session.uploaded_text(&upload.name).unwrap_or_default()
                )?,
                Ok(UploadOutcome::Stored { .. }) => {}
                Ok(UploadOutcome::AlreadyPresent) => writeln!(
                    out,
                    "'{}' is already uploaded; keeping the first copy.",
                    upload.name
                )?,
                Err(e) => writeln!(out, "Warning: {}", e)?,
            }
        }
        writeln!(
            out,
            "{} file(s) ready for analysis.",
            self.session.upload_count()
        )?;
        Ok(())
    }

    /// Executes one command. Returns `false` when the loop should stop.
    pub async fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(false),
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Chat(prompt) => {
                let reply = self.submit(&prompt).await;
                if reply.is_failure() {
                    writeln!(out, "Error: {}", reply.content)?;
                } else {
                    writeln!(out, "{}", reply.content)?;
                }
            }
            Command::Upload(paths) => self.upload_paths(&paths, out).await?,
            Command::Files => {
                if self.session.upload_count() == 0 {
                    writeln!(out, "No files uploaded.")?;
                }
                for entry in self.session.uploaded_texts() {
                    let note = if entry.extraction_failed {
                        " (unreadable)"
                    } else {
                        ""
                    };
                    writeln!(
                        out,
                        "  {} [{} chars]{}",
                        entry.filename,
                        entry.text.chars().count(),
                        note
                    )?;
                }
            }
            Command::Analyze => match self.assistant.analyze(&mut self.session).await {
                Ok(reply) if reply.is_failure() => writeln!(out, "Error: {}", reply.content)?,
                Ok(reply) => writeln!(out, "{}", reply.content)?,
                Err(AssistantError::NothingToAnalyze) => {
                    writeln!(out, "Upload files first with /upload <path>.")?
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            Command::Mode(None) => writeln!(out, "Current mode: {}", self.session.mode())?,
            Command::Mode(Some(name)) => {
                let selected = name
                    .parse::<Mode>()
                    .and_then(|mode| self.assistant.select_mode(&mut self.session, mode));
                match selected {
                    Ok(()) => writeln!(out, "{}", self.banner())?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            Command::Modes => {
                for mode in Mode::SELECTABLE {
                    let marker = if mode == self.session.mode() { "*" } else { " " };
                    writeln!(out, "{} {}", marker, mode)?;
                }
            }
            Command::History => {
                for message in self.session.messages() {
                    writeln!(out, "[{}] {}", message.role, message.content)?;
                }
            }
            Command::Status => {
                let stats = self.session.stats();
                writeln!(out, "Session {}", self.session.id())?;
                writeln!(
                    out,
                    "  started: {}",
                    self.session.created_at().format("%Y-%m-%d %H:%M:%S UTC")
                )?;
                writeln!(out, "  mode: {}", self.session.mode())?;
                writeln!(
                    out,
                    "  messages: {} ({} user, {} assistant)",
                    stats.message_count, stats.user_messages, stats.assistant_messages
                )?;
                writeln!(
                    out,
                    "  files: {} ({} unreadable)",
                    stats.uploaded_files, stats.failed_extractions
                )?;
            }
            Command::Run(path) => {
                let code = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                match self.executor.execute_code(&code).await {
                    Ok(result) => {
                        if !result.stdout.is_empty() {
                            write!(out, "{}", result.stdout)?;
                        }
                        if !result.stderr.is_empty() {
                            write!(out, "[stderr]\n{}", result.stderr)?;
                        }
                        match result.exit_code {
                            Some(code) => writeln!(out, "[exit code {}]", code)?,
                            None => writeln!(out, "[terminated by signal]")?,
                        }
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
        }
        Ok(true)
    }

    /// Reads commands from stdin until `/quit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "Type /help for commands.")?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(stdout, "{}", e)?;
                    continue;
                }
            };
            match self.handle(command, &mut stdout).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::error!("Command failed: {:#}", e);
                    writeln!(stdout, "Error: {:#}", e)?;
                }
            }
        }

        log::info!("Session {} ended", self.session.id());
        Ok(())
    }
}
