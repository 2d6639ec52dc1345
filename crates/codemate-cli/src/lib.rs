//! Terminal front-end for the codemate assistant.
//!
//! `commands` turns input lines into [`commands::Command`] values and `repl`
//! executes them against a single session.

pub mod commands;
pub mod repl;
