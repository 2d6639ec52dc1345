//! Assistant modes and the registry mapping each mode to its system instruction.
//!
//! The instruction is looked up fresh for every request, so switching modes
//! never rewrites messages that were already sent. `Documentation` has an
//! instruction but is not part of [`Mode::SELECTABLE`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::AssistantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "Code Generator")]
    CodeGenerator,
    #[serde(rename = "Debugger")]
    Debugger,
    #[serde(rename = "Code Guide")]
    CodeGuide,
    #[serde(rename = "Explain Code")]
    ExplainCode,
    #[serde(rename = "Documentation")]
    Documentation,
}

impl Mode {
    /// Modes offered by the selector, in display order.
    pub const SELECTABLE: [Mode; 4] = [
        Mode::CodeGenerator,
        Mode::Debugger,
        Mode::CodeGuide,
        Mode::ExplainCode,
    ];

    pub const ALL: [Mode; 5] = [
        Mode::CodeGenerator,
        Mode::Debugger,
        Mode::CodeGuide,
        Mode::ExplainCode,
        Mode::Documentation,
    ];

    /// Mode used when a name cannot be resolved.
    pub const FALLBACK: Mode = Mode::Debugger;

    pub fn label(&self) -> &'static str {
        match self {
            Mode::CodeGenerator => "Code Generator",
            Mode::Debugger => "Debugger",
            Mode::CodeGuide => "Code Guide",
            Mode::ExplainCode => "Explain Code",
            Mode::Documentation => "Documentation",
        }
    }

    pub fn is_selectable(&self) -> bool {
        Self::SELECTABLE.contains(self)
    }

    /// Resolves a free-form mode name; anything unrecognised becomes [`Mode::FALLBACK`].
    pub fn from_name_or_fallback(name: &str) -> Mode {
        name.parse().unwrap_or_else(|_| {
            log::debug!("Unknown mode '{}', using {}", name, Mode::FALLBACK);
            Mode::FALLBACK
        })
    }

    fn default_instruction(&self) -> &'static str {
        match self {
            Mode::CodeGenerator => {
                "You are a senior developer. Generate high-quality, production-ready code."
            }
            Mode::Debugger => {
                "You are a debugging assistant. Find issues, explain them, and suggest fixes."
            }
            Mode::CodeGuide => "You are a mentor. Teach coding best practices step by step.",
            Mode::ExplainCode => "You are a teacher. Explain code in simple terms with examples.",
            Mode::Documentation => {
                "You are a technical writer. Generate professional documentation."
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = AssistantError;

    /// Accepts the display label, case-insensitively, with `-`/`_` treated as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ").to_lowercase();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                AssistantError::ValidationError(format!(
                    "Unknown mode '{}'. Available modes: {}",
                    s,
                    Mode::SELECTABLE.map(|m| m.label()).join(", ")
                ))
            })
    }
}

/// Lookup table from mode to system instruction.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    instructions: HashMap<Mode, String>,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        let instructions = Mode::ALL
            .into_iter()
            .map(|mode| (mode, mode.default_instruction().to_string()))
            .collect();
        Self { instructions }
    }
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces built-in instructions. Keys are mode labels; unknown labels are rejected.
    pub fn with_overrides(
        mut self,
        overrides: &HashMap<String, String>,
    ) -> Result<Self, AssistantError> {
        for (label, instruction) in overrides {
            let mode: Mode = label.parse()?;
            log::debug!("Overriding instruction for mode '{}'", mode);
            self.instructions.insert(mode, instruction.clone());
        }
        Ok(self)
    }

    pub fn instruction_for(&self, mode: Mode) -> &str {
        self.instructions
            .get(&mode)
            .map(String::as_str)
            .unwrap_or_else(|| mode.default_instruction())
    }
}
