//! Assembly of the message list sent to the model.
//!
//! The output is always `[system, turn_1, ..., turn_n]`. Only `User` survives
//! as-is; every other history role is sent as `Assistant`, so a stray system
//! message in history reaches the model as an assistant turn.

use crate::core_types::{Message, Role};
use crate::modes::{Mode, ModeRegistry};

pub fn build_prompt(registry: &ModeRegistry, mode: Mode, history: &[Message]) -> Vec<Message> {
    let mut prompt = Vec::with_capacity(history.len() + 1);
    prompt.push(Message::system(registry.instruction_for(mode)));
    prompt.extend(history.iter().map(|message| {
        let role = match message.role {
            Role::User => Role::User,
            _ => Role::Assistant,
        };
        Message::new(role, message.content.clone())
    }));
    prompt
}
