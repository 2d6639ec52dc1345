//! Analysis of every uploaded file in a single request.
//!
//! The combined file texts travel as a synthetic user turn appended to the
//! outgoing prompt only. History gains the reply and nothing else.

use crate::chat::ChatClient;
use crate::core_types::{Message, Reply, Role};
use crate::errors::AssistantError;
use crate::session::Session;

/// Maximum number of characters taken from each uploaded file.
pub const ANALYSIS_CHAR_LIMIT: usize = 3000;

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the synthetic analysis turn, or `None` when nothing was uploaded.
pub fn analysis_turn(session: &Session) -> Option<String> {
    if session.upload_count() == 0 {
        return None;
    }
    let blocks: Vec<String> = session
        .uploaded_texts()
        .iter()
        .map(|entry| {
            format!(
                "{}:\n{}",
                entry.filename,
                truncate_chars(&entry.text, ANALYSIS_CHAR_LIMIT)
            )
        })
        .collect();
    Some(blocks.join("\n\n"))
}

pub async fn analyze_uploads(
    session: &mut Session,
    client: &ChatClient,
) -> Result<Reply, AssistantError> {
    let turn = analysis_turn(session).ok_or(AssistantError::NothingToAnalyze)?;
    log::info!(
        "Analyzing {} uploaded file(s) in {} mode",
        session.upload_count(),
        session.mode()
    );

    let mut outgoing = session.messages().to_vec();
    outgoing.push(Message::user(turn));

    let reply = match client.send(session.mode(), &outgoing).await {
        Ok(text) => Reply::success(text),
        Err(e) => Reply::failed(e),
    };
    session.append_message(Role::Assistant, reply.content.clone());
    Ok(reply)
}
