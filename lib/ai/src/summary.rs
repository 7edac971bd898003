//! Summarization prompts.

use medtrain_conversation::{ContextEntry, Turn};

/// Instruction given to the model when condensing a transcript.
///
/// The 500 character limit is advisory; nothing enforces it on the output.
pub const SUMMARY_INSTRUCTION: &str = "You write short summaries of dialogs. \
Keep the key facts, agreements and important details. \
Answer briefly, in no more than 500 characters.";

/// Builds the context window that asks a model to summarize `turns`.
///
/// The transcript is rendered as one `role: content` line per turn.
#[must_use]
pub fn summary_request(turns: &[Turn]) -> Vec<ContextEntry> {
    let transcript = turns
        .iter()
        .map(|t| format!("{}: {}", t.role(), t.content()))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        ContextEntry::system(SUMMARY_INSTRUCTION),
        ContextEntry::user(format!(
            "Write a short summary of the following dialog:\n\n{transcript}"
        )),
    ]
}

/// Placeholder used when summarization fails, so old turns are still
/// replaced and the exchange can continue.
#[must_use]
pub fn fallback_summary(turn_count: usize) -> String {
    format!("[summary of {turn_count} messages]")
}
