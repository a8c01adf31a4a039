//! Prompt construction for the two document tasks.
//!
//! Document text is head-truncated to [`MAX_DOCUMENT_CHARS`] characters before it is embedded
//! in any message. Longer documents simply lose their tail.

use super::ChatMessage;

/// Maximum number of document characters sent in any prompt.
pub const MAX_DOCUMENT_CHARS: usize = 6000;

/// Phrase the model is told to use when the document does not contain the answer.
pub const UNKNOWN_ANSWER: &str = "I don't know.";

/// System instruction for summaries.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a professional summarizer. Provide a concise, \
clear summary with 5 bullet points focused on the most relevant details for business users.";

/// System instruction for document-grounded answers.
pub const QUESTION_SYSTEM_PROMPT: &str = "You are a precise, business-style assistant. Only \
answer using the provided document.";

/// Return at most the first [`MAX_DOCUMENT_CHARS`] characters of `text`.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_document(text: &str) -> &str {
    match text.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Messages requesting a five-bullet summary of `document`.
pub fn summary_messages(document: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(truncate_document(document)),
    ]
}

/// Messages asking `question` about `document`, restricted to the document's content.
pub fn question_messages(document: &str, question: &str) -> Vec<ChatMessage> {
    let prompt = format!(
        "Document:\n{}\n\nQuestion: {}\n\nAnswer accurately using only the document. \
         If unsure, reply '{UNKNOWN_ANSWER}'",
        truncate_document(document),
        question,
    );
    vec![
        ChatMessage::system(QUESTION_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}
