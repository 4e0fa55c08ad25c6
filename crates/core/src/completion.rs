//! Step-completion detection for the scaffolding chat.
//!
//! The server's explicit evaluation is authoritative. When it is missing, a
//! keyword heuristic over the tutor's (Vietnamese) reply is used as a
//! best-effort fallback; it can misfire on phrasing outside both lists.

use crate::model::{ChatMessage, Transcript};

/// Phrases the tutor uses when a step has been solved.
pub const AFFIRMATIVE_PHRASES: &[&str] = &[
    "đúng rồi! 🎉",
    "bạn làm đúng rồi",
    "bạn làm rất tốt",
    "nhấn nút bên dưới",
    "nhấn tiếp tục",
    "nhấn luyện tập nâng cao",
    "bài toán kết thúc",
    "đã xong",
];

/// Phrases the tutor uses when correcting the learner.
pub const NEGATIVE_PHRASES: &[&str] = &[
    "chưa đúng",
    "sai rồi",
    "thử lại",
    "xem lại",
    "nhầm lẫn",
    "chưa chính xác",
    "mình hỏi bạn nhé",
];

/// Markers of a message that introduces a new problem rather than closing one.
const NEW_PROBLEM_MARKERS: &[&str] = &["bài toán:", "**bài toán:**"];

/// How a completion verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    ServerSignal,
    KeywordFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionVerdict {
    pub complete: bool,
    pub source: CompletionSource,
}

/// Decide whether the latest message closes the current scaffolding step.
///
/// Only the final message of the transcript is considered, and only when the
/// tutor wrote it.
#[must_use]
pub fn detect_step_completion(transcript: &Transcript) -> Option<CompletionVerdict> {
    let last = transcript.last().filter(|message| message.is_ai())?;
    Some(judge_message(last))
}

#[must_use]
pub fn is_step_complete(transcript: &Transcript) -> bool {
    detect_step_completion(transcript).is_some_and(|verdict| verdict.complete)
}

fn judge_message(message: &ChatMessage) -> CompletionVerdict {
    let content = message.content.to_lowercase();
    if NEW_PROBLEM_MARKERS.iter().any(|marker| content.contains(marker)) {
        return CompletionVerdict {
            complete: false,
            source: CompletionSource::KeywordFallback,
        };
    }

    if let Some(complete) = message.step_complete {
        return CompletionVerdict {
            complete,
            source: CompletionSource::ServerSignal,
        };
    }

    CompletionVerdict {
        complete: keyword_match(&content),
        source: CompletionSource::KeywordFallback,
    }
}

fn keyword_match(lowercase_content: &str) -> bool {
    let affirmative = AFFIRMATIVE_PHRASES
        .iter()
        .any(|phrase| lowercase_content.contains(phrase));
    let negative = NEGATIVE_PHRASES
        .iter()
        .any(|phrase| lowercase_content.contains(phrase));
    affirmative && !negative
}
